//! Compile-time tuning for the recorder.

/// Jiffy rate of the pacing timer, in ticks per second.
pub const JIFFY_HZ: u32 = 1;

/// Jiffies per minute at [`JIFFY_HZ`].
pub const JIFFIES_PER_MINUTE: u32 = 60 * JIFFY_HZ;

/// Minutes between samples; also quoted in every report header.
pub const SAMPLE_PERIOD_MINUTES: u32 = 15;

/// Jiffies between samples.
///
/// The `fast-sample` feature collapses the period to a single jiffy so a
/// bench run fills the log in minutes instead of days.
#[cfg(not(feature = "fast-sample"))]
pub const SAMPLE_PERIOD_JIFFIES: u32 = SAMPLE_PERIOD_MINUTES * JIFFIES_PER_MINUTE;

/// Jiffies between samples (`fast-sample` build).
#[cfg(feature = "fast-sample")]
pub const SAMPLE_PERIOD_JIFFIES: u32 = 1;

/// Raw conversions averaged into one logged sample.
pub const OVERSAMPLE: usize = 8;

/// Circular history capacity, one byte per sample. 350 slots at the
/// 15-minute period is a little over three and a half days of history.
pub const LOG_CAPACITY: usize = 350;
