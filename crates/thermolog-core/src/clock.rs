//! Jiffy clock and sampling-cycle pacing.
//!
//! The timer side calls [`CycleClock::tick`] once per jiffy and does
//! nothing else; the sampling loop brackets each cycle with
//! [`CycleClock::begin_cycle`] and [`CycleClock::next_cycle`]. The timer
//! only increments the counter and raises the wake condition, so the
//! sampling loop is the one place a full cycle is ever computed.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Elapsed time in timer ticks. Monotonic, wraps at the counter width;
/// elapsed math must use `wrapping_sub`.
pub type Jiffies = u32;

/// Monotonic tick counter plus the pacing wait for the sampling loop.
///
/// Writer roles: [`tick`](Self::tick) is called from exactly one context
/// (the periodic timer) and [`begin_cycle`](Self::begin_cycle) from
/// exactly one (the sampling loop). Everything else only reads.
pub struct CycleClock {
    jiffies: AtomicU32,
    cycle_start: AtomicU32,
    period: Jiffies,
    cycle_elapsed: Signal<CriticalSectionRawMutex, ()>,
}

impl CycleClock {
    pub const fn new(period: Jiffies) -> Self {
        Self {
            jiffies: AtomicU32::new(0),
            cycle_start: AtomicU32::new(0),
            period,
            cycle_elapsed: Signal::new(),
        }
    }

    /// Advance the clock one jiffy, waking the sampling loop once the
    /// current cycle's period has elapsed. Timer context only.
    pub fn tick(&self) -> Jiffies {
        let now = self.jiffies.fetch_add(1, Ordering::Release).wrapping_add(1);
        if now.wrapping_sub(self.cycle_start.load(Ordering::Acquire)) >= self.period {
            self.cycle_elapsed.signal(());
        }
        now
    }

    pub fn now(&self) -> Jiffies {
        self.jiffies.load(Ordering::Acquire)
    }

    /// Stamp the start of a sampling cycle, clearing any stale wake left
    /// by a cycle that overran its period.
    pub fn begin_cycle(&self) -> Jiffies {
        let now = self.now();
        self.cycle_start.store(now, Ordering::Release);
        self.cycle_elapsed.reset();
        now
    }

    /// Jiffies since the current cycle began; feeds the report header.
    pub fn since_cycle_start(&self) -> Jiffies {
        self.now()
            .wrapping_sub(self.cycle_start.load(Ordering::Acquire))
    }

    /// Suspend until the timer reports the period has elapsed.
    pub async fn next_cycle(&self) {
        self.cycle_elapsed.wait().await;
    }
}
