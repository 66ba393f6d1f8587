//! Three-state streamer that dumps the history backward over the serial
//! line.
//!
//! A report is triggered synchronously (header out on command receipt)
//! and then paced by the transport: every completed transmission earns
//! exactly one call to [`Reporter::next_line`].

use core::fmt::Write;

use crate::clock::Jiffies;
use crate::config::{JIFFIES_PER_MINUTE, SAMPLE_PERIOD_MINUTES};
use crate::history::{EMPTY_SLOT, SampleLog};

/// Worst case is the header with a ten-digit elapsed count.
pub const LINE_CAPACITY: usize = 20;

/// One CRLF-terminated protocol line.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Terminator appended to every emitted line.
pub const EOL: &str = "\r\n";

/// Closing line of a report.
const REPORT_END: &str = "==";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStage {
    /// No report in flight.
    #[default]
    Idle,
    /// Walking the history backward, one line per transport-ready event.
    Streaming,
    /// History exhausted; the closing line is still owed.
    Finishing,
}

/// Cursor state for the report in flight.
///
/// At most one report exists at a time; a trigger while one is active
/// restarts the cursor at the current head and abandons the prior walk.
#[derive(Debug)]
pub struct Reporter {
    stage: ReportStage,
    read_idx: usize,
    stop_idx: usize,
}

impl Reporter {
    pub const fn new() -> Self {
        Self {
            stage: ReportStage::Idle,
            read_idx: 0,
            stop_idx: 0,
        }
    }

    pub fn stage(&self) -> ReportStage {
        self.stage
    }

    /// Begin (or restart) a report and render its header line.
    ///
    /// `elapsed` is the jiffies since the current sampling cycle began;
    /// the header quotes it as whole minutes, rounded to nearest, next to
    /// the configured sampling period.
    pub fn start<const N: usize>(&mut self, log: &SampleLog<N>, elapsed: Jiffies) -> Line {
        self.read_idx = log.head();
        self.stop_idx = self.read_idx;
        // An empty history owes no data lines, only the closing line.
        self.stage = if log.get(self.read_idx) == EMPTY_SLOT {
            ReportStage::Finishing
        } else {
            ReportStage::Streaming
        };

        let minutes = elapsed.wrapping_add(JIFFIES_PER_MINUTE / 2) / JIFFIES_PER_MINUTE;
        log::debug!("report started {minutes} min into cycle, head {}", self.read_idx);
        line(format_args!("@ {minutes} {SAMPLE_PERIOD_MINUTES}"))
    }

    /// Produce the next line of the report, one call per completed
    /// transmission. `None` once the report has drained back to idle.
    pub fn next_line<const N: usize>(&mut self, log: &SampleLog<N>) -> Option<Line> {
        match self.stage {
            ReportStage::Idle => None,
            ReportStage::Streaming => {
                let degrees = log.get(self.read_idx);
                self.read_idx = if self.read_idx == 0 {
                    N - 1
                } else {
                    self.read_idx - 1
                };
                if log.get(self.read_idx) == EMPTY_SLOT || self.read_idx == self.stop_idx {
                    self.stage = ReportStage::Finishing;
                }
                Some(line(format_args!("{degrees}")))
            }
            ReportStage::Finishing => {
                self.stage = ReportStage::Idle;
                Some(line(format_args!("{REPORT_END}")))
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one CRLF-terminated line. [`LINE_CAPACITY`] covers every
/// formatter used on the wire, so the writes cannot fall short.
fn line(args: core::fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    let _ = out.write_fmt(args);
    let _ = out.push_str(EOL);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_places_cursor_at_head() {
        let mut log = SampleLog::<8>::new();
        log.record(20);
        log.record(21);

        let mut reporter = Reporter::new();
        assert_eq!(reporter.stage(), ReportStage::Idle);
        reporter.start(&log, 0);
        assert_eq!(reporter.stage(), ReportStage::Streaming);
        assert_eq!(reporter.read_idx, log.head());
        assert_eq!(reporter.stop_idx, log.head());
    }

    #[test]
    fn test_header_rounds_elapsed_to_minutes() {
        let log = SampleLog::<8>::new();
        let mut reporter = Reporter::new();

        assert_eq!(reporter.start(&log, 0).as_str(), "@ 0 15\r\n");
        assert_eq!(reporter.start(&log, 29).as_str(), "@ 0 15\r\n");
        assert_eq!(reporter.start(&log, 30).as_str(), "@ 1 15\r\n");
        assert_eq!(reporter.start(&log, 90).as_str(), "@ 2 15\r\n");
    }

    #[test]
    fn test_full_log_drains_in_capacity_events() {
        let mut log = SampleLog::<4>::new();
        for sample in [10, 20, 30, 40] {
            log.record(sample);
        }

        let mut reporter = Reporter::new();
        reporter.start(&log, 0);
        let mut streamed = 0;
        while reporter.stage() == ReportStage::Streaming {
            reporter.next_line(&log).unwrap();
            streamed += 1;
        }
        assert_eq!(streamed, log.capacity(), "full loop visits every slot once");
        assert_eq!(reporter.stage(), ReportStage::Finishing);

        assert_eq!(reporter.next_line(&log).unwrap().as_str(), "==\r\n");
        assert_eq!(reporter.stage(), ReportStage::Idle);
        assert!(reporter.next_line(&log).is_none());
    }
}
