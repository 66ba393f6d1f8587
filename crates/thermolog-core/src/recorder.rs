//! Shared context joining the history and the report machinery.

use crate::clock::Jiffies;
use crate::history::SampleLog;
use crate::report::{Line, ReportStage, Reporter};

/// The one process-wide state block shared between the sampling side and
/// the serial side.
///
/// Writer roles: the sampling loop calls [`record`](Self::record); the
/// serial side drives everything else. Callers serialize access with a
/// blocking mutex around short lock scopes — none of these operations
/// block or wait.
#[derive(Debug)]
pub struct Recorder<const N: usize> {
    log: SampleLog<N>,
    reporter: Reporter,
}

impl<const N: usize> Recorder<N> {
    pub const fn new() -> Self {
        Self {
            log: SampleLog::new(),
            reporter: Reporter::new(),
        }
    }

    /// Store one calibrated sample, overwriting the oldest when full.
    pub fn record(&mut self, degrees: u8) {
        self.log.record(degrees);
    }

    /// Drop all history. Safe at any time; a report in flight simply runs
    /// into vacant slots and finishes.
    pub fn clear(&mut self) {
        self.log.clear();
        log::info!("history cleared");
    }

    /// Trigger (or restart) a report; returns the header line.
    pub fn start_report(&mut self, elapsed: Jiffies) -> Line {
        self.reporter.start(&self.log, elapsed)
    }

    /// One report line per completed transmission; `None` when idle.
    pub fn next_report_line(&mut self) -> Option<Line> {
        self.reporter.next_line(&self.log)
    }

    pub fn report_stage(&self) -> ReportStage {
        self.reporter.stage()
    }

    pub fn log(&self) -> &SampleLog<N> {
        &self.log
    }
}

impl<const N: usize> Default for Recorder<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trigger a report and assert the exact emitted sequence, header and
    /// closing line included.
    fn assert_report<const N: usize>(recorder: &mut Recorder<N>, expected: &[&str]) {
        let header = recorder.start_report(0);
        assert_eq!(header.as_str(), expected[0]);
        for want in &expected[1..] {
            let got = recorder.next_report_line().expect("report ended early");
            assert_eq!(got.as_str(), *want);
        }
        assert!(recorder.next_report_line().is_none(), "report must be drained");
        assert_eq!(recorder.report_stage(), ReportStage::Idle);
    }

    #[test]
    fn test_partial_history_streams_newest_first() {
        let mut recorder = Recorder::<4>::new();
        for sample in [1, 2, 3] {
            recorder.record(sample);
        }

        assert_report(
            &mut recorder,
            &["@ 0 15\r\n", "3\r\n", "2\r\n", "1\r\n", "==\r\n"],
        );
    }

    #[test]
    fn test_overwritten_history_keeps_most_recent_capacity() {
        let mut recorder = Recorder::<4>::new();
        for sample in [1, 2, 3, 4, 5] {
            recorder.record(sample);
        }

        // The oldest sample (1) is unrecoverable.
        assert_report(
            &mut recorder,
            &["@ 0 15\r\n", "5\r\n", "4\r\n", "3\r\n", "2\r\n", "==\r\n"],
        );
    }

    #[test]
    fn test_empty_history_reports_header_then_terminator() {
        let mut recorder = Recorder::<4>::new();
        recorder.record(7);
        recorder.clear();

        assert_report(&mut recorder, &["@ 0 15\r\n", "==\r\n"]);
    }

    #[test]
    fn test_retrigger_restarts_cursor_at_head() {
        let mut recorder = Recorder::<4>::new();
        for sample in [1, 2, 3] {
            recorder.record(sample);
        }

        recorder.start_report(0);
        assert_eq!(recorder.next_report_line().unwrap().as_str(), "3\r\n");

        // A second trigger mid-stream abandons the walk and starts over.
        assert_report(
            &mut recorder,
            &["@ 0 15\r\n", "3\r\n", "2\r\n", "1\r\n", "==\r\n"],
        );
    }

    #[test]
    fn test_clear_during_report_finishes_early() {
        let mut recorder = Recorder::<4>::new();
        for sample in [1, 2, 3] {
            recorder.record(sample);
        }

        recorder.start_report(0);
        assert_eq!(recorder.next_report_line().unwrap().as_str(), "3\r\n");
        recorder.clear();

        // The cursor now walks vacant slots: one zero-valued line (the
        // sentinel ambiguity), then the report closes.
        assert_eq!(recorder.next_report_line().unwrap().as_str(), "0\r\n");
        assert_eq!(recorder.next_report_line().unwrap().as_str(), "==\r\n");
        assert!(recorder.next_report_line().is_none());
    }
}
