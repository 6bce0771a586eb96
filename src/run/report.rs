//! Run summary printed before and after dispatch

use std::fmt::Write as _;
use std::time::Duration;

/// Counts describing a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries found in the directory
    pub candidates: usize,
    /// Entries selected to run
    pub to_run: usize,
    /// Names listed as single-run
    pub single: usize,
    /// Names listed as skipped
    pub skipped: usize,
    /// Configured tests per invocation
    pub batch_size: usize,
    /// Invocations dispatched
    pub units: usize,
    /// Invocations terminated by a signal
    pub crashed: usize,
    /// Invocations killed after the timeout
    pub timed_out: usize,
    /// Invocations that could not be started
    pub failed_to_start: usize,
    /// Invocations whose exit status could not be collected
    pub lost: usize,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whether any invocation ended abnormally
    pub fn has_failures(&self) -> bool {
        self.abnormal() > 0
    }

    /// Invocations that did not run to a normal exit
    pub fn abnormal(&self) -> usize {
        self.crashed + self.timed_out + self.failed_to_start + self.lost
    }

    /// Lines printed before the first invocation
    pub fn header(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TESTRUN: Total tests: {}", self.candidates);
        let _ = writeln!(out, "TESTRUN: Tests to run multiple : {}", self.to_run);
        let _ = writeln!(out, "TESTRUN: Tests to run single: {}", self.single);
        let _ = writeln!(out, "TESTRUN: Tests skipped: {}", self.skipped);
        let _ = write!(out, "TESTRUN: Tests to run per invocation: {}", self.batch_size);
        out
    }

    /// Lines printed after the last invocation
    pub fn footer(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TESTRUN: Total tests: {}", self.candidates);
        let _ = writeln!(out, "TESTRUN: Tests to run multiple : {}", self.to_run);
        let _ = writeln!(out, "TESTRUN: Tests to run single: {}", self.single);
        let _ = writeln!(out, "TESTRUN: Tests skipped: {}", self.skipped);
        let _ = writeln!(out, "TESTRUN: Tests run per invocation: {}", self.batch_size);
        let _ = writeln!(out, "TESTRUN: Units crashed: {}", self.crashed);
        if self.timed_out > 0 {
            let _ = writeln!(out, "TESTRUN: Units timed out: {}", self.timed_out);
        }
        if self.failed_to_start > 0 {
            let _ = writeln!(out, "TESTRUN: Units failed to start: {}", self.failed_to_start);
        }
        if self.lost > 0 {
            let _ = writeln!(out, "TESTRUN: Units lost: {}", self.lost);
        }
        let _ = write!(out, "TESTRUN: Time to run tests: {}s", self.elapsed.as_secs());
        out
    }
}
