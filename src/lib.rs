//! # testbatch-rs
//!
//! Discovers test scripts in a directory and dispatches them, in batches, to
//! an interpreter on a connected device, a local interpreter binary, or a
//! browser harness.
//!
//! Which tests run is controlled by a name pattern and a per-directory skip
//! file. Tests whose names contain `http`, and tests marked with `^` in the
//! skip file, always run in an invocation of their own.

pub mod directives;
pub mod discovery;
pub mod error;
pub mod run;

pub use directives::Directives;
pub use discovery::Listing;
pub use error::{Error, Result};
pub use run::{DispatchUnit, Outcome, RunParams, RunSummary, Target, UnitKind};

use std::path::PathBuf;
use std::time::Duration;

/// Builder for configuring and running a batch of test scripts
///
/// # Examples
///
/// ```no_run
/// use testbatch_rs::{testbatch, Target};
///
/// // Run every .js file in test/simple with the desktop interpreter
/// testbatch::run("test/simple").execute().unwrap();
///
/// // Only http tests, on the device, four per invocation
/// let summary = testbatch::run("test/simple")
///     .target(Target::Shell)
///     .pattern("http")
///     .batch_size(4)
///     .execute()
///     .unwrap();
/// println!("{} units crashed", summary.crashed);
/// ```
pub struct Builder {
    dir: PathBuf,
    target: Target,
    pattern: Option<String>,
    params: RunParams,
}

impl Builder {
    /// Create a new builder for the given test directory
    fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            target: Target::Desktop,
            pattern: None,
            params: RunParams::new(),
        }
    }

    /// Replace the base configuration (environment-derived by default)
    pub fn params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }

    /// Choose where tests are executed (default: desktop)
    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Only run tests whose names contain a match for this regex
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Maximum number of ordinary tests per invocation
    pub fn batch_size(mut self, size: usize) -> Self {
        self.params = self.params.batch_size(size);
        self
    }

    /// File name suffix that marks a test script
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.params = self.params.suffix(suffix);
        self
    }

    /// Name of the skip file inside the test directory
    pub fn skip_file(mut self, name: &str) -> Self {
        self.params = self.params.directive_file(name);
        self
    }

    /// Interpreter binary used for desktop runs
    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.params = self.params.interpreter(interpreter);
        self
    }

    /// Command prefix used to reach the device for shell runs
    pub fn bridge(mut self, bridge: &str) -> Self {
        self.params = self.params.bridge(bridge);
        self
    }

    /// Helper script used for browser runs
    pub fn browser_helper(mut self, helper: impl Into<PathBuf>) -> Self {
        self.params = self.params.browser_helper(helper);
        self
    }

    /// Kill any invocation that runs longer than `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.params = self.params.timeout(Some(timeout));
        self
    }

    /// Treat crashed invocations as a failed run
    ///
    /// With strict mode on, [`Builder::execute`] returns an error if any
    /// invocation crashed, timed out, could not be started or was lost.
    pub fn strict(mut self, strict: bool) -> Self {
        self.params = self.params.strict(strict);
        self
    }

    /// Discover and dispatch the tests
    ///
    /// # Returns
    /// The run summary. Crashed invocations are not errors unless strict mode
    /// is enabled.
    pub fn execute(self) -> Result<RunSummary> {
        let params = match &self.pattern {
            Some(pattern) => self.params.pattern(pattern)?,
            None => self.params,
        };

        let summary = run::run(self.target, &self.dir, &params)?;

        if params.strict && summary.has_failures() {
            return Err(Error::Generic(format!(
                "{} of {} invocations did not finish normally",
                summary.abnormal(),
                summary.units
            )));
        }

        Ok(summary)
    }
}

/// Entry point for the builder API
pub mod testbatch {
    use super::*;

    /// Create a new testbatch builder for the given directory
    pub fn run(dir: impl Into<PathBuf>) -> Builder {
        Builder::new(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory_runs_nothing() {
        let temp_dir = TempDir::new().unwrap();

        let summary = testbatch::run(temp_dir.path())
            .params(RunParams::defaults())
            .interpreter("/nonexistent/interpreter")
            .execute()
            .unwrap();
        assert_eq!(summary.candidates, 0);
        assert_eq!(summary.to_run, 0);
        assert_eq!(summary.units, 0);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.js"), "").unwrap();

        let result = testbatch::run(temp_dir.path())
            .params(RunParams::defaults())
            .pattern("(")
            .execute();
        assert!(matches!(result, Err(Error::Regex(_))));
    }

    #[test]
    fn test_zero_batch_size_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = testbatch::run(temp_dir.path())
            .params(RunParams::defaults())
            .batch_size(0)
            .execute();
        assert!(matches!(result, Err(Error::InvalidBatchSize)));
    }
}
