//! Configuration parameters for a test run

use crate::error::Result;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

/// Default file name of the per-directory skip file
pub const DEFAULT_SKIP_FILE: &str = "skip.browser";

/// Default suffix of test scripts
pub const DEFAULT_SUFFIX: &str = ".js";

/// Default name of the browser helper script, looked up next to the executable
pub const BROWSER_HELPER_NAME: &str = "node_browser.sh";

/// Configuration parameters for dispatching tests
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Maximum number of ordinary tests per invocation
    pub batch_size: usize,
    /// Only tests whose names match are run; `None` runs everything
    pub pattern: Option<Regex>,
    /// File name suffix of test scripts
    pub suffix: String,
    /// Name of the skip file inside the test directory
    pub directive_file: String,
    /// Interpreter binary for desktop runs
    pub interpreter: String,
    /// Command prefix that reaches the device, e.g. `adb shell`
    pub bridge: Vec<String>,
    /// Shell used to run the browser helper
    pub browser_shell: String,
    /// Script that drives the browser
    pub browser_helper: PathBuf,
    /// Kill an invocation that runs longer than this
    pub timeout: Option<Duration>,
    /// Report failure when any invocation crashed
    pub strict: bool,
}

impl RunParams {
    /// Create a new RunParams with default settings
    ///
    /// Defaults can be overridden through `TESTBATCH_*` environment variables.
    pub fn new() -> Self {
        let mut params = Self::defaults();

        if let Some(size) = env_parse::<usize>("TESTBATCH_BATCH_SIZE").filter(|n| *n > 0) {
            params.batch_size = size;
        }
        if let Some(suffix) = env_string("TESTBATCH_SUFFIX") {
            params.suffix = suffix;
        }
        if let Some(name) = env_string("TESTBATCH_SKIP_FILE") {
            params.directive_file = name;
        }
        if let Some(interpreter) = env_string("TESTBATCH_INTERPRETER") {
            params.interpreter = interpreter;
        }
        if let Some(bridge) = env_string("TESTBATCH_BRIDGE") {
            params.bridge = split_words(&bridge);
        }
        if let Some(helper) = env_string("TESTBATCH_BROWSER_HELPER") {
            params.browser_helper = PathBuf::from(helper);
        }
        if let Some(secs) = env_parse::<u64>("TESTBATCH_TIMEOUT") {
            params.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(strict) = env_string("TESTBATCH_STRICT") {
            params.strict = strict == "1" || strict.to_lowercase() == "true";
        }

        params
    }

    /// Built-in defaults, ignoring the environment
    pub fn defaults() -> Self {
        RunParams {
            batch_size: 1,
            pattern: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            directive_file: DEFAULT_SKIP_FILE.to_string(),
            interpreter: "./node".to_string(),
            bridge: split_words("adb shell"),
            browser_shell: "sh".to_string(),
            browser_helper: default_browser_helper(),
            timeout: None,
            strict: false,
        }
    }

    /// Set the batch size
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Restrict the run to tests whose names match `pattern`
    pub fn pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Set the test file suffix
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Set the skip file name
    pub fn directive_file(mut self, name: &str) -> Self {
        self.directive_file = name.to_string();
        self
    }

    /// Set the interpreter binary
    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.interpreter = interpreter.to_string();
        self
    }

    /// Set the device bridge command, split on whitespace
    pub fn bridge(mut self, bridge: &str) -> Self {
        self.bridge = split_words(bridge);
        self
    }

    /// Set the browser helper script
    pub fn browser_helper(mut self, helper: impl Into<PathBuf>) -> Self {
        self.browser_helper = helper.into();
        self
    }

    /// Set the shell that runs the browser helper
    pub fn browser_shell(mut self, shell: &str) -> Self {
        self.browser_shell = shell.to_string();
        self
    }

    /// Set a per-invocation timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable strict exit status
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Interpreter name as invoked on the device (`./node` becomes `node`)
    pub fn remote_interpreter(&self) -> String {
        std::path::Path::new(&self.interpreter)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.interpreter.clone())
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self::new()
    }
}

fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|v| v.trim().parse().ok())
}

/// The browser helper lives next to the running executable
fn default_browser_helper() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(BROWSER_HELPER_NAME)))
        .unwrap_or_else(|| PathBuf::from(BROWSER_HELPER_NAME))
}
