//! testbatch - dispatch test scripts to a device shell, desktop binary or browser
//!
//! ## Usage
//!
//! ```bash
//! # Run every .js test in test/simple with ./node
//! testbatch desktop test/simple
//!
//! # Only tests matching "http", through the browser helper
//! testbatch browser test/simple http
//!
//! # On the device, eight tests per invocation, failing the run on crashes
//! testbatch shell test/simple --batch-size 8 --strict
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use testbatch_rs::{run, RunParams, Target};
use tracing_subscriber::EnvFilter;

/// Discover test scripts in a directory and dispatch them in batches
#[derive(Parser, Debug)]
#[command(name = "testbatch")]
#[command(version)]
#[command(about = "Dispatch test scripts to a device shell, desktop binary or browser harness")]
#[command(after_help = "eg.    $> testbatch browser test/simple http")]
struct Cli {
    /// Where to run the tests: shell, desktop or browser
    target: Target,

    /// Directory containing the test scripts
    directory: PathBuf,

    /// Only run tests whose names contain a match for this regex
    pattern: Option<String>,

    /// Maximum number of tests per invocation
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// File name suffix of test scripts
    #[arg(long)]
    suffix: Option<String>,

    /// Name of the skip file inside the test directory
    #[arg(long)]
    skip_file: Option<String>,

    /// Interpreter binary for desktop runs
    #[arg(long)]
    interpreter: Option<String>,

    /// Command that reaches the device for shell runs
    #[arg(long)]
    bridge: Option<String>,

    /// Helper script for browser runs
    #[arg(long)]
    browser_helper: Option<PathBuf>,

    /// Kill an invocation after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Exit non-zero if any invocation crashed
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn params(&self) -> Result<RunParams> {
        let mut params = RunParams::new();

        if let Some(pattern) = &self.pattern {
            params = params
                .pattern(pattern)
                .with_context(|| format!("invalid pattern '{}'", pattern))?;
        }
        if let Some(size) = self.batch_size {
            params = params.batch_size(size);
        }
        if let Some(suffix) = &self.suffix {
            params = params.suffix(suffix);
        }
        if let Some(skip_file) = &self.skip_file {
            params = params.directive_file(skip_file);
        }
        if let Some(interpreter) = &self.interpreter {
            params = params.interpreter(interpreter);
        }
        if let Some(bridge) = &self.bridge {
            params = params.bridge(bridge);
        }
        if let Some(helper) = &self.browser_helper {
            params = params.browser_helper(helper);
        }
        if let Some(secs) = self.timeout {
            params = params.timeout(Some(Duration::from_secs(secs)));
        }
        if self.strict {
            params = params.strict(true);
        }

        Ok(params)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("testbatch={level},testbatch_rs={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let params = cli.params()?;
    let summary = run::run_since(started, cli.target, &cli.directory, &params)
        .with_context(|| format!("running tests in {}", cli.directory.display()))?;

    if params.strict && summary.has_failures() {
        tracing::error!(
            crashed = summary.crashed,
            timed_out = summary.timed_out,
            failed_to_start = summary.failed_to_start,
            lost = summary.lost,
            "run had abnormal invocations"
        );
        std::process::exit(1);
    }

    Ok(())
}
