//! Dispatching units to external processes

use crate::error::{Error, Result};
use crate::run::params::RunParams;
use crate::run::schedule::DispatchUnit;
use crate::run::target::{Invocation, Target};
use std::io::{self, Write};
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The process exited normally with this code
    Exited(i32),
    /// The process was terminated by a signal
    Signaled(i32),
    /// The process outlived the configured timeout and was killed
    TimedOut,
    /// The process could not be started
    SpawnFailed(String),
    /// The process started but its exit status could not be collected
    WaitFailed(String),
}

impl Outcome {
    fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Outcome::Exited(code),
            None => Outcome::Signaled(termination_signal(&status)),
        }
    }

    fn from_wait(waited: io::Result<ExitStatus>) -> Self {
        match waited {
            Ok(status) => Outcome::from_status(status),
            Err(e) => Outcome::WaitFailed(e.to_string()),
        }
    }

    /// Label used in the per-unit notice, if the outcome gets one
    pub fn notice_label(&self) -> Option<&'static str> {
        match self {
            Outcome::Exited(_) => None,
            Outcome::Signaled(_) => Some("CRASHED"),
            Outcome::TimedOut => Some("TIMED OUT"),
            Outcome::SpawnFailed(_) => Some("FAILED TO START"),
            Outcome::WaitFailed(_) => Some("LOST"),
        }
    }

    /// Whether the process died from a signal
    pub fn is_crash(&self) -> bool {
        matches!(self, Outcome::Signaled(_))
    }

    /// Whether the invocation did not run to a normal exit
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Outcome::Exited(_))
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(-1)
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> i32 {
    -1
}

/// Run one unit on `target` and wait for it to finish
///
/// Never fails: problems starting or waiting for the process are printed and
/// returned as the outcome so the caller can move on to the next unit.
pub fn dispatch(target: Target, unit: &DispatchUnit, params: &RunParams) -> Outcome {
    let invocation = target.invocation(unit, params);

    println!("TESTSTR ({}): {}", target, invocation);
    // Flush so child output lands after the command line
    let _ = std::io::stdout().flush();

    tracing::debug!(kind = ?unit.kind, tests = unit.paths.len(), "dispatching unit");

    let outcome = match run_invocation(&invocation, params.timeout) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("{}", e);
            Outcome::SpawnFailed(e.to_string())
        }
    };

    match &outcome {
        Outcome::Exited(code) => tracing::debug!(code, "unit finished"),
        Outcome::Signaled(signal) => tracing::warn!(signal, unit = %unit, "unit crashed"),
        Outcome::TimedOut => tracing::warn!(unit = %unit, "unit timed out"),
        Outcome::SpawnFailed(_) => {}
        Outcome::WaitFailed(reason) => {
            tracing::error!(unit = %unit, "lost track of unit: {}", reason)
        }
    }
    if let Some(label) = outcome.notice_label() {
        notice(&format!("Test ** {} **: {}", label, unit));
    }

    outcome
}

fn run_invocation(invocation: &Invocation, timeout: Option<Duration>) -> Result<Outcome> {
    let mut child = invocation
        .to_command()
        .spawn()
        .map_err(|e| Error::spawn_error(invocation.to_string(), e))?;

    let outcome = match timeout {
        None => Outcome::from_wait(child.wait()),
        Some(limit) => match child.wait_timeout(limit) {
            Ok(Some(status)) => Outcome::from_status(status),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                Outcome::TimedOut
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Outcome::WaitFailed(e.to_string())
            }
        },
    };

    Ok(outcome)
}

/// Print a notice line, in red when colors are enabled and stdout is a terminal
fn notice(message: &str) {
    #[cfg(feature = "colors")]
    {
        if atty::is(atty::Stream::Stdout) {
            use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            let _ = writeln!(stdout, "{}", message);
            let _ = stdout.reset();
            let _ = stdout.flush();
            return;
        }
    }

    println!("{}", message);
    let _ = std::io::stdout().flush();
}

/// Extension trait to add `wait_timeout` to `Child`
trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<ExitStatus>> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(poll_interval);
                }
            }
        }
    }
}
