//! Test dispatch module

pub mod execution;
pub mod params;
pub mod report;
pub mod schedule;
pub mod target;

// Re-export public types
pub use execution::{dispatch, Outcome};
pub use params::RunParams;
pub use report::RunSummary;
pub use schedule::{schedule, DispatchUnit, Scheduler, UnitKind};
pub use target::{Invocation, Target};

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Discover the tests in `dir` and dispatch them to `target`
///
/// Units run one after another; a crashed unit is reported and the run moves
/// on. Errors are returned only for problems that stop the whole run, such as
/// a missing directory.
pub fn run(target: Target, dir: &Path, params: &RunParams) -> Result<RunSummary> {
    run_since(Instant::now(), target, dir, params)
}

/// Like [`run`], measuring elapsed time from `started`
pub fn run_since(
    started: Instant,
    target: Target,
    dir: &Path,
    params: &RunParams,
) -> Result<RunSummary> {
    let directives = crate::directives::load(dir, &params.directive_file);
    let listing = crate::discovery::discover(
        dir,
        &directives,
        params.pattern.as_ref(),
        &params.suffix,
    )?;

    let mut scheduler = Scheduler::new(params.batch_size, listing.to_run.len(), &directives.single)?;

    // The skip file sits next to the tests but is not one
    let candidates = listing
        .candidates
        .iter()
        .filter(|name| **name != params.directive_file)
        .count();

    let mut summary = RunSummary {
        candidates,
        to_run: listing.to_run.len(),
        single: directives.single.len(),
        skipped: directives.skip.len(),
        batch_size: params.batch_size,
        ..Default::default()
    };

    println!("{}", summary.header());
    let _ = std::io::stdout().flush();

    tracing::info!(
        dir = %dir.display(),
        tests = listing.to_run.len(),
        "starting {} run",
        target
    );

    let mut record = |unit: DispatchUnit| {
        let outcome = dispatch(target, &unit, params);
        summary.units += 1;
        match outcome {
            Outcome::Exited(_) => {}
            Outcome::Signaled(_) => summary.crashed += 1,
            Outcome::TimedOut => summary.timed_out += 1,
            Outcome::SpawnFailed(_) => summary.failed_to_start += 1,
            Outcome::WaitFailed(_) => summary.lost += 1,
        }
    };

    for name in &listing.to_run {
        if let Some(unit) = scheduler.push(name, dir.join(name)) {
            record(unit);
        }
    }
    if let Some(unit) = scheduler.finish() {
        record(unit);
    }

    summary.elapsed = started.elapsed();
    println!("{}", summary.footer());
    let _ = std::io::stdout().flush();

    Ok(summary)
}
