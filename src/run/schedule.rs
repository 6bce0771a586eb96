//! Grouping of tests into dispatch units

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a unit contains the tests it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Up to `batch_size` ordinary tests
    Batch,
    /// A test whose name contains `http`
    Http,
    /// A test listed with `^` in the skip file
    Single,
}

/// One external invocation's worth of test paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchUnit {
    pub kind: UnitKind,
    pub paths: Vec<PathBuf>,
}

impl DispatchUnit {
    fn singleton(kind: UnitKind, path: PathBuf) -> Self {
        DispatchUnit {
            kind,
            paths: vec![path],
        }
    }

    /// Paths joined with single spaces
    pub fn joined(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for DispatchUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Accumulator state for batching a run list
///
/// Feed every run-list entry through [`Scheduler::push`] in order, then call
/// [`Scheduler::finish`]. Each call yields at most one unit.
#[derive(Debug)]
pub struct Scheduler<'a> {
    batch_size: usize,
    total: usize,
    single: &'a BTreeSet<String>,
    current: Vec<PathBuf>,
    batch_count: usize,
    processed: usize,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler for a run list of `total` entries
    pub fn new(batch_size: usize, total: usize, single: &'a BTreeSet<String>) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }

        Ok(Scheduler {
            batch_size,
            total,
            single,
            current: Vec::new(),
            batch_count: 0,
            processed: 0,
        })
    }

    /// Feed the next entry, returning a unit if one is ready
    pub fn push(&mut self, name: &str, path: PathBuf) -> Option<DispatchUnit> {
        self.processed += 1;

        if name.contains("http") {
            return Some(DispatchUnit::singleton(UnitKind::Http, path));
        }
        if self.single.contains(name) {
            return Some(DispatchUnit::singleton(UnitKind::Single, path));
        }

        self.current.push(path);

        if self.batch_count + 1 == self.batch_size || self.processed == self.total {
            self.flush()
        } else {
            self.batch_count += 1;
            None
        }
    }

    /// Flush whatever is still accumulated
    ///
    /// Only non-empty when the run list ended on an http or single-run entry
    /// while ordinary tests were still waiting for a full batch.
    pub fn finish(mut self) -> Option<DispatchUnit> {
        self.flush()
    }

    fn flush(&mut self) -> Option<DispatchUnit> {
        self.batch_count = 0;
        if self.current.is_empty() {
            return None;
        }
        Some(DispatchUnit {
            kind: UnitKind::Batch,
            paths: std::mem::take(&mut self.current),
        })
    }
}

/// Group a whole run list into dispatch units, in dispatch order
pub fn schedule(
    dir: &Path,
    run_list: &[String],
    single: &BTreeSet<String>,
    batch_size: usize,
) -> Result<Vec<DispatchUnit>> {
    let mut scheduler = Scheduler::new(batch_size, run_list.len(), single)?;
    let mut units: Vec<DispatchUnit> = run_list
        .iter()
        .filter_map(|name| scheduler.push(name, dir.join(name)))
        .collect();
    units.extend(scheduler.finish());
    Ok(units)
}
