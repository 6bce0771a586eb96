//! Test discovery
//!
//! Lists a directory (non-recursive), sorts the entries and filters them down
//! to the tests that should run.

use crate::directives::Directives;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Result of scanning a test directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Every entry in the directory, sorted (display form)
    pub candidates: Vec<String>,
    /// Entries that passed all filters, in the same order
    pub to_run: Vec<String>,
}

/// Scan `dir` and select the tests to run
///
/// An entry is selected when it is not skipped, `pattern` (if any) matches
/// somewhere in its name, and its name ends with `suffix`.
pub fn discover(
    dir: &Path,
    directives: &Directives,
    pattern: Option<&Regex>,
    suffix: &str,
) -> Result<Listing> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        names.push(entry.file_name().to_os_string());
    }

    // Byte order, same as a plain string sort
    names.sort();

    let mut candidates = Vec::with_capacity(names.len());
    let mut to_run = Vec::new();
    for os_name in &names {
        candidates.push(os_name.to_string_lossy().into_owned());

        // Run-list names are joined back onto `dir`, so they must round-trip exactly
        let Some(name) = os_name.to_str() else {
            tracing::warn!(name = ?os_name, "ignoring entry with a non UTF-8 name");
            continue;
        };

        if !directives.is_skipped(name)
            && pattern.map_or(true, |re| re.is_match(name))
            && name.ends_with(suffix)
        {
            to_run.push(name.to_string());
        }
    }

    Ok(Listing { candidates, to_run })
}
