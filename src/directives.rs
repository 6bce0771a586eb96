//! Parser for per-directory skip files
//!
//! A skip file is line oriented:
//! 1. Blank lines and lines starting with `#` are ignored
//! 2. `^name` forces `name` to run in its own invocation
//! 3. Any other line names a test to skip

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Skip and single-run sets read from a skip file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Test names that are not run at all
    pub skip: BTreeSet<String>,
    /// Test names that always run alone
    pub single: BTreeSet<String>,
}

impl Directives {
    /// Whether `name` is listed as skipped
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip.contains(name)
    }

    /// Whether `name` must be dispatched on its own
    pub fn is_single(&self, name: &str) -> bool {
        self.single.contains(name)
    }
}

/// Parse skip file contents into directives
///
/// Lines are trimmed before classification, so indented comments and
/// markers are recognized too. Duplicate names collapse.
pub fn parse(content: &str) -> Directives {
    let mut directives = Directives::default();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(name) = trimmed.strip_prefix('^') {
            directives.single.insert(name.to_string());
        } else {
            directives.skip.insert(trimmed.to_string());
        }
    }

    directives
}

/// Load directives from `dir/file_name`
///
/// A missing or unreadable file is not an error: a warning is printed and
/// every test is run.
pub fn load(dir: &Path, file_name: &str) -> Directives {
    let path = dir.join(file_name);

    match fs::read_to_string(&path) {
        Ok(content) => {
            let directives = parse(&content);
            tracing::debug!(
                path = %path.display(),
                skip = directives.skip.len(),
                single = directives.single.len(),
                "loaded skip file"
            );
            directives
        }
        Err(e) => {
            println!("{}: I/O error: {}", path.display(), e);
            println!("Warning: No skip file provided, running all tests");
            tracing::warn!(path = %path.display(), error = %e, "skip file unavailable");
            Directives::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skip_and_single() {
        let directives = parse("b.js\n^z.js\n");
        assert!(directives.is_skipped("b.js"));
        assert!(directives.is_single("z.js"));
        assert!(!directives.is_skipped("z.js"));
        assert!(!directives.is_single("b.js"));
    }

    #[test]
    fn test_parse_ignores_comments_and_blank_lines() {
        let content = r#"# flaky on device
test-a.js

   # indented comment

test-b.js"#;

        let directives = parse(content);
        assert_eq!(directives.skip.len(), 2);
        assert!(directives.single.is_empty());
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let directives = parse("  test-a.js  \n\t^test-b.js \r\n");
        assert!(directives.is_skipped("test-a.js"));
        assert!(directives.is_single("test-b.js"));
    }

    #[test]
    fn test_parse_duplicates_collapse() {
        let directives = parse("a.js\na.js\n^b.js\n^b.js\n");
        assert_eq!(directives.skip.len(), 1);
        assert_eq!(directives.single.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let directives = load(temp_dir.path(), "skip.browser");
        assert_eq!(directives, Directives::default());
    }

    #[test]
    fn test_load_reads_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        fs::write(temp_dir.path().join("skip.browser"), "b.js\n^z.js\n").unwrap();

        let directives = load(temp_dir.path(), "skip.browser");
        assert!(directives.is_skipped("b.js"));
        assert!(directives.is_single("z.js"));
    }
}
