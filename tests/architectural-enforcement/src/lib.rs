//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No blocking or polling sleeps in production code (wait on timers and I/O)
//! - No `unwrap()` / `expect()` in production code (propagate or log instead)
//!
//! The helpers here collect production sources: every `.rs` file under a
//! crate's `src/`, cut at the first `#[cfg(test)]` so unit test modules don't
//! count.

use std::fs;
use std::path::{Path, PathBuf};

/// Crates whose sources are checked, relative to the workspace root
pub const PRODUCTION_CRATES: &[&str] = &["nexus/core/src", "tui/src"];

/// A production source file, test module stripped
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Lines before the first `#[cfg(test)]`
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn parse(path: PathBuf, content: &str) -> Self {
        let lines = content
            .lines()
            .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
            .map(str::to_owned)
            .collect();
        Self { path, lines }
    }

    /// Lines with `//` comments removed, paired with 1-based line numbers
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code)
        })
    }
}

/// Workspace root, found from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All production sources of the checked crates
pub fn production_sources() -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files = Vec::new();

    for dir in PRODUCTION_CRATES {
        let path = root.join(dir);
        if !path.exists() {
            continue;
        }

        for entry in walkdir::WalkDir::new(&path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(entry.path()) {
                files.push(SourceFile::parse(entry.path().to_path_buf(), &content));
            }
        }
    }

    files
}

/// Format a violation for the failure report
pub fn violation(file: &SourceFile, line_number: usize, line: &str) -> String {
    format!("{}:{} - {}", file.path.display(), line_number, line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stops_at_test_module() {
        let file = SourceFile::parse(
            PathBuf::from("x.rs"),
            "fn a() {}\n\n#[cfg(test)]\nmod tests {\n    fn b() { x.unwrap(); }\n}\n",
        );
        assert_eq!(file.lines.len(), 2);
    }

    #[test]
    fn test_code_lines_strip_comments() {
        let file = SourceFile::parse(PathBuf::from("x.rs"), "let a = 1; // .unwrap()\n");
        let lines: Vec<_> = file.code_lines().collect();
        assert_eq!(lines, vec![(1, "let a = 1; ")]);
    }

    #[test]
    fn test_production_crates_exist() {
        let root = workspace_root();
        for dir in PRODUCTION_CRATES {
            assert!(root.join(dir).exists(), "missing {dir}");
        }
    }
}
