//! Integration Test: Unwrap Prohibition
//!
//! **Policy**: Production code MUST NOT call `unwrap()` or `expect()`.
//! Library code returns `Result` (thiserror), the binary uses `anyhow`, and
//! fire-and-forget paths (sound cues, notices) log and move on.
//!
//! **Exceptions**: test modules.

use architectural_enforcement::{production_sources, violation};

#[test]
fn test_no_unwrap_in_production_code() {
    let mut violations = Vec::new();

    for file in production_sources() {
        for (line_number, code) in file.code_lines() {
            if code.contains(".unwrap()") || code.contains(".expect(") {
                violations.push(violation(&file, line_number, code));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: unwrap()/expect() found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ Use instead:");
        eprintln!("  - `?` with ConfigError / anyhow::Context");
        eprintln!("  - match + tracing::warn!/debug! for fire-and-forget paths");

        panic!(
            "\nFound {} unwrap violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_production_sources_found() {
    let files = production_sources();
    assert!(files.iter().any(|f| f.path.ends_with("sequence.rs")));
    assert!(files.iter().any(|f| f.path.ends_with("app.rs")));
}
