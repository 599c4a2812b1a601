//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. The boot driver
//! waits on its next timer deadline (`sleep_until`) and the TUI redraws on a
//! `tokio::time::interval`; nothing ever sleeps to poll.
//!
//! **Exceptions**: test modules (`#[cfg(test)]`), which drive paused clocks.

use architectural_enforcement::{production_sources, violation};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - tokio::time::sleep_until(next_deadline) in the boot driver");
        eprintln!("  - tokio::time::interval() for frame ticks");
        eprintln!("  - Test code (#[cfg(test)] modules, tests/ directories)");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - std::thread::sleep anywhere");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for file in production_sources() {
        for (line_number, code) in file.code_lines() {
            if code.contains("::sleep(") || code.contains(".sleep(") {
                violations.push(violation(&file, line_number, code));
            }
        }
    }

    violations
}

#[test]
fn test_driver_waits_on_deadlines() {
    let driver = production_sources()
        .into_iter()
        .find(|file| file.path.ends_with("nexus/core/src/driver.rs"))
        .expect("driver.rs not found");

    assert!(
        driver.lines.iter().any(|line| line.contains("sleep_until(")),
        "boot driver should wait for the next timer deadline"
    );
}
