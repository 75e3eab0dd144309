//! Simple validation example: run DRC on a board file and print results.

use boardguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), BoardGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/violations.pcb.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/board.pcb.json]");
        std::process::exit(1);
    }

    let result = BoardGuardCore::validate_board(path, &ValidationOptions::default())?;

    println!("DRC results for: {}", result.file.display());
    println!("Objects checked: {}", result.stats.objects);
    println!("Total violations: {}", result.total_issues());
    println!();

    for violation in &result.violations {
        println!(
            "  [{:?}] {} at ({:.2}, {:.2})",
            violation.severity, violation.message, violation.position.x, violation.position.y
        );
    }

    if result.has_errors() {
        println!("\nDRC failed ({} errors).", result.stats.errors);
        std::process::exit(1);
    }

    println!("\nDRC passed (no errors).");
    Ok(())
}
