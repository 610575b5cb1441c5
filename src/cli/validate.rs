//! Levels file validation command implementation.

use std::fs;
use std::path::PathBuf;

use super::CliError;
use snarl::game::Level;
use snarl::levels;

/// Execute the validate command.
///
/// Every level is checked on its own so one bad level does not hide the
/// others.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any level is invalid.
pub(crate) fn execute(path: PathBuf) -> Result<(), CliError> {
    let text = fs::read_to_string(&path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;

    println!("Validating: {}", path.display());
    println!();

    let (declared, documents) = levels::split_documents(&text)?;
    let count_ok = declared == documents.len();
    print_check(
        &format!("Level count ({declared} declared, {} found)", documents.len()),
        count_ok,
    );

    let mut failures = usize::from(!count_ok);
    for (index, document) in documents.into_iter().enumerate() {
        match levels::parse_level(document, index) {
            Ok(level) => {
                print_check(&format!("Level {index}"), true);
                print_summary(&level);
            }
            Err(e) => {
                print_check(&format!("Level {index}"), false);
                println!("      {e}");
                failures += 1;
            }
        }
    }

    println!();
    if failures > 0 {
        return Err(CliError::new(format!("{failures} problem(s) found")));
    }
    println!("Validation successful!");
    Ok(())
}

fn print_summary(level: &Level) {
    let grid = level.grid();
    println!("      Rooms:    {}", level.rooms().len());
    println!("      Hallways: {}", level.hallways().len());
    println!("      Size:     {}x{}", grid.width(), grid.height());
    println!("      Key:      {}", level.key());
    println!("      Exit:     {}", level.exit());
    println!();
    for line in level.render().lines() {
        println!("      {line}");
    }
    println!();
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
