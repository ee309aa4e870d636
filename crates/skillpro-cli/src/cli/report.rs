//! Shared rendering of validation findings.

use console::style;
use skillpro_types::validation::ValidationResult;

/// `file:line` suffix for a finding, if it has a location.
fn location(file: Option<&str>, line: Option<usize>) -> String {
    match (file, line) {
        (Some(file), Some(line)) => format!(" ({file}:{line})"),
        (Some(file), None) => format!(" ({file})"),
        _ => String::new(),
    }
}

/// Print errors then warnings, one per line.
pub fn print_findings(result: &ValidationResult) {
    for error in &result.errors {
        println!(
            "  {} {} {}{}",
            style("✗").red(),
            style(error.code).red().bold(),
            error.message,
            style(location(error.file.as_deref(), error.line)).dim()
        );
    }
    for warning in &result.warnings {
        println!(
            "  {} {} {}{}",
            style("!").yellow(),
            style(warning.code).yellow().bold(),
            warning.message,
            style(location(warning.file.as_deref(), None)).dim()
        );
    }
}

/// One-line verdict for a result.
pub fn verdict(result: &ValidationResult) -> String {
    let summary = format!(
        "{} error(s), {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );
    if result.is_valid() {
        format!("{} valid, {summary}", style("✓").green())
    } else {
        format!("{} invalid, {summary}", style("✗").red())
    }
}
