//! Validation report printing

use crate::output::Status;
use gradlecheck_core::error::exit_codes;
use gradlecheck_core::validate::ValidationResult;
use owo_colors::OwoColorize;

/// Print validation findings and return the exit code
pub fn print_results(result: &ValidationResult) -> i32 {
    for warning in result.warnings() {
        eprintln!(
            "  [{}] {}: {}",
            warning.code.yellow(),
            warning.field.cyan(),
            warning.message
        );
    }

    if result.is_valid() {
        if result.warnings().is_empty() {
            Status::success("Descriptor is valid");
        } else {
            Status::success(&format!(
                "Descriptor is valid ({} warning(s))",
                result.warnings().len()
            ));
        }
        return exit_codes::SUCCESS;
    }

    eprintln!(
        "{} Found {} validation error(s):",
        "ERROR".red(),
        result.errors().len()
    );
    eprintln!();

    for error in result.errors() {
        eprintln!("  [{}] {}: {}", error.code.red().bold(), error.field.cyan(), error.message);
        if let Some(expected) = &error.expected {
            eprintln!("    Expected: {}", expected);
        }
        if let Some(actual) = &error.actual {
            eprintln!("    Actual: {}", actual.dimmed());
        }
        eprintln!();
    }

    exit_codes::VALIDATION_ERROR
}

/// Print validation findings as a JSON document and return the exit code
pub fn print_results_json(result: &ValidationResult) -> i32 {
    match serde_json::to_string_pretty(result) {
        Ok(json) => {
            println!("{}", json);
            if result.is_valid() {
                exit_codes::SUCCESS
            } else {
                exit_codes::VALIDATION_ERROR
            }
        }
        Err(e) => {
            Status::error(&format!("Failed to encode report: {}", e));
            exit_codes::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_exits_success() {
        let result = ValidationResult::new();
        assert_eq!(print_results(&result), exit_codes::SUCCESS);
    }
}
