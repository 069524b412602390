//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use pump_lib::PumpCommand;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format the decision for the report line: raw `0`/`1`, or the
/// human text
pub fn format_decision(command: PumpCommand, raw: bool) -> String {
    if raw {
        return command.as_raw().to_string();
    }
    match command {
        PumpCommand::On => format!("PUMP: {}", "ON".green().bold()),
        PumpCommand::Off => format!("PUMP: {}", "OFF".red().bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_decision_is_single_digit() {
        assert_eq!(format_decision(PumpCommand::On, true), "1");
        assert_eq!(format_decision(PumpCommand::Off, true), "0");
    }

    #[test]
    fn test_human_decision_text() {
        colored::control::set_override(false);
        assert_eq!(format_decision(PumpCommand::On, false), "PUMP: ON");
        assert_eq!(format_decision(PumpCommand::Off, false), "PUMP: OFF");
        colored::control::unset_override();
    }
}
