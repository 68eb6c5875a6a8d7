//! CLI library for testing purposes

pub mod export;
pub mod import;
pub mod progress;

pub use export::{default_export_name, resolve_export_path, run_export_command};
pub use import::run_import_command;

use tsheet::Language;

/// Parses a `--lang` value into one of the supported table languages.
pub fn parse_language(value: &str) -> Result<Language, String> {
    value.parse::<Language>().map_err(|_| {
        let known: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        format!("unknown language `{value}`, expected one of: {}", known.join(", "))
    })
}
