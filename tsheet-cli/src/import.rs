use std::path::PathBuf;

use tsheet::{Config, Language};

use crate::progress::{report_failures, spinner};

/// Run the import command: merge the table at `input` into every document under `output`.
pub fn run_import_command(
    input: PathBuf,
    output: PathBuf,
    recursive: bool,
    jobs: usize,
    languages: Vec<Language>,
) {
    if !input.exists() {
        eprintln!("Error: input table not found: {}", input.display());
        std::process::exit(1);
    }

    let config = Config::new(input, output)
        .with_recursive(recursive)
        .with_jobs(jobs)
        .with_languages(languages);

    let progress_bar = spinner();
    progress_bar.set_message(format!(
        "Importing {} into {}...",
        config.input.display(),
        config.output.display()
    ));

    let summary = match tsheet::import(&config) {
        Ok(summary) => summary,
        Err(e) => {
            progress_bar.finish_with_message("❌ Import failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = &summary.report;
    if !report.is_success() {
        progress_bar.finish_with_message(format!(
            "❌ Updated {} documents, {} failed",
            report.processed.len(),
            report.failures.len()
        ));
        report_failures(&report.failures);
        std::process::exit(1);
    }

    progress_bar.finish_with_message(format!(
        "✅ Updated {} documents from {} keys ({} unchanged)",
        report.processed.len(),
        summary.keys,
        report.skipped.len()
    ));
}
