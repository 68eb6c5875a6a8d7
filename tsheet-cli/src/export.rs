use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tsheet::{Config, Language, normalize_table_path, unique_output_path};

use crate::progress::{report_failures, spinner};

/// Table name used when `--output` is not given, e.g. `TS-DATA-2024-0315.xlsx`.
pub fn default_export_name(date: NaiveDate) -> String {
    format!("TS-DATA-{}.xlsx", date.format("%Y-%m%d"))
}

/// Picks the table path for an export: the given path (with `.xlsx` appended when
/// it has no extension) or the dated default, moved aside from existing files.
pub fn resolve_export_path<F>(output: Option<PathBuf>, today: NaiveDate, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let path = match output {
        Some(path) => normalize_table_path(path),
        None => PathBuf::from(default_export_name(today)),
    };
    unique_output_path(&path, exists)
}

/// Run the export command: collect every document under `input` into one table.
pub fn run_export_command(
    input: PathBuf,
    output: Option<PathBuf>,
    recursive: bool,
    jobs: usize,
    languages: Vec<Language>,
) {
    if !input.exists() {
        eprintln!("Error: input directory not found: {}", input.display());
        std::process::exit(1);
    }

    let today = chrono::Local::now().date_naive();
    let output = resolve_export_path(output, today, Path::exists);
    tracing::debug!(output = %output.display(), "resolved export path");
    let config = Config::new(input, output)
        .with_recursive(recursive)
        .with_jobs(jobs)
        .with_languages(languages);

    let progress_bar = spinner();
    progress_bar.set_message(format!("Exporting {}...", config.input.display()));

    let summary = match tsheet::export(&config) {
        Ok(summary) => summary,
        Err(e) => {
            progress_bar.finish_with_message("❌ Export failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !summary.report.is_success() {
        progress_bar.finish_with_message(format!(
            "❌ Wrote {} rows to {}, {} documents failed",
            summary.rows,
            summary.output.display(),
            summary.report.failures.len()
        ));
        report_failures(&summary.report.failures);
        std::process::exit(1);
    }

    progress_bar.finish_with_message(format!(
        "✅ Exported {} documents ({} rows) to {}",
        summary.report.processed.len(),
        summary.rows,
        summary.output.display()
    ));
}
