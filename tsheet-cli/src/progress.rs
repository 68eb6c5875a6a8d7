use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shared by the commands, drawn on stderr.
pub fn spinner() -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    progress_bar.set_style(style);
    progress_bar
}

/// Prints every failed document of a batch below the spinner.
pub fn report_failures(failures: &[(std::path::PathBuf, tsheet::Error)]) {
    for (path, error) in failures {
        eprintln!("Error: {}: {}", path.display(), error);
    }
}
