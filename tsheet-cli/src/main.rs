use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tsheet::Language;
use tsheet_cli::{parse_language, run_export_command, run_import_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export every .ts file in a directory into one table.
    Export {
        /// Directory holding the .ts files
        #[arg(short, long)]
        input: PathBuf,
        /// Table to write (.xlsx or .csv); defaults to TS-DATA-<date>.xlsx
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Search subdirectories for .ts files as well
        #[arg(short, long)]
        recursive: bool,
        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
        /// Only include documents in these languages
        #[arg(long = "lang", value_parser = parse_language)]
        languages: Vec<Language>,
    },

    /// Write the translations of a table back into .ts files.
    Import {
        /// Table to read (.xlsx or .csv)
        #[arg(short, long)]
        input: PathBuf,
        /// Directory holding the .ts files to update
        #[arg(short, long)]
        output: PathBuf,
        /// Search subdirectories for .ts files as well
        #[arg(short, long)]
        recursive: bool,
        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
        /// Only update documents in these languages
        #[arg(long = "lang", value_parser = parse_language)]
        languages: Vec<Language>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.commands {
        Commands::Export {
            input,
            output,
            recursive,
            jobs,
            languages,
        } => run_export_command(input, output, recursive, jobs, languages),
        Commands::Import {
            input,
            output,
            recursive,
            jobs,
            languages,
        } => run_import_command(input, output, recursive, jobs, languages),
    }
}
