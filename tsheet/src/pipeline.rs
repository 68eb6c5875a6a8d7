//! The export and import flows, run over a directory of `.ts` documents.
//!
//! Documents are processed on a fixed-size worker pool. Every document is an
//! independent unit: a failure is recorded against its path in the
//! [`BatchReport`] and the other documents carry on.

use std::{
    io,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{debug, info, warn};

use crate::{
    bridge::{LanguageMap, flatten, unflatten},
    error::Error,
    formats::{TableFormat, read_table, write_table},
    store::RecordStore,
    types::Language,
};

/// Extension of translation documents picked up by [`discover_documents`].
pub const DOCUMENT_EXTENSION: &str = "ts";

/// Settings for one export or import run. Built once, never changed during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Export: directory of documents. Import: the table.
    pub input: PathBuf,
    /// Export: the table. Import: directory of documents.
    pub output: PathBuf,
    /// Descend into subdirectories when collecting documents.
    pub recursive: bool,
    /// Worker threads; 0 picks the platform default.
    pub jobs: usize,
    /// Document languages taking part in the run.
    pub languages: Vec<Language>,
}

impl Config {
    /// Creates a non-recursive config covering every supported language.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            recursive: false,
            jobs: 0,
            languages: Language::ALL.to_vec(),
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Restricts the run to `languages`; an empty list keeps every language.
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    fn accepts(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }
}

/// Per-document outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents read (export) or rewritten (import).
    pub processed: Vec<PathBuf>,
    /// Documents the run left alone: language filtered out, or no key in the table.
    pub skipped: Vec<PathBuf>,
    /// Documents that failed, with the reason.
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub report: BatchReport,
}

#[derive(Debug)]
pub struct ImportSummary {
    /// Keys read from the table.
    pub keys: usize,
    /// Translations taken from the table, over all documents.
    pub merged: usize,
    pub report: BatchReport,
}

/// Collects the `.ts` files directly under `dir`, or anywhere below it when
/// `recursive` is set. Paths are sorted. A file path is returned as is.
pub fn discover_documents<P: AsRef<Path>>(dir: P, recursive: bool) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let mut builder = WalkBuilder::new(dir);
    builder.standard_filters(false);
    if !recursive {
        builder.max_depth(Some(1));
    }

    let mut documents = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| Error::Io(io::Error::other(e)))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXTENSION) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Returns `path` if `exists` says it is free, otherwise the first free
/// `stem-N.ext` next to it, counting from 1.
pub fn unique_output_path<F>(path: &Path, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !exists(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem}-{counter}.{ext}"),
            None => format!("{stem}-{counter}"),
        };
        let candidate = path.with_file_name(name);
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Reads every document under `config.input` and writes their union as one table
/// to `config.output`, overwriting it.
///
/// Documents that fail to load are reported and left out of the table. The table
/// is built only after every document has been read.
pub fn export(config: &Config) -> Result<ExportSummary, Error> {
    TableFormat::from_path(&config.output)?;
    let documents = discover_documents(&config.input, config.recursive)?;
    info!(documents = documents.len(), "exporting translation documents");

    let pool = build_pool(config.jobs)?;
    let results = run_batch(&pool, &documents, |path| {
        let store = RecordStore::load(path)?;
        let language = store.language_id()?;
        Ok(config.accepts(language).then_some(store))
    });

    let mut report = BatchReport::default();
    let mut stores = Vec::new();
    for (path, result) in results {
        match result {
            Ok(Some(store)) => {
                report.processed.push(path);
                stores.push(store);
            }
            Ok(None) => {
                debug!(path = %path.display(), "language not selected");
                report.skipped.push(path);
            }
            Err(e) => {
                warn!(path = %path.display(), "failed to load document: {e}");
                report.failures.push((path, e));
            }
        }
    }

    let rows = flatten(&stores);
    let row_count = rows.len();
    write_table(&config.output, rows)?;
    info!(output = %config.output.display(), rows = row_count, "table written");

    Ok(ExportSummary {
        output: config.output.clone(),
        rows: row_count,
        report,
    })
}

/// Reads the table at `config.input` and merges it into every document under
/// `config.output`, rewriting each document that shares at least one key with it.
pub fn import(config: &Config) -> Result<ImportSummary, Error> {
    let rows = read_table(&config.input)?;
    let languages = unflatten(&rows);
    info!(keys = languages.len(), "table loaded");

    let documents = discover_documents(&config.output, config.recursive)?;
    let pool = build_pool(config.jobs)?;
    let results = run_batch(&pool, &documents, |path| import_one(path, &languages, config));

    let mut report = BatchReport::default();
    let mut merged = 0;
    for (path, result) in results {
        match result {
            Ok(Some(count)) => {
                merged += count;
                report.processed.push(path);
            }
            Ok(None) => report.skipped.push(path),
            Err(e) => {
                warn!(path = %path.display(), "failed to update document: {e}");
                report.failures.push((path, e));
            }
        }
    }
    info!(
        updated = report.processed.len(),
        failed = report.failures.len(),
        "import finished"
    );

    Ok(ImportSummary {
        keys: languages.len(),
        merged,
        report,
    })
}

/// Load, merge and save one document. `None` when the document is left alone.
fn import_one(path: &Path, languages: &LanguageMap, config: &Config) -> Result<Option<usize>, Error> {
    let mut store = RecordStore::load(path)?;
    if !config.accepts(store.language_id()?) {
        debug!(path = %path.display(), "language not selected");
        return Ok(None);
    }
    let merged = store.merge(languages)?;
    if merged == 0 {
        debug!(path = %path.display(), "no key shared with the table");
        return Ok(None);
    }
    store.persist()?;
    Ok(Some(merged))
}

fn build_pool(jobs: usize) -> Result<ThreadPool, Error> {
    ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|index| format!("tsheet-worker-{index}"))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))
}

/// Runs `work` over `paths` on `pool`; results come back in input order.
fn run_batch<T, F>(pool: &ThreadPool, paths: &[PathBuf], work: F) -> Vec<(PathBuf, Result<T, Error>)>
where
    T: Send,
    F: Fn(&Path) -> Result<T, Error> + Sync,
{
    pool.install(|| {
        paths
            .par_iter()
            .map(|path| (path.clone(), work(path)))
            .collect()
    })
}
