#![forbid(unsafe_code)]
//! Round-trip Qt Linguist `.ts` translations through a per-language spreadsheet.
//!
//! Every `.ts` document holds the translations of one language. tsheet exports a
//! directory of them into a single table with one row per message key and one column
//! per language, and imports the edited table back into the documents in place.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tsheet::{Config, export, import};
//!
//! // Collect every document under `i18n/` into one workbook
//! export(&Config::new("i18n", "TS-DATA.xlsx"))?;
//!
//! // ...translators fill in the sheet...
//!
//! // Write the sheet back into the documents
//! let summary = import(&Config::new("TS-DATA.xlsx", "i18n"))?;
//! assert!(summary.report.is_success());
//! # Ok::<(), tsheet::Error>(())
//! ```
//!
//! # Table layout
//!
//! | ClassName | Source | Comment | zh_CN | en_US | ja_JP | ko_KR |
//! |-----------|--------|---------|-------|-------|-------|-------|
//!
//! The first three columns identify a message; an empty cell in a language column
//! marks the translation as unfinished on import.
//!
//! # Working with single documents
//!
//! ```rust,no_run
//! use tsheet::{RecordStore, flatten, read_table, unflatten};
//!
//! let mut store = RecordStore::load("i18n/app_ja_JP.ts")?;
//! let languages = unflatten(&read_table("TS-DATA.xlsx")?);
//! store.merge(&languages)?;
//! store.persist()?;
//! # let _ = flatten(&[store]);
//! # Ok::<(), tsheet::Error>(())
//! ```

pub mod bridge;
pub mod error;
pub mod formats;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    bridge::{LanguageMap, flatten, unflatten},
    error::Error,
    formats::{TableFormat, normalize_table_path, read_table, write_table},
    pipeline::{
        BatchReport, Config, ExportSummary, ImportSummary, discover_documents, export, import,
        unique_output_path,
    },
    store::RecordStore,
    traits::Parser,
    types::{Language, TableRow, TranslationKey, Translations},
};
