//! Conversion between per-language [`RecordStore`]s and the flat table.
//!
//! [`flatten`] unions the keys of several documents into one row per key with one
//! column per language; [`unflatten`] turns table rows back into a key → texts map
//! that [`RecordStore::merge`] consumes.

use indexmap::IndexMap;
use tracing::warn;

use crate::{
    store::RecordStore,
    types::{TableRow, TranslationKey, Translations},
};

/// Texts of every supported language, per key, in table order.
pub type LanguageMap = IndexMap<TranslationKey, Translations>;

/// Builds one row per key seen in `stores`, in first-seen order.
///
/// Each store fills its own language column. When two stores in the same language
/// define a key, the later one wins. Stores whose language has no column are skipped.
pub fn flatten(stores: &[RecordStore]) -> Vec<TableRow> {
    let mut rows: IndexMap<TranslationKey, TableRow> = IndexMap::new();
    for store in stores {
        let language = match store.language_id() {
            Ok(language) => language,
            Err(e) => {
                warn!(path = %store.path().display(), "skipping document: {e}");
                continue;
            }
        };
        for (key, text) in store.entries() {
            rows.entry(key.clone())
                .or_insert_with(|| TableRow::new(key))
                .set_text(language, text);
        }
    }
    rows.into_values().collect()
}

/// Reads table rows into a key → texts map. Blank cells are empty strings; when a
/// key appears on several rows, the last row wins.
pub fn unflatten(rows: &[TableRow]) -> LanguageMap {
    let mut languages = LanguageMap::with_capacity(rows.len());
    for row in rows {
        languages.insert(row.key(), row.translations());
    }
    languages
}
