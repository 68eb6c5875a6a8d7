//! [`RecordStore`]: one `.ts` document and its key → translation map.
//!
//! The map is built from the document when it is loaded and is the only source of
//! values when it is persisted. Persisting edits the document's translation nodes in
//! place; everything else in the document is written back untouched.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    bridge::LanguageMap,
    error::Error,
    formats::TsFormat,
    traits::Parser,
    types::{Language, TranslationKey},
};

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    language: String,
    document: TsFormat,
    entries: IndexMap<TranslationKey, String>,
}

impl RecordStore {
    /// Loads the document at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if `path` does not exist.
    /// - [`Error::MissingLanguage`] if the root declares no language.
    /// - [`Error::MalformedRecord`] if a context or message lacks a required child.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let document = TsFormat::read_from(path)?;
        Self::from_document(path, document)
    }

    /// Builds a store from an already parsed document. `path` is where
    /// [`persist`](Self::persist) writes to.
    pub fn from_document<P: Into<PathBuf>>(path: P, document: TsFormat) -> Result<Self, Error> {
        let path = path.into();
        let language = match document.language() {
            Some(language) if !language.is_empty() => language.to_string(),
            _ => return Err(Error::MissingLanguage(path)),
        };

        let mut entries = IndexMap::new();
        for (index, message) in document.messages().iter().enumerate() {
            if message.numerus {
                debug!(key = %message.key, "skipping plural message");
                continue;
            }
            entries.insert(message.key.clone(), document.translation_text(index)?);
        }

        debug!(
            path = %path.display(),
            language = %language,
            entries = entries.len(),
            "loaded translation document"
        );
        Ok(Self {
            path,
            language,
            document,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The language identifier declared by the document.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The declared language as one of the supported table columns.
    pub fn language_id(&self) -> Result<Language, Error> {
        self.language.parse()
    }

    /// Keys and texts in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&TranslationKey, &str)> {
        self.entries.iter().map(|(key, text)| (key, text.as_str()))
    }

    pub fn get(&self, key: &TranslationKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes this store's language column from `languages` for every key both sides
    /// know. Keys missing from `languages` keep their text; no key is added or removed.
    ///
    /// An empty cell clears the translation.
    ///
    /// Returns the number of keys taken from `languages`.
    pub fn merge(&mut self, languages: &LanguageMap) -> Result<usize, Error> {
        let language = self.language_id()?;
        let mut merged = 0;
        for (key, text) in self.entries.iter_mut() {
            if let Some(translations) = languages.get(key) {
                translations.get(language).clone_into(text);
                merged += 1;
            }
        }
        debug!(path = %self.path.display(), merged, "merged table into document");
        Ok(merged)
    }

    /// Writes the map back into the document and saves it over the original file.
    pub fn persist(&mut self) -> Result<(), Error> {
        self.apply()?;
        self.document.write_to(&self.path)
    }

    /// Writes the map back into the document and serializes it to `writer`.
    pub fn to_writer<W: Write>(&mut self, writer: W) -> Result<(), Error> {
        self.apply()?;
        self.document.to_writer(writer)
    }

    fn apply(&mut self) -> Result<(), Error> {
        for index in 0..self.document.messages().len() {
            let message = &self.document.messages()[index];
            if message.numerus {
                continue;
            }
            if let Some(text) = self.entries.get(&message.key) {
                self.document.set_translation(index, text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Translations;
    use indoc::indoc;

    const JA: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <!DOCTYPE TS>
        <TS version="2.1" language="ja_JP">
        <context>
            <name>Dialog</name>
            <message>
                <source>Cancel</source>
                <translation type="unfinished"></translation>
            </message>
            <message>
                <source>OK</source>
                <translation>了解</translation>
            </message>
        </context>
        </TS>
    "#};

    fn store(xml: &str) -> RecordStore {
        RecordStore::from_document("memory.ts", TsFormat::from_str(xml).unwrap()).unwrap()
    }

    fn render(store: &mut RecordStore) -> String {
        let mut out = Vec::new();
        store.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn map(entries: &[(TranslationKey, Language, &str)]) -> LanguageMap {
        let mut map = LanguageMap::new();
        for (key, language, text) in entries {
            map.entry(key.clone())
                .or_insert_with(Translations::default)
                .set(*language, *text);
        }
        map
    }

    #[test]
    fn test_load_missing_file() {
        let err = RecordStore::load("does/not/exist.ts").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_missing_or_empty_language() {
        for xml in [r#"<TS version="2.1"></TS>"#, r#"<TS language=""></TS>"#] {
            let document = TsFormat::from_str(xml).unwrap();
            let err = RecordStore::from_document("x.ts", document).unwrap_err();
            assert!(matches!(err, Error::MissingLanguage(_)));
        }
    }

    #[test]
    fn test_entries_follow_document_order() {
        let store = store(JA);
        assert_eq!(store.language(), "ja_JP");
        assert_eq!(store.language_id().unwrap(), Language::JaJp);
        let entries: Vec<_> = store.entries().collect();
        assert_eq!(
            entries,
            vec![
                (&TranslationKey::new("Dialog", "Cancel", ""), ""),
                (&TranslationKey::new("Dialog", "OK", ""), "了解"),
            ]
        );
    }

    #[test]
    fn test_persist_without_merge_is_identity() {
        let mut store = store(JA);
        assert_eq!(render(&mut store), JA);
    }

    #[test]
    fn test_merge_leaves_unknown_keys_alone() {
        let mut store = store(JA);
        let languages = map(&[
            (TranslationKey::new("Dialog", "Cancel", ""), Language::JaJp, "キャンセル"),
            (TranslationKey::new("Other", "Cancel", ""), Language::JaJp, "無関係"),
        ]);

        assert_eq!(store.merge(&languages).unwrap(), 1);
        assert_eq!(store.get(&TranslationKey::new("Dialog", "Cancel", "")), Some("キャンセル"));
        assert_eq!(store.get(&TranslationKey::new("Dialog", "OK", "")), Some("了解"));
        assert_eq!(store.get(&TranslationKey::new("Other", "Cancel", "")), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_merge_clears_when_column_is_empty() {
        let mut store = store(JA);
        // Only the en_US column is filled for this key.
        let languages = map(&[(TranslationKey::new("Dialog", "OK", ""), Language::EnUs, "OK")]);

        store.merge(&languages).unwrap();
        assert_eq!(store.get(&TranslationKey::new("Dialog", "OK", "")), Some(""));

        let out = render(&mut store);
        assert!(!out.contains("了解"));
        assert_eq!(out.matches(r#"<translation type="unfinished"></translation>"#).count(), 2);
    }

    #[test]
    fn test_persist_sets_and_clears_markers() {
        let mut store = store(JA);
        let languages = map(&[(TranslationKey::new("Dialog", "Cancel", ""), Language::JaJp, "キャンセル")]);
        store.merge(&languages).unwrap();

        let out = render(&mut store);
        assert!(out.contains("<translation>キャンセル</translation>"));
        assert!(out.contains("<translation>了解</translation>"));
        assert!(!out.contains("unfinished"));
    }

    #[test]
    fn test_merge_rejects_unsupported_language() {
        let mut store = store(r#"<TS language="fr_FR"><context><name>A</name></context></TS>"#);
        let err = store.merge(&LanguageMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref l) if l == "fr_FR"));
    }

    #[test]
    fn test_duplicate_messages_share_one_entry() {
        let xml = indoc! {r#"
            <TS language="en_US">
            <context>
                <name>Main</name>
                <message><source>Quit</source><translation>Quit</translation></message>
                <message><source>Quit</source><comment></comment><translation>Exit</translation></message>
            </context>
            </TS>
        "#};
        let mut store = store(xml);
        assert_eq!(store.len(), 1);
        // Last message wins on load; persist writes the value into both.
        assert_eq!(store.get(&TranslationKey::new("Main", "Quit", "")), Some("Exit"));
        assert_eq!(render(&mut store).matches("<translation>Exit</translation>").count(), 2);
    }

    #[test]
    fn test_plural_messages_are_left_alone() {
        let xml = indoc! {r#"
            <TS language="en_US">
            <context>
                <name>Files</name>
                <message numerus="yes">
                    <source>%n file(s)</source>
                    <translation type="unfinished">
                        <numerusform></numerusform>
                    </translation>
                </message>
            </context>
            </TS>
        "#};
        let mut store = store(xml);
        assert!(store.is_empty());
        assert_eq!(render(&mut store), format!("{}{}", crate::formats::ts::DOCUMENT_HEADER, xml));
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_keeps_file_permissions() {
        use std::{fs, os::unix::fs::PermissionsExt};

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app_ja_JP.ts");
        fs::write(&path, JA).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

        let mut store = RecordStore::load(&path).unwrap();
        let languages = map(&[(TranslationKey::new("Dialog", "Cancel", ""), Language::JaJp, "キャンセル")]);
        store.merge(&languages).unwrap();
        store.persist().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
        assert!(fs::read_to_string(&path).unwrap().contains("<translation>キャンセル</translation>"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
