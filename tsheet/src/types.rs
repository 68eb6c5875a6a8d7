//! Core types shared by the document side and the table side.
//! Documents decode into keyed texts; tables decode into [`TableRow`]s.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifies one translatable unit: context name, source text and comment.
///
/// A message without a `<comment>` and a message with an empty one produce the
/// same key, and so does a blank `Comment` cell in a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslationKey {
    pub context: String,
    pub source: String,
    pub comment: String,
}

impl TranslationKey {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            comment: comment.into(),
        }
    }
}

impl Display for TranslationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.comment.is_empty() {
            write!(f, "{}::{}", self.context, self.source)
        } else {
            write!(f, "{}::{} ({})", self.context, self.source, self.comment)
        }
    }
}

/// The closed set of languages that get a column in the table.
///
/// The variant order is the column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    ZhCn,
    EnUs,
    JaJp,
    KoKr,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::ZhCn,
        Language::EnUs,
        Language::JaJp,
        Language::KoKr,
    ];

    /// The identifier used both in `.ts` headers and as the column header.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::ZhCn => "zh_CN",
            Language::EnUs => "en_US",
            Language::JaJp => "ja_JP",
            Language::KoKr => "ko_KR",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a language identifier. Only the exact identifiers are accepted, so
/// the table schema cannot drift between runs.
impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

/// One text per supported language, empty when never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations([String; 4]);

impl Translations {
    pub fn get(&self, language: Language) -> &str {
        &self.0[language.index()]
    }

    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        self.0[language.index()] = text.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        Language::ALL
            .into_iter()
            .map(move |language| (language, self.get(language)))
    }
}

/// Number of columns in the sheet: three key columns plus one per language.
pub const COLUMN_COUNT: usize = 3 + Language::ALL.len();

/// Column headers of the sheet, in order.
pub const TABLE_HEADERS: [&str; COLUMN_COUNT] = [
    "ClassName",
    "Source",
    "Comment",
    "zh_CN",
    "en_US",
    "ja_JP",
    "ko_KR",
];

/// One row of the sheet: the three key cells followed by one cell per language.
///
/// Field order matches [`TABLE_HEADERS`]. Missing `Comment` or language columns
/// deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "ClassName")]
    pub class_name: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Comment", default)]
    pub comment: String,
    #[serde(rename = "zh_CN", default)]
    pub zh_cn: String,
    #[serde(rename = "en_US", default)]
    pub en_us: String,
    #[serde(rename = "ja_JP", default)]
    pub ja_jp: String,
    #[serde(rename = "ko_KR", default)]
    pub ko_kr: String,
}

impl TableRow {
    /// Creates a row for `key` with every language cell empty.
    pub fn new(key: &TranslationKey) -> Self {
        Self {
            class_name: key.context.clone(),
            source: key.source.clone(),
            comment: key.comment.clone(),
            ..Self::default()
        }
    }

    /// Builds a row from cells in [`TABLE_HEADERS`] order.
    pub fn from_cells(cells: [String; COLUMN_COUNT]) -> Self {
        let [class_name, source, comment, zh_cn, en_us, ja_jp, ko_kr] = cells;
        Self {
            class_name,
            source,
            comment,
            zh_cn,
            en_us,
            ja_jp,
            ko_kr,
        }
    }

    /// Cells in [`TABLE_HEADERS`] order.
    pub fn cells(&self) -> [&str; COLUMN_COUNT] {
        [
            &self.class_name,
            &self.source,
            &self.comment,
            &self.zh_cn,
            &self.en_us,
            &self.ja_jp,
            &self.ko_kr,
        ]
    }

    pub fn key(&self) -> TranslationKey {
        TranslationKey::new(
            self.class_name.clone(),
            self.source.clone(),
            self.comment.clone(),
        )
    }

    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::ZhCn => &self.zh_cn,
            Language::EnUs => &self.en_us,
            Language::JaJp => &self.ja_jp,
            Language::KoKr => &self.ko_kr,
        }
    }

    pub fn set_text(&mut self, language: Language, text: impl Into<String>) {
        let slot = match language {
            Language::ZhCn => &mut self.zh_cn,
            Language::EnUs => &mut self.en_us,
            Language::JaJp => &mut self.ja_jp,
            Language::KoKr => &mut self.ko_kr,
        };
        *slot = text.into();
    }

    pub fn translations(&self) -> Translations {
        let mut translations = Translations::default();
        for language in Language::ALL {
            translations.set(language, self.text(language));
        }
        translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trips_through_identifier() {
        for language in Language::ALL {
            assert_eq!(language.as_str().parse::<Language>().unwrap(), language);
            assert_eq!(language.to_string(), language.as_str());
        }
    }

    #[test]
    fn test_language_rejects_unknown_identifier() {
        let err = "fr_FR".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref l) if l == "fr_FR"));
        // Case matters: the identifier is also a column header.
        assert!("ja_jp".parse::<Language>().is_err());
    }

    #[test]
    fn test_headers_follow_language_order() {
        let languages: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(&TABLE_HEADERS[3..], languages.as_slice());
    }

    #[test]
    fn test_new_row_has_empty_language_cells() {
        let key = TranslationKey::new("Dialog", "Cancel", "");
        let row = TableRow::new(&key);
        assert_eq!(row.key(), key);
        for language in Language::ALL {
            assert_eq!(row.text(language), "");
        }
    }

    #[test]
    fn test_set_text_targets_one_column() {
        let mut row = TableRow::new(&TranslationKey::new("Dialog", "OK", ""));
        row.set_text(Language::JaJp, "了解");
        assert_eq!(row.ja_jp, "了解");
        assert_eq!(row.cells(), ["Dialog", "OK", "", "", "", "了解", ""]);

        let translations = row.translations();
        assert_eq!(translations.get(Language::JaJp), "了解");
        assert_eq!(translations.get(Language::EnUs), "");
    }

    #[test]
    fn test_key_display() {
        let plain = TranslationKey::new("Dialog", "Cancel", "");
        let commented = TranslationKey::new("Dialog", "Open", "menu entry");
        assert_eq!(plain.to_string(), "Dialog::Cancel");
        assert_eq!(commented.to_string(), "Dialog::Open (menu entry)");
    }
}
