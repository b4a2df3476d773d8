//! Support for `STR_0000    :text` language files.
//!
//! A language file is a list of lines. Each line is blank, a `#` comment or a
//! data line; data lines are sorted ascending by id. The text is kept verbatim
//! so that untouched lines survive a merge byte for byte.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{
    error::Error,
    keys::{Line, classify_line},
    merge::merge_language_file,
    traits::TextDocument,
    types::{Edit, TranslationString},
};

/// An immutable language file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageFile {
    text: String,
}

impl LanguageFile {
    pub fn new(text: impl Into<String>) -> Self {
        LanguageFile { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every line, classified. Line numbers are 1-based.
    pub fn lines(&self) -> impl Iterator<Item = (usize, Line<'_>)> {
        self.text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, classify_line(line)))
    }

    /// Every well-formed entry in file order.
    ///
    /// An id that occurs more than once is listed once, with the text of its
    /// first occurrence.
    pub fn list_all(&self) -> Vec<TranslationString> {
        let mut seen = HashSet::new();
        self.lines()
            .filter_map(|(_, line)| match line {
                Line::Data { id, text } if seen.insert(id) => {
                    Some(TranslationString::new(id).with_new_text(text))
                }
                _ => None,
            })
            .collect()
    }

    /// Text of one entry. `None` means the id is absent, `Some("")` that its
    /// text is empty. The first occurrence wins.
    pub fn lookup(&self, string_id: &str) -> Option<&str> {
        self.lines().find_map(|(_, line)| match line {
            Line::Data { id, text } if id == string_id => Some(text),
            _ => None,
        })
    }

    pub fn contains(&self, string_id: &str) -> bool {
        self.lookup(string_id).is_some()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.list_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().all(|(_, line)| line.id().is_none())
    }

    /// Apply sorted, deduplicated edits and return the updated file.
    ///
    /// See [`merge_language_file`] for the exact semantics.
    pub fn apply(&self, edits: &[Edit]) -> LanguageFile {
        LanguageFile::new(merge_language_file(&self.text, edits))
    }
}

impl TextDocument for LanguageFile {
    fn from_text(text: String) -> Self {
        LanguageFile { text }
    }

    fn as_text(&self) -> &str {
        &self.text
    }

    /// Decodes with BOM sniffing so that files saved by Windows editors load too.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Ok(LanguageFile::new(decoded))
    }
}

impl From<String> for LanguageFile {
    fn from(text: String) -> Self {
        LanguageFile { text }
    }
}

impl From<&str> for LanguageFile {
    fn from(text: &str) -> Self {
        LanguageFile::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        # Language file for Deutsch
        STR_0000    :Spiel
        STR_0001    :

        # Rides
        STR_0002    :Achterbahn
        not a data line
        STR_0003:Karussell
    "};

    #[test]
    fn test_list_all_in_file_order() {
        let file = LanguageFile::new(SAMPLE);
        let all = file.list_all();
        let ids: Vec<_> = all.iter().map(|s| s.string_id.as_str()).collect();
        assert_eq!(ids, vec!["STR_0000", "STR_0001", "STR_0002", "STR_0003"]);
        assert_eq!(all[2].new_text.as_deref(), Some("Achterbahn"));
        assert_eq!(file.len(), 4);
    }

    #[test]
    fn test_lookup_distinguishes_empty_from_missing() {
        let file = LanguageFile::new(SAMPLE);
        assert_eq!(file.lookup("STR_0000"), Some("Spiel"));
        assert_eq!(file.lookup("STR_0001"), Some(""));
        assert_eq!(file.lookup("STR_0003"), Some("Karussell"));
        assert_eq!(file.lookup("STR_0004"), None);
        assert!(!file.contains("STR_9999"));
    }

    #[test]
    fn test_duplicate_ids_first_occurrence_wins() {
        let file = LanguageFile::new("STR_0001    :first\nSTR_0001    :second\n");
        assert_eq!(file.lookup("STR_0001"), Some("first"));
        let all = file.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].new_text.as_deref(), Some("first"));
    }

    #[test]
    fn test_commented_out_entries_are_not_data() {
        let file = LanguageFile::new("# STR_0001    :hidden\n#STR_0002:hidden\n");
        assert!(file.list_all().is_empty());
        assert!(file.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let file = LanguageFile::new("STR_0001    :Eins\r\nSTR_0002    :Zwei\r\n");
        assert_eq!(file.lookup("STR_0001"), Some("Eins"));
        assert_eq!(file.lookup("STR_0002"), Some("Zwei"));
    }

    #[test]
    fn test_apply_updates_entry() {
        let file = LanguageFile::new("STR_0001    :A\nSTR_0003    :C\n");
        let updated = file.apply(&[Edit::new("STR_0003", "Z")]);
        assert_eq!(updated.text(), "STR_0001    :A\nSTR_0003    :Z\n");
    }

    #[test]
    fn test_read_from_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de-DE.txt");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("STR_0001    :Grüß dich\n".as_bytes());
        std::fs::write(&path, bytes).unwrap();

        let file = LanguageFile::read_from(&path).unwrap();
        assert_eq!(file.lookup("STR_0001"), Some("Grüß dich"));
        assert!(file.text().starts_with("STR_0001"));
    }

    #[test]
    fn test_write_to_round_trips_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let file = LanguageFile::new(SAMPLE);
        file.write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }
}
