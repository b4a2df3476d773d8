//! Parsing of translation-request issue bodies.
//!
//! Issue bodies are free-form markdown. Two things are picked out of them:
//!
//! - string change lines, `STR_0000: text` with an optional `+`/`-` sign, and
//! - a checklist of target languages, `- [ ] de-DE` / `- [x] fr-FR`.
//!
//! Parsing is lenient: anything that does not match is ignored.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keys::STRING_ID_PATTERN;
use crate::types::TranslationString;

lazy_static! {
    static ref CHANGE_LINE_REGEX: Regex =
        Regex::new(&format!(r"([+-]?)({STRING_ID_PATTERN})\s*:(.+)")).unwrap();
    static ref CHECKLIST_REGEX: Regex = Regex::new(r"- \[( |x)\] ([a-z]{2}-[A-Z]{2})").unwrap();
}

/// Everything this tool reads from one issue body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedIssue {
    /// Requested changes, sorted ascending by id.
    pub strings: Vec<TranslationString>,
    /// Languages whose checklist item is still unchecked.
    pub missing_languages: BTreeSet<String>,
}

impl ParsedIssue {
    pub fn needs_language(&self, language: &str) -> bool {
        self.missing_languages.contains(language)
    }

    /// Strings that have something to translate (i.e. not pure removals).
    pub fn editable_strings(&self) -> impl Iterator<Item = &TranslationString> {
        self.strings.iter().filter(|s| s.new_text.is_some())
    }
}

/// Parse an issue body into requested strings and outstanding languages.
pub fn parse_issue(body: &str) -> ParsedIssue {
    ParsedIssue {
        strings: extract_translation_strings(body),
        missing_languages: extract_missing_languages(body),
    }
}

/// Extract the requested string changes of an issue body.
///
/// A `-` sign marks the text as removed (`old_text`); `+` or no sign marks it
/// as added (`new_text`). Lines for the same id are merged into one record and
/// the last occurrence of each field wins.
pub fn extract_translation_strings(body: &str) -> Vec<TranslationString> {
    let mut strings: BTreeMap<&str, TranslationString> = BTreeMap::new();

    for line in body.lines() {
        for caps in CHANGE_LINE_REGEX.captures_iter(line) {
            let (Some(sign), Some(id), Some(text)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let text = text.as_str();
            let text = text.strip_suffix('\r').unwrap_or(text);
            if text.is_empty() {
                continue;
            }

            let entry = strings
                .entry(id.as_str())
                .or_insert_with(|| TranslationString::new(id.as_str()));
            if sign.as_str() == "-" {
                entry.old_text = Some(text.to_string());
            } else {
                entry.new_text = Some(text.to_string());
            }
        }
    }

    // BTreeMap iteration is already in ordinal id order.
    strings.into_values().collect()
}

/// Extract languages whose checklist item is unchecked.
pub fn extract_missing_languages(body: &str) -> BTreeSet<String> {
    CHECKLIST_REGEX
        .captures_iter(body)
        .filter(|caps| &caps[1] != "x")
        .map(|caps| caps[2].to_string())
        .collect()
}
