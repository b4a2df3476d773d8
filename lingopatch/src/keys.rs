//! String-id helpers shared by the parsers, the merger and the edit cache.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::types::Edit;

/// Regex source for a string id.
pub const STRING_ID_PATTERN: &str = r"STR_\d{4}";

lazy_static! {
    static ref STRING_ID_REGEX: Regex = Regex::new(&format!("^{STRING_ID_PATTERN}$")).unwrap();
    static ref DATA_LINE_REGEX: Regex =
        Regex::new(&format!(r"^({STRING_ID_PATTERN})\s*:(.*)$")).unwrap();
}

/// Classification of one line of a language file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace only.
    Blank,
    /// Starts with `#`.
    Comment,
    /// `STR_0000    :text`
    Data { id: &'a str, text: &'a str },
    /// Anything else. Kept in place, never interpreted.
    Malformed,
}

impl<'a> Line<'a> {
    pub fn id(&self) -> Option<&'a str> {
        match self {
            Line::Data { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Whether `candidate` is exactly one string id.
pub fn is_string_id(candidate: &str) -> bool {
    STRING_ID_REGEX.is_match(candidate)
}

/// Classify a single line. A trailing `\r` is ignored.
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }
    match DATA_LINE_REGEX.captures(line) {
        Some(caps) => {
            let id = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str());
            Line::Data { id, text }
        }
        None => Line::Malformed,
    }
}

/// Ordinal (byte-wise) id comparison, the order language files are kept in.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Deduplicate edits by id (last write wins) and sort them ascending.
///
/// The merger expects its input in exactly this shape.
pub fn normalize_edits<I, E>(edits: I) -> Vec<Edit>
where
    I: IntoIterator<Item = E>,
    E: Into<Edit>,
{
    let mut latest = BTreeMap::new();
    for edit in edits {
        let edit = edit.into();
        latest.insert(edit.string_id, edit.text);
    }
    // BTreeMap<String, _> iterates in byte order, same as `compare_ids`.
    latest
        .into_iter()
        .map(|(string_id, text)| Edit { string_id, text })
        .collect()
}

/// Reject edits that cannot be written as one data line: an id that is not
/// `STR_NNNN`, or text containing a line break.
pub fn check_edits(edits: &[Edit]) -> Result<()> {
    for edit in edits {
        if !is_string_id(&edit.string_id) {
            return Err(Error::invalid(format!(
                "`{}` is not a string id",
                edit.string_id
            )));
        }
        if edit.text.contains(['\n', '\r']) {
            return Err(Error::invalid(format!(
                "text for {} must be a single line",
                edit.string_id
            )));
        }
    }
    Ok(())
}

/// Key of one cached edit: `<language>_<string id>`.
pub fn cache_key(language: &str, string_id: &str) -> String {
    format!("{language}_{string_id}")
}
