//! Merging edits into a language file.
//!
//! The file and the edit list are both sorted by id, so the merge is a single
//! merge-join pass: untouched lines are copied verbatim, matching data lines
//! are replaced, missing ids are inserted at their sorted position.

use std::cmp::Ordering;

use crate::keys::{Line, classify_line, compare_ids};
use crate::types::Edit;

/// Spaces between the id and the colon of a written data line.
pub const DEFAULT_PADDING: usize = 4;

/// Format one data line: `STR_0000    :text`.
pub fn format_entry(string_id: &str, text: &str, padding: usize) -> String {
    format!("{string_id}{:padding$}:{text}", "")
}

/// Merge `edits` into `file_text` using the default padding.
///
/// `edits` must be deduplicated and sorted ascending by id, as produced by
/// [`crate::keys::normalize_edits`], and pass [`crate::keys::check_edits`].
/// With duplicate ids or multi-line text the result is unspecified.
///
/// ```
/// use lingopatch::{Edit, merge_language_file};
///
/// let merged = merge_language_file(
///     "STR_0001    :A\nSTR_0003    :C\n",
///     &[Edit::new("STR_0002", "B")],
/// );
/// assert_eq!(merged, "STR_0001    :A\nSTR_0002    :B\nSTR_0003    :C\n");
/// ```
pub fn merge_language_file(file_text: &str, edits: &[Edit]) -> String {
    merge_with_padding(file_text, edits, DEFAULT_PADDING)
}

/// Merge `edits` into `file_text`, writing new lines with `padding` spaces.
///
/// Blank, comment and malformed lines are copied as soon as the scan reaches
/// them, so their position relative to the original data lines never changes.
/// Trailing newlines of the input are dropped and the output ends with exactly
/// one. CRLF line endings are rewritten as LF.
pub fn merge_with_padding(file_text: &str, edits: &[Edit], padding: usize) -> String {
    let input: Vec<&str> = file_text.trim_end_matches(['\n', '\r']).lines().collect();

    let mut output: Vec<String> = Vec::with_capacity(input.len() + edits.len() + 1);
    let mut cursor = 0;

    for edit in edits {
        while let Some(line) = input.get(cursor) {
            match classify_line(line) {
                Line::Blank | Line::Comment | Line::Malformed => {}
                Line::Data { id, .. } => match compare_ids(id, &edit.string_id) {
                    Ordering::Less => {}
                    Ordering::Equal => {
                        // superseded by the edit
                        cursor += 1;
                        break;
                    }
                    Ordering::Greater => break,
                },
            }
            output.push((*line).to_string());
            cursor += 1;
        }
        output.push(format_entry(&edit.string_id, &edit.text, padding));
    }

    output.extend(input[cursor..].iter().map(|line| (*line).to_string()));
    output.push(String::new());
    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const FILE: &str = "STR_0001    :A\nSTR_0003    :C\n";

    #[test]
    fn test_insertion_between_entries() {
        let merged = merge_language_file(FILE, &[Edit::new("STR_0002", "B")]);
        assert_eq!(merged, "STR_0001    :A\nSTR_0002    :B\nSTR_0003    :C\n");
    }

    #[test]
    fn test_update_existing_entry() {
        let merged = merge_language_file(FILE, &[Edit::new("STR_0001", "Z")]);
        assert_eq!(merged, "STR_0001    :Z\nSTR_0003    :C\n");
    }

    #[test]
    fn test_insert_before_all_and_after_all() {
        let merged = merge_language_file(
            FILE,
            &[Edit::new("STR_0000", "first"), Edit::new("STR_0009", "last")],
        );
        assert_eq!(
            merged,
            "STR_0000    :first\nSTR_0001    :A\nSTR_0003    :C\nSTR_0009    :last\n"
        );
    }

    #[test]
    fn test_empty_file_and_no_edits() {
        assert_eq!(merge_language_file("", &[]), "\n");
        assert_eq!(
            merge_language_file("", &[Edit::new("STR_0001", "x")]),
            "STR_0001    :x\n"
        );
        assert_eq!(merge_language_file(FILE, &[]), FILE);
    }

    #[test]
    fn test_trailing_newlines_are_normalized() {
        assert_eq!(merge_language_file("STR_0001    :A", &[]), "STR_0001    :A\n");
        assert_eq!(
            merge_language_file("STR_0001    :A\n\n\n", &[]),
            "STR_0001    :A\n"
        );
    }

    #[test]
    fn test_comments_are_copied_before_insertions() {
        let file = indoc! {"
            # Header
            STR_0001    :A

            # Section two
            STR_0005    :E
            # Section three
            STR_0009    :I
        "};
        let merged = merge_language_file(
            file,
            &[
                Edit::new("STR_0004", "D"),
                Edit::new("STR_0005", "e"),
                Edit::new("STR_0006", "F"),
            ],
        );
        assert_eq!(
            merged,
            indoc! {"
                # Header
                STR_0001    :A

                # Section two
                STR_0004    :D
                STR_0005    :e
                # Section three
                STR_0006    :F
                STR_0009    :I
            "}
        );
    }

    #[test]
    fn test_leading_blank_lines_are_kept() {
        let merged = merge_language_file("\n# top\nSTR_0002    :B\n", &[Edit::new("STR_0001", "A")]);
        assert_eq!(merged, "\n# top\nSTR_0001    :A\nSTR_0002    :B\n");
    }

    #[test]
    fn test_malformed_lines_are_copied_in_place() {
        let merged = merge_language_file(
            "STR_0001    :A\ngarbage\nSTR_0003    :C\n",
            &[Edit::new("STR_0003", "c")],
        );
        assert_eq!(merged, "STR_0001    :A\ngarbage\nSTR_0003    :c\n");
    }

    #[test]
    fn test_untouched_lines_keep_their_spacing() {
        let merged = merge_language_file(
            "STR_0001:tight\nSTR_0002\t:tab\n",
            &[Edit::new("STR_0003", "new")],
        );
        assert_eq!(merged, "STR_0001:tight\nSTR_0002\t:tab\nSTR_0003    :new\n");
    }

    #[test]
    fn test_custom_padding() {
        let merged = merge_with_padding("", &[Edit::new("STR_0001", "x")], 1);
        assert_eq!(merged, "STR_0001 :x\n");
        assert_eq!(format_entry("STR_0002", "", 0), "STR_0002:");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let edits = [Edit::new("STR_0002", "B"), Edit::new("STR_0003", "Z")];
        let once = merge_language_file(FILE, &edits);
        let twice = merge_language_file(&once, &edits);
        assert_eq!(once, twice);
    }
}
