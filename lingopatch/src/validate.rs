//! Validating pass over a language file.
//!
//! The parsers are lenient and skip what they cannot read; this module reports
//! what they skipped or what would break the merge preconditions.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::keys::{Line, compare_ids};
use crate::language_file::LanguageFile;

/// A problem found in a language file. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Data line whose id sorts before the preceding data line.
    Unsorted {
        line: usize,
        id: String,
        previous: String,
    },
    /// Id already defined on an earlier line.
    Duplicate {
        line: usize,
        id: String,
        first_line: usize,
    },
    /// Neither blank, comment nor data.
    Malformed { line: usize },
    MissingTrailingNewline,
}

impl Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Unsorted { line, id, previous } => {
                write!(f, "line {line}: {id} sorts before {previous}")
            }
            Finding::Duplicate {
                line,
                id,
                first_line,
            } => write!(f, "line {line}: {id} already defined on line {first_line}"),
            Finding::Malformed { line } => write!(f, "line {line}: not a comment or STR_xxxx entry"),
            Finding::MissingTrailingNewline => write!(f, "file does not end with a newline"),
        }
    }
}

/// Inspect a language file without changing it.
pub fn validate_language_file(file: &LanguageFile) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut previous: Option<&str> = None;

    for (number, line) in file.lines() {
        match line {
            Line::Data { id, .. } => {
                if let Some(&first_line) = first_seen.get(id) {
                    findings.push(Finding::Duplicate {
                        line: number,
                        id: id.to_string(),
                        first_line,
                    });
                } else {
                    first_seen.insert(id, number);
                }
                if let Some(prev) = previous {
                    if compare_ids(id, prev) == Ordering::Less {
                        findings.push(Finding::Unsorted {
                            line: number,
                            id: id.to_string(),
                            previous: prev.to_string(),
                        });
                    }
                }
                previous = Some(id);
            }
            Line::Malformed => findings.push(Finding::Malformed { line: number }),
            Line::Blank | Line::Comment => {}
        }
    }

    if !file.text().is_empty() && !file.text().ends_with('\n') {
        findings.push(Finding::MissingTrailingNewline);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_file_has_no_findings() {
        let file = LanguageFile::new("# header\nSTR_0001    :A\n\nSTR_0002    :B\n");
        assert!(validate_language_file(&file).is_empty());
    }

    #[test]
    fn test_reports_unsorted_duplicate_and_malformed() {
        let file = LanguageFile::new("STR_0002    :B\nSTR_0001    :A\noops\nSTR_0002    :again");
        let findings = validate_language_file(&file);
        assert_eq!(
            findings,
            vec![
                Finding::Unsorted {
                    line: 2,
                    id: "STR_0001".to_string(),
                    previous: "STR_0002".to_string(),
                },
                Finding::Malformed { line: 3 },
                Finding::Duplicate {
                    line: 4,
                    id: "STR_0002".to_string(),
                    first_line: 1,
                },
                Finding::MissingTrailingNewline,
            ]
        );
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::Duplicate {
            line: 7,
            id: "STR_0003".to_string(),
            first_line: 2,
        };
        assert_eq!(finding.to_string(), "line 7: STR_0003 already defined on line 2");
    }
}
