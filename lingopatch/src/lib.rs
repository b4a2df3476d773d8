#![forbid(unsafe_code)]
//! Translation toolkit for the OpenRCT2 localisation repository.
//!
//! Reads translation requests out of issue bodies, parses and patches the
//! `STR_NNNN    :text` language files, and publishes the result to GitHub as a
//! fork, branch, commit and pull request.
//!
//! # Quick Start
//!
//! ```rust
//! use lingopatch::{Edit, LanguageFile, merge_language_file, parse_issue};
//!
//! let issue = parse_issue("STR_0002    :Hello\n- [ ] de-DE");
//! assert_eq!(issue.strings[0].string_id, "STR_0002");
//!
//! let merged = merge_language_file(
//!     "STR_0001    :Eins\nSTR_0003    :Drei\n",
//!     &[Edit::new("STR_0002", "Zwei")],
//! );
//! let file = LanguageFile::new(merged);
//! assert_eq!(file.lookup("STR_0002"), Some("Zwei"));
//! ```
//!
//! # Modules
//!
//! - [`issue`]: translation requests in issue bodies
//! - [`language_file`] and [`merge`]: reading and patching language files
//! - [`validate`]: ordering and format checks for language files
//! - [`github`]: REST client with rate-limit aware error handling
//! - [`cache`]: local store of unpublished edits
//! - [`publish`]: the fork to pull request workflow

pub mod cache;
pub mod error;
pub mod github;
pub mod issue;
pub mod keys;
pub mod language_file;
pub mod merge;
pub mod publish;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export most used types for easy consumption
pub use crate::{
    cache::EditCache,
    error::{Error, ErrorKind, RateLimit, Result},
    github::{CredentialProvider, GitHubClient, Transport},
    issue::{ParsedIssue, parse_issue},
    keys::{check_edits, is_string_id, normalize_edits},
    language_file::LanguageFile,
    merge::merge_language_file,
    publish::{PublishAction, PublishReport, PublishRequest, publish},
    traits::TextDocument,
    types::{Branch, Edit, Repo, RepoPath, TranslationString},
    validate::{Finding, validate_language_file},
};
