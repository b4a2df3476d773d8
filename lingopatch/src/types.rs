//! Core types shared by the parsers, the merger and the GitHub client.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// One translatable string as requested by an issue or found in a language file.
///
/// `new_text` is the text being added or kept, `old_text` the text being
/// replaced. At least one of them is set by every parser in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationString {
    /// Identifier of the form `STR_0000`.
    pub string_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub new_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub old_text: Option<String>,
}

impl TranslationString {
    pub fn new(string_id: impl Into<String>) -> Self {
        TranslationString {
            string_id: string_id.into(),
            new_text: None,
            old_text: None,
        }
    }

    pub fn with_new_text(mut self, text: impl Into<String>) -> Self {
        self.new_text = Some(text.into());
        self
    }

    pub fn with_old_text(mut self, text: impl Into<String>) -> Self {
        self.old_text = Some(text.into());
        self
    }

    /// A string that only appears with removed text: shown as removed, never edited.
    pub fn is_removal(&self) -> bool {
        self.old_text.is_some() && self.new_text.is_none()
    }

    /// The text to show as the source of a translation row.
    pub fn display_text(&self) -> &str {
        self.new_text
            .as_deref()
            .or(self.old_text.as_deref())
            .unwrap_or_default()
    }
}

/// A user's desired final value for one key of a language file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Edit {
    pub string_id: String,
    pub text: String,
}

impl Edit {
    pub fn new(string_id: impl Into<String>, text: impl Into<String>) -> Self {
        Edit {
            string_id: string_id.into(),
            text: text.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Edit {
    fn from((string_id, text): (K, V)) -> Self {
        Edit::new(string_id, text)
    }
}

/// A repository on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Repo {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn branch(&self, branch: impl Into<String>) -> Branch {
        Branch {
            repo: self.clone(),
            branch: branch.into(),
        }
    }

    /// The same repository name under another owner, e.g. a user's fork.
    pub fn with_owner(&self, owner: impl Into<String>) -> Repo {
        Repo::new(owner, self.name.clone())
    }
}

impl Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A branch of a [`Repo`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Branch {
    pub repo: Repo,
    pub branch: String,
}

impl Branch {
    pub fn path(&self, path: impl Into<String>) -> RepoPath {
        RepoPath {
            branch: self.clone(),
            path: path.into(),
        }
    }

    /// `owner:branch`, the form GitHub expects for a pull request head.
    pub fn head_label(&self) -> String {
        format!("{}:{}", self.repo.owner, self.branch)
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.repo, self.branch)
    }
}

/// A file (or folder) on a branch of a [`Repo`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RepoPath {
    pub branch: Branch,
    pub path: String,
}

impl RepoPath {
    pub fn repo(&self) -> &Repo {
        &self.branch.repo
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.branch, self.path)
    }
}
