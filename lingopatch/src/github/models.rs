//! GitHub REST payloads. Only the fields this crate reads are modelled.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::issue::{ParsedIssue, parse_issue};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    /// GitHub sends `null` for an empty description.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Present when the "issue" is a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn parse(&self) -> ParsedIssue {
        parse_issue(self.body_text())
    }
}

/// Filter for issue listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

impl std::str::FromStr for IssueState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            "all" => Ok(IssueState::All),
            other => Err(Error::invalid(format!("unknown issue state `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub owner: User,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fork: bool,
}

fn default_branch() -> String {
    "master".to_string()
}

/// One entry of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl FolderEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// File payload of the contents endpoint, before decoding.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentPayload {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentPayload {
    /// Content inlined as base64. Files over 1 MB come with `encoding: "none"`
    /// and have to be fetched from `download_url` instead.
    pub fn inline_content(&self) -> Option<Result<String>> {
        match (self.encoding.as_deref(), &self.content) {
            (Some("base64"), Some(content)) => Some(decode_base64(content)),
            (_, Some(content)) if self.size == 0 && content.is_empty() => Some(Ok(String::new())),
            _ => None,
        }
    }
}

/// A decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub name: String,
    pub path: String,
    /// Blob sha, needed to overwrite the file.
    pub sha: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: GitObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitResult {
    #[serde(default)]
    pub content: Option<ContentInfo>,
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentInfo {
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
}

/// Decode GitHub's base64, which is wrapped at 60 columns.
pub(crate) fn decode_base64(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))
}

pub(crate) fn encode_base64(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_with_null_body() {
        let issue: Issue = serde_json::from_str(
            r#"{"number": 7, "title": "t", "html_url": "u", "body": null, "state": "open"}"#,
        )
        .unwrap();
        assert_eq!(issue.body_text(), "");
        assert!(!issue.is_pull_request());
        assert!(issue.parse().strings.is_empty());
    }

    #[test]
    fn test_pull_request_marker() {
        let issue: Issue = serde_json::from_str(
            r#"{"number": 8, "title": "t", "html_url": "u", "body": "x", "pull_request": {"url": "p"}}"#,
        )
        .unwrap();
        assert!(issue.is_pull_request());
    }

    #[test]
    fn test_issue_state_parse() {
        assert_eq!("Open".parse::<IssueState>().unwrap(), IssueState::Open);
        assert_eq!("all".parse::<IssueState>().unwrap().as_str(), "all");
        assert!("merged".parse::<IssueState>().is_err());
    }

    #[test]
    fn test_base64_round_trip_with_line_wrapping() {
        let text = "STR_0001    :Grüße\n".repeat(10);
        let encoded = encode_base64(&text);
        let wrapped: String = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| format!("{}\n", std::str::from_utf8(chunk).unwrap()))
            .collect();
        assert_eq!(decode_base64(&wrapped).unwrap(), text);
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let error = decode_base64("@@@").unwrap_err();
        assert!(matches!(error, Error::Decode(_)));
    }

    #[test]
    fn test_large_file_has_no_inline_content() {
        let payload: ContentPayload = serde_json::from_str(
            r#"{"name": "de-DE.txt", "path": "data/language/de-DE.txt", "sha": "abc",
                "size": 2000000, "content": "", "encoding": "none",
                "download_url": "https://raw.example/de-DE.txt"}"#,
        )
        .unwrap();
        assert!(payload.inline_content().is_none());
    }
}
