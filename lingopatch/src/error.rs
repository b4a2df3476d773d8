//! All error types for the lingopatch crate.
//!
//! Parsing and merging never fail: malformed lines are skipped. Everything
//! here comes from the GitHub client, the edit cache or file I/O.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Rate-limit bookkeeping reported by GitHub in `X-RateLimit-*` headers.
///
/// Missing or unparsable headers read as `0` (or an empty resource).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the quota resets.
    pub reset: i64,
    pub resource: String,
    pub used: u64,
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "limit: {}, remaining: {}, reset: {}, resource: {}, used: {}",
            self.limit, self.remaining, self.reset, self.resource, self.used
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub rate limit exceeded [authenticated: {authenticated}, {rate_limit}]")]
    QuotaExceeded {
        authenticated: bool,
        rate_limit: RateLimit,
    },

    #[error("GitHub authentication required [authenticated: {authenticated}, {rate_limit}]")]
    AuthenticationRequired {
        authenticated: bool,
        rate_limit: RateLimit,
    },

    #[error("HTTP error {status}: {reason}")]
    Transport {
        status: u16,
        reason: String,
        headers: BTreeMap<String, String>,
    },

    #[error("{operation} did not complete after {attempts} attempts")]
    Timeout { operation: String, attempts: u32 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode file content: {0}")]
    Decode(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse failure classes used by presentation layers to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    QuotaExceeded,
    AuthenticationRequired,
    Transport,
    Timeout,
    Unknown,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Error::AuthenticationRequired { .. } => ErrorKind::AuthenticationRequired,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Timeout { .. } => ErrorKind::Timeout,
            _ => ErrorKind::Unknown,
        }
    }

    /// HTTP status of a transport failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Rate-limit data attached to GitHub quota/auth failures.
    pub fn rate_limit(&self) -> Option<&RateLimit> {
        match self {
            Error::QuotaExceeded { rate_limit, .. }
            | Error::AuthenticationRequired { rate_limit, .. } => Some(rate_limit),
            _ => None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn timeout(operation: impl Into<String>, attempts: u32) -> Self {
        Error::Timeout {
            operation: operation.into(),
            attempts,
        }
    }
}
