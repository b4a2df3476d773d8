//! Thin GitHub REST client.
//!
//! This module re-exports the pieces callers need: the client itself, its
//! transport and credential seams, the payload models and the OAuth helpers.

pub mod client;
pub mod credentials;
pub mod models;
pub mod oauth;
pub mod retry;
pub mod transport;

pub use client::{DEFAULT_API_URL, GitHubClient, IssuePages, classify_response};
pub use credentials::{CredentialProvider, EnvToken, FirstAvailable, StaticToken, TokenFile};
pub use models::{
    CommitResult, FolderEntry, GitRef, Issue, IssueState, PullRequest, RepoFile, Repository, User,
};
pub use oauth::{OAuthApp, authorize_url, exchange_code, redirect_with_token};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
