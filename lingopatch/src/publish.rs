//! The publish workflow: fork, branch, commit and optionally open a pull request.
//!
//! Steps run strictly in order and are not transactional. When a later step
//! fails, everything done before it (fork, branch, commit) stays in place and
//! is listed in the report carried by [`PublishError`].

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Error;
use crate::github::client::GitHubClient;
use crate::github::transport::Transport;
use crate::keys::{check_edits, normalize_edits};
use crate::merge::merge_language_file;
use crate::types::{Branch, Edit, Repo};

/// How far to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    /// Stop after the commit.
    Commit,
    DraftPullRequest,
    PullRequest,
}

/// Everything needed to publish one language's edits.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub upstream: Repo,
    pub base_branch: String,
    /// Folder of the language files, e.g. `data/language`.
    pub language_dir: String,
    pub language: String,
    /// Issue the edits answer, used in the commit message and PR body.
    pub issue: Option<u64>,
    pub edits: Vec<Edit>,
    pub action: PublishAction,
    /// Start of the publish, used for the branch name and fork detection.
    pub started_at: DateTime<Utc>,
}

impl PublishRequest {
    pub fn file_path(&self) -> String {
        format!(
            "{}/{}.txt",
            self.language_dir.trim_end_matches('/'),
            self.language
        )
    }

    /// `translate-<language>-<timestamp digits>`.
    pub fn branch_name(&self) -> String {
        let stamp: String = self
            .started_at
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        format!("translate-{}-{stamp}", self.language)
    }

    pub fn commit_message(&self) -> String {
        match self.issue {
            Some(issue) => format!("{}: Apply #{issue}", self.language),
            None => format!("{}: Update translations", self.language),
        }
    }

    pub fn pull_request_body(&self) -> String {
        match self.issue {
            Some(issue) => format!("Applying for issue:\n- #{issue}"),
            None => "Translation update.".to_string(),
        }
    }
}

/// One completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStep {
    Fork { url: String, created: bool },
    Branch { name: String, url: String },
    Commit { url: String },
    PullRequest { url: String, draft: bool },
}

impl Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStep::Fork { url, created: true } => write!(f, "created a new fork ({url})"),
            PublishStep::Fork { url, created: false } => write!(f, "fork already exists ({url})"),
            PublishStep::Branch { name, url } => write!(f, "created branch {name} ({url})"),
            PublishStep::Commit { url } => write!(f, "committed changes ({url})"),
            PublishStep::PullRequest { url, draft } => write!(
                f,
                "{} pull request ({url})",
                if *draft { "drafted" } else { "created" }
            ),
        }
    }
}

/// Steps completed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub steps: Vec<PublishStep>,
}

impl PublishReport {
    fn record(&mut self, step: PublishStep) {
        info!("{step}");
        self.steps.push(step);
    }

    pub fn pull_request_url(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match step {
            PublishStep::PullRequest { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }
}

/// A failed publish together with the steps that did complete.
#[derive(Debug)]
pub struct PublishError {
    pub error: Error,
    pub completed: PublishReport,
}

impl Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (after {} completed step(s))",
            self.error,
            self.completed.steps.len()
        )
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Run the workflow for `request`.
pub async fn publish<T: Transport>(
    client: &GitHubClient<T>,
    request: &PublishRequest,
) -> Result<PublishReport, PublishError> {
    let mut report = PublishReport::default();
    match run_steps(client, request, &mut report).await {
        Ok(()) => Ok(report),
        Err(error) => Err(PublishError {
            error,
            completed: report,
        }),
    }
}

async fn run_steps<T: Transport>(
    client: &GitHubClient<T>,
    request: &PublishRequest,
    report: &mut PublishReport,
) -> Result<(), Error> {
    if request.edits.is_empty() {
        return Err(Error::invalid(format!(
            "no edits to publish for {}",
            request.language
        )));
    }

    check_edits(&request.edits)?;

    let upstream_base = request.upstream.branch(request.base_branch.clone());
    let file_path = request.file_path();

    let upstream_file = client.get_file(&upstream_base.path(file_path.clone())).await?;
    let edits = normalize_edits(request.edits.iter().cloned());
    let content = merge_language_file(&upstream_file.content, &edits);
    info!(
        language = %request.language,
        edits = edits.len(),
        "merged edits into upstream file"
    );

    let user = client.get_user().await?;
    let fork = client.fork(&request.upstream).await?;
    report.record(PublishStep::Fork {
        url: fork.html_url.clone(),
        created: fork.created_at >= request.started_at,
    });

    let fork_repo = Repo::new(fork.owner.login.clone(), fork.name.clone());
    if fork_repo.owner != user.login {
        info!(fork = %fork_repo, user = %user.login, "fork owner differs from user");
    }
    let branch = Branch {
        repo: fork_repo,
        branch: request.branch_name(),
    };
    let base_sha = client.head_sha(&upstream_base).await?;
    client.create_branch(&branch, Some(&base_sha)).await?;
    report.record(PublishStep::Branch {
        name: branch.branch.clone(),
        url: format!("{}/tree/{}", fork.html_url, branch.branch),
    });

    let message = request.commit_message();
    let commit = client
        .commit_file(&branch.path(file_path), &content, &message, None)
        .await?;
    report.record(PublishStep::Commit {
        url: commit.commit.html_url,
    });

    let draft = match request.action {
        PublishAction::Commit => return Ok(()),
        PublishAction::DraftPullRequest => true,
        PublishAction::PullRequest => false,
    };
    let pull_request = client
        .create_pull_request(
            &branch,
            &upstream_base,
            &message,
            &request.pull_request_body(),
            draft,
        )
        .await?;
    report.record(PublishStep::PullRequest {
        url: pull_request.html_url,
        draft,
    });

    Ok(())
}
