//! Typed GitHub REST operations.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::github::credentials::{CredentialProvider, StaticToken};
use crate::github::models::{
    CommitResult, ContentPayload, FolderEntry, GitRef, Issue, IssueState, PullRequest, RepoFile,
    Repository, User, encode_base64,
};
use crate::github::retry::{RetryPolicy, retry_with_backoff};
use crate::github::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::types::{Branch, Repo, RepoPath};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Issues fetched per page when listing.
pub const ISSUES_PER_PAGE: u32 = 100;

/// Turn a non-2xx response into a typed error.
///
/// - 401, or 403 with `X-RateLimit-Remaining: 0`, is a GitHub access error: a
///   403 and a 401 that reports an exhausted quota become
///   [`Error::QuotaExceeded`], any other 401 [`Error::AuthenticationRequired`].
/// - Any other status is [`Error::Transport`].
pub fn classify_response(response: &ApiResponse, authenticated: bool) -> Error {
    let remaining = response
        .header("x-ratelimit-remaining")
        .and_then(|value| value.trim().parse::<u64>().ok());

    match (response.status, remaining) {
        (403, Some(0)) | (401, Some(0)) => Error::QuotaExceeded {
            authenticated,
            rate_limit: response.rate_limit(),
        },
        (401, _) => Error::AuthenticationRequired {
            authenticated,
            rate_limit: response.rate_limit(),
        },
        _ => Error::Transport {
            status: response.status,
            reason: response.reason.clone(),
            headers: response.headers.clone(),
        },
    }
}

/// GitHub client over any [`Transport`].
pub struct GitHubClient<T: Transport = HttpTransport> {
    transport: T,
    credentials: Arc<dyn CredentialProvider>,
    api_url: String,
    fork_policy: RetryPolicy,
}

impl GitHubClient<HttpTransport> {
    /// Client over HTTPS against `api.github.com`.
    pub fn new(credentials: impl CredentialProvider + 'static) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, credentials))
    }

    pub fn anonymous() -> Result<Self> {
        Self::new(StaticToken::anonymous())
    }
}

impl<T: Transport> GitHubClient<T> {
    pub fn with_transport(transport: T, credentials: impl CredentialProvider + 'static) -> Self {
        GitHubClient {
            transport,
            credentials: Arc::new(credentials),
            api_url: DEFAULT_API_URL.to_string(),
            fork_policy: RetryPolicy::default(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Polling used while waiting for a new fork to become visible.
    pub fn with_fork_policy(mut self, policy: RetryPolicy) -> Self {
        self.fork_policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.token().is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}/{}", self.api_url, path.trim_start_matches('/'))
        }
    }

    /// Send one call and return the successful response.
    ///
    /// A 401 with a token attached is retried once without the token; the
    /// credential provider is left untouched.
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let url = self.url(path);
        let token = self.credentials.token();
        let authenticated = token.is_some();

        debug!(%method, %url, authenticated, "github request");
        let request = ApiRequest::new(method, url)
            .with_token(token)
            .with_body(body);
        let response = self.transport.send(&request).await?;

        if response.status == 401 && authenticated {
            warn!(url = %request.url, "token rejected, retrying without credentials");
            let anonymous = ApiRequest {
                token: None,
                ..request
            };
            let response = self.transport.send(&anonymous).await?;
            return Self::check(response, false);
        }

        Self::check(response, authenticated)
    }

    fn check(response: ApiResponse, authenticated: bool) -> Result<ApiResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(classify_response(&response, authenticated))
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.call(Method::Get, path, None).await?.json()
    }

    async fn send_json<R: DeserializeOwned>(&self, method: Method, path: &str, body: Value) -> Result<R> {
        self.call(method, path, Some(body)).await?.json()
    }

    /// The authenticated user.
    pub async fn get_user(&self) -> Result<User> {
        self.get("user").await
    }

    pub async fn get_issue(&self, repo: &Repo, number: u64) -> Result<Issue> {
        self.get(&format!("repos/{}/{}/issues/{number}", repo.owner, repo.name))
            .await
    }

    /// Lazily page through a repository's issues. Pull requests are skipped.
    pub fn list_issues(&self, repo: &Repo, state: IssueState) -> IssuePages<'_, T> {
        IssuePages {
            client: self,
            repo: repo.clone(),
            state,
            page: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    pub async fn get_repository(&self, repo: &Repo) -> Result<Repository> {
        self.get(&format!("repos/{}/{}", repo.owner, repo.name)).await
    }

    fn contents_path(path: &RepoPath) -> String {
        format!(
            "repos/{}/{}/contents/{}?ref={}",
            path.repo().owner,
            path.repo().name,
            path.path.trim_matches('/'),
            path.branch.branch
        )
    }

    /// Read and decode a file.
    pub async fn get_file(&self, path: &RepoPath) -> Result<RepoFile> {
        let payload: ContentPayload = self.get(&Self::contents_path(path)).await?;
        let content = match payload.inline_content() {
            Some(content) => content?,
            None => {
                let url = payload.download_url.as_deref().ok_or_else(|| {
                    Error::Decode(format!("{} has neither content nor download url", payload.path))
                })?;
                self.call(Method::Get, url, None).await?.body
            }
        };
        Ok(RepoFile {
            name: payload.name,
            path: payload.path,
            sha: payload.sha,
            content,
        })
    }

    pub async fn get_folder(&self, path: &RepoPath) -> Result<Vec<FolderEntry>> {
        self.get(&Self::contents_path(path)).await
    }

    /// Language codes available in a folder: its `.txt` files, sorted.
    pub async fn list_languages(&self, path: &RepoPath) -> Result<Vec<String>> {
        let mut languages: Vec<String> = self
            .get_folder(path)
            .await?
            .into_iter()
            .filter(FolderEntry::is_file)
            .filter_map(|entry| entry.name.strip_suffix(".txt").map(str::to_string))
            .collect();
        languages.sort();
        Ok(languages)
    }

    /// Fork `repo` into the authenticated account and wait until the fork is
    /// readable. Forking an already forked repository returns the existing fork.
    pub async fn fork(&self, repo: &Repo) -> Result<Repository> {
        let requested: Repository = self
            .send_json(
                Method::Post,
                &format!("repos/{}/{}/forks", repo.owner, repo.name),
                json!({}),
            )
            .await?;
        let fork = Repo::new(requested.owner.login, requested.name);

        retry_with_backoff(&self.fork_policy, &format!("fork of {repo}"), |_| {
            self.get_repository(&fork)
        })
        .await
    }

    /// Sha of a branch head.
    pub async fn head_sha(&self, branch: &Branch) -> Result<String> {
        let reference: GitRef = self
            .get(&format!(
                "repos/{}/{}/git/ref/heads/{}",
                branch.repo.owner, branch.repo.name, branch.branch
            ))
            .await?;
        Ok(reference.object.sha)
    }

    /// Create `branch` at `from_sha`, or at the head of the repository's
    /// default branch when no sha is given.
    pub async fn create_branch(&self, branch: &Branch, from_sha: Option<&str>) -> Result<GitRef> {
        let sha = match from_sha {
            Some(sha) => sha.to_string(),
            None => {
                let repository = self.get_repository(&branch.repo).await?;
                self.head_sha(&branch.repo.branch(repository.default_branch))
                    .await?
            }
        };
        self.send_json(
            Method::Post,
            &format!("repos/{}/{}/git/refs", branch.repo.owner, branch.repo.name),
            json!({
                "ref": format!("refs/heads/{}", branch.branch),
                "sha": sha,
            }),
        )
        .await
    }

    /// Current blob sha of a file, `None` if the file does not exist.
    async fn file_sha(&self, path: &RepoPath) -> Result<Option<String>> {
        match self.get::<ContentPayload>(&Self::contents_path(path)).await {
            Ok(payload) => Ok(Some(payload.sha)),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write `content` to `path` as one commit on the path's branch.
    ///
    /// Without `known_sha` the current sha is looked up first; a missing file
    /// is created.
    pub async fn commit_file(
        &self,
        path: &RepoPath,
        content: &str,
        message: &str,
        known_sha: Option<&str>,
    ) -> Result<CommitResult> {
        let sha = match known_sha {
            Some(sha) => Some(sha.to_string()),
            None => self.file_sha(path).await?,
        };

        let mut body = json!({
            "message": message,
            "content": encode_base64(content),
            "branch": path.branch.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha);
        }

        self.send_json(
            Method::Put,
            &format!(
                "repos/{}/{}/contents/{}",
                path.repo().owner,
                path.repo().name,
                path.path.trim_matches('/')
            ),
            body,
        )
        .await
    }

    /// Open a pull request from `head` into `base`.
    pub async fn create_pull_request(
        &self,
        head: &Branch,
        base: &Branch,
        title: &str,
        body: &str,
        draft: bool,
    ) -> Result<PullRequest> {
        let head_ref = if head.repo == base.repo {
            head.branch.clone()
        } else {
            head.head_label()
        };
        self.send_json(
            Method::Post,
            &format!("repos/{}/{}/pulls", base.repo.owner, base.repo.name),
            json!({
                "title": title,
                "body": body,
                "head": head_ref,
                "base": base.branch,
                "draft": draft,
            }),
        )
        .await
    }
}

/// Page-by-page issue listing, see [`GitHubClient::list_issues`].
///
/// Pages are fetched on demand and the sequence ends at the first empty page.
/// It cannot be rewound; call `list_issues` again to start over. After an
/// error the sequence is finished.
pub struct IssuePages<'a, T: Transport> {
    client: &'a GitHubClient<T>,
    repo: Repo,
    state: IssueState,
    page: u32,
    buffer: VecDeque<Issue>,
    done: bool,
}

impl<T: Transport> IssuePages<'_, T> {
    /// Next issue, fetching the next page when the current one is used up.
    pub async fn next(&mut self) -> Option<Result<Issue>> {
        loop {
            if let Some(issue) = self.buffer.pop_front() {
                return Some(Ok(issue));
            }
            if self.done {
                return None;
            }
            match self.next_page().await {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.page
    }

    /// Fetch one page into the buffer. `Ok(false)` once the listing is exhausted.
    async fn next_page(&mut self) -> Result<bool> {
        self.page += 1;
        let issues: Vec<Issue> = self
            .client
            .get(&format!(
                "repos/{}/{}/issues?state={}&per_page={ISSUES_PER_PAGE}&page={}",
                self.repo.owner,
                self.repo.name,
                self.state.as_str(),
                self.page
            ))
            .await?;

        if issues.is_empty() {
            self.done = true;
            return Ok(false);
        }
        self.buffer
            .extend(issues.into_iter().filter(|issue| !issue.is_pull_request()));
        Ok(true)
    }
}
