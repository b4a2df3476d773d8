//! Commands that talk to GitHub.

use chrono::Utc;
use lingopatch::github::{EnvToken, FirstAvailable, GitHubClient, IssueState, TokenFile};
use lingopatch::publish::{PublishError, PublishStep};
use lingopatch::{EditCache, Error, LanguageFile, PublishAction, PublishRequest, TextDocument, publish};

use crate::config::Config;
use crate::report::describe_error;
use crate::validation::{ValidationContext, validate_context};
use crate::view::{StringRow, print_issues, print_string_rows};

/// Turn a library error into the text shown to the user.
pub fn report(error: &Error) -> String {
    describe_error(error, Utc::now())
}

/// Client for the configured API, authenticated by `GITHUB_TOKEN` or the
/// stored token.
pub fn build_client(config: &Config) -> Result<GitHubClient, String> {
    let credentials = FirstAvailable::new()
        .with(EnvToken::default())
        .with(TokenFile::new(config.token_path()));
    let client = GitHubClient::new(credentials).map_err(|e| report(&e))?;
    Ok(client.with_api_url(&config.api_url))
}

fn validate_language(lang: &str) -> Result<(), String> {
    validate_context(&ValidationContext::new().with_language_code(lang.to_string()))
}

pub async fn run_issues_command(
    config: &Config,
    lang: Option<String>,
    state: String,
    full: bool,
) -> Result<(), String> {
    if let Some(lang) = &lang {
        validate_language(lang)?;
    }
    let state: IssueState = state.parse().map_err(|e: Error| e.to_string())?;
    let client = build_client(config)?;

    let mut pages = client.list_issues(&config.upstream(), state);
    let mut issues = Vec::new();
    while let Some(issue) = pages.next().await {
        let issue = issue.map_err(|e| report(&e))?;
        let wanted = match &lang {
            Some(lang) => issue.parse().needs_language(lang),
            None => true,
        };
        if wanted {
            issues.push(issue);
        }
    }
    tracing::info!(pages = pages.pages_fetched(), "listed issues");

    print_issues(&issues, full);
    Ok(())
}

/// Show the strings an issue requests next to the current translation.
///
/// The current translation is the locally edited one when there is an edit,
/// otherwise the one in `file` or upstream.
pub async fn run_show_command(
    config: &Config,
    issue_number: u64,
    lang: String,
    file: Option<String>,
    full: bool,
) -> Result<(), String> {
    let mut vctx = ValidationContext::new().with_language_code(lang.clone());
    if let Some(file) = &file {
        vctx = vctx.with_input_file(file.clone());
    }
    validate_context(&vctx)?;

    let client = build_client(config)?;
    let upstream = config.upstream();
    let issue = client
        .get_issue(&upstream, issue_number)
        .await
        .map_err(|e| report(&e))?;
    let parsed = issue.parse();

    let language_file = match &file {
        Some(path) => LanguageFile::read_from(path).map_err(|e| format!("Failed to read {}: {}", path, e))?,
        None => {
            let path = upstream
                .branch(config.base_branch.clone())
                .path(config.language_file_path(&lang));
            let remote = client.get_file(&path).await.map_err(|e| report(&e))?;
            LanguageFile::new(remote.content)
        }
    };

    let cache_path = config.cache_path();
    let mut cache = EditCache::open(&cache_path)
        .map_err(|e| format!("Cannot open edit cache {}: {}", cache_path.display(), e))?;
    let rows: Vec<StringRow> = parsed
        .strings
        .iter()
        .map(|string| {
            let upstream_text = language_file.lookup(&string.string_id);
            let edited = cache.get(&lang, &string.string_id).is_some();
            let current = cache.resolve(&lang, &string.string_id, upstream_text);
            StringRow {
                string_id: string.string_id.clone(),
                requested: string.display_text().to_string(),
                edited: edited && current.as_deref() != upstream_text,
                current,
                removal: string.is_removal(),
            }
        })
        .collect();
    cache
        .save()
        .map_err(|e| format!("Cannot save edit cache: {}", e))?;

    println!("#{} {}", issue.number, issue.title);
    println!("{}", issue.html_url);
    if !parsed.needs_language(&lang) {
        println!("ℹ️  {} is not listed as missing in this issue", lang);
    }
    print_string_rows(&rows, full);
    Ok(())
}

pub async fn run_languages_command(config: &Config) -> Result<(), String> {
    let client = build_client(config)?;
    let folder = config
        .upstream()
        .branch(config.base_branch.clone())
        .path(config.language_dir.clone());
    let languages = client.list_languages(&folder).await.map_err(|e| report(&e))?;
    for language in &languages {
        println!("{}", language);
    }
    Ok(())
}

fn print_steps(steps: &[PublishStep]) {
    for step in steps {
        println!("✅ {}", step);
    }
}

/// Publish the cached edits of one language.
pub async fn run_publish_command(
    config: &Config,
    lang: String,
    issue: Option<u64>,
    action: PublishAction,
) -> Result<(), String> {
    validate_language(&lang)?;

    let cache_path = config.cache_path();
    let cache = EditCache::open(&cache_path)
        .map_err(|e| format!("Cannot open edit cache {}: {}", cache_path.display(), e))?;
    let edits = cache.edits_for(&lang);
    if edits.is_empty() {
        return Err(format!(
            "No edits saved for {}; add some with `lingopatch edit set`",
            lang
        ));
    }

    let client = build_client(config)?;
    if !client.is_authenticated() {
        return Err("Publishing requires a GitHub login. Run `lingopatch login` or set GITHUB_TOKEN.".to_string());
    }

    let request = PublishRequest {
        upstream: config.upstream(),
        base_branch: config.base_branch.clone(),
        language_dir: config.language_dir.clone(),
        language: lang.clone(),
        issue,
        edits,
        action,
        started_at: Utc::now(),
    };
    println!("Publishing {} edit(s) for {}...", request.edits.len(), lang);

    match publish(&client, &request).await {
        Ok(summary) => {
            print_steps(&summary.steps);
            if let Some(url) = summary.pull_request_url() {
                println!("🔗 {}", url);
            }
            Ok(())
        }
        Err(PublishError { error, completed }) => {
            print_steps(&completed.steps);
            Err(report(&error))
        }
    }
}
