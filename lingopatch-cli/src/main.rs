mod auth;
mod config;
mod edit;
mod files;
mod logging;
mod remote;
mod report;
mod validation;
mod view;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use lingopatch::PublishAction;

use crate::auth::{LoginInput, run_login_command, run_token_clear_command, run_token_set_command};
use crate::config::{Config, load_config};
use crate::edit::{
    run_edit_clear_command, run_edit_get_command, run_edit_list_command, run_edit_remove_command,
    run_edit_set_command,
};
use crate::files::{run_check_command, run_lookup_command, run_merge_command, run_parse_issue_command};
use crate::remote::{run_issues_command, run_languages_command, run_publish_command, run_show_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a lingopatch.toml (default: nearest one upwards from here)
    #[arg(long, global = true, env = "LINGOPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List translation issues, optionally only those missing a language.
    Issues {
        /// Only issues whose checklist still lists this language
        #[arg(short, long)]
        lang: Option<String>,

        /// Issue state: open, closed or all
        #[arg(long, default_value = "open")]
        state: String,

        /// Display full titles without truncation
        #[arg(long)]
        full: bool,
    },

    /// Show the strings an issue requests with their current translation.
    Show {
        /// Issue number
        #[arg(long)]
        issue: u64,

        /// Language code, e.g. de-DE
        #[arg(short, long)]
        lang: String,

        /// Read the language file locally instead of from upstream
        #[arg(short, long)]
        file: Option<String>,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },

    /// Parse an issue body saved to a file.
    ParseIssue {
        /// The issue body
        #[arg(short, long)]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the text of one string in a language file.
    Lookup {
        /// The language file
        #[arg(short, long)]
        input: String,

        /// String id, e.g. STR_0001
        #[arg(short, long)]
        key: String,
    },

    /// Merge edits into a language file.
    Merge {
        /// The language file
        #[arg(short, long)]
        input: String,

        /// Edit as STR_NNNN=TEXT (repeatable)
        #[arg(long = "set", value_name = "STR_NNNN=TEXT")]
        assignments: Vec<String>,

        /// JSON object of edits, {"STR_NNNN": "text"}
        #[arg(long)]
        edits: Option<String>,

        /// Output file (default: update the input in place)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check a language file for ordering and format problems.
    Check {
        /// The language file
        #[arg(short, long)]
        input: String,
    },

    /// Manage locally saved edits.
    Edit {
        #[command(subcommand)]
        command: EditCommands,
    },

    /// Fork, branch, commit and open a pull request with the saved edits.
    #[command(group(ArgGroup::new("action").args(["draft", "commit_only"])))]
    Publish {
        /// Language code, e.g. de-DE
        #[arg(short, long)]
        lang: String,

        /// Issue the edits answer
        #[arg(long)]
        issue: Option<u64>,

        /// Open the pull request as a draft
        #[arg(long)]
        draft: bool,

        /// Stop after the commit
        #[arg(long)]
        commit_only: bool,
    },

    /// Log in to GitHub with OAuth.
    #[command(group(ArgGroup::new("finish").args(["code", "redirect_url"])))]
    Login {
        /// Ask GitHub for the account chooser even with an active session
        #[arg(long)]
        force: bool,

        /// State passed through the authorization page
        #[arg(long)]
        state: Option<String>,

        /// Exchange this authorization code (needs LINGOPATCH_CLIENT_SECRET)
        #[arg(long)]
        code: Option<String>,

        /// Take the token from the URL the login redirected to
        #[arg(long)]
        redirect_url: Option<String>,
    },

    /// Manage the stored GitHub token.
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// List the languages available upstream.
    Languages,
}

#[derive(Subcommand, Debug)]
enum EditCommands {
    /// Save an edit.
    Set {
        #[arg(short, long)]
        lang: String,
        #[arg(short, long)]
        key: String,
        /// New text
        #[arg(short, long)]
        text: String,
    },
    /// Print a saved edit.
    Get {
        #[arg(short, long)]
        lang: String,
        #[arg(short, long)]
        key: String,
    },
    /// Drop one saved edit.
    Remove {
        #[arg(short, long)]
        lang: String,
        #[arg(short, long)]
        key: String,
    },
    /// List the saved edits of a language.
    List {
        #[arg(short, long)]
        lang: String,
        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },
    /// Drop every saved edit of a language.
    Clear {
        #[arg(short, long)]
        lang: String,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Store a personal access token.
    Set { token: String },
    /// Remove the stored token.
    Clear,
}

async fn run(commands: Commands, config: &Config) -> Result<(), String> {
    match commands {
        Commands::Issues { lang, state, full } => run_issues_command(config, lang, state, full).await,
        Commands::Show {
            issue,
            lang,
            file,
            full,
        } => run_show_command(config, issue, lang, file, full).await,
        Commands::ParseIssue { input, json } => run_parse_issue_command(input, json),
        Commands::Lookup { input, key } => run_lookup_command(input, key),
        Commands::Merge {
            input,
            assignments,
            edits,
            output,
        } => run_merge_command(input, assignments, edits, output),
        Commands::Check { input } => run_check_command(input),
        Commands::Edit { command } => match command {
            EditCommands::Set { lang, key, text } => run_edit_set_command(config, lang, key, text),
            EditCommands::Get { lang, key } => run_edit_get_command(config, lang, key),
            EditCommands::Remove { lang, key } => run_edit_remove_command(config, lang, key),
            EditCommands::List { lang, full } => run_edit_list_command(config, lang, full),
            EditCommands::Clear { lang } => run_edit_clear_command(config, lang),
        },
        Commands::Publish {
            lang,
            issue,
            draft,
            commit_only,
        } => {
            let action = match (draft, commit_only) {
                (_, true) => PublishAction::Commit,
                (true, false) => PublishAction::DraftPullRequest,
                (false, false) => PublishAction::PullRequest,
            };
            run_publish_command(config, lang, issue, action).await
        }
        Commands::Login {
            force,
            state,
            code,
            redirect_url,
        } => {
            let input = match (code, redirect_url) {
                (Some(code), _) => LoginInput::Code(code),
                (None, Some(url)) => LoginInput::RedirectUrl(url),
                (None, None) => LoginInput::Start { force, state },
            };
            run_login_command(config, input).await
        }
        Commands::Token { command } => match command {
            TokenCommands::Set { token } => run_token_set_command(config, token),
            TokenCommands::Clear => run_token_clear_command(config),
        },
        Commands::Languages => run_languages_command(config).await,
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let result = match load_config(args.config.as_deref(), &cwd) {
        Ok(config) => run(args.commands, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
