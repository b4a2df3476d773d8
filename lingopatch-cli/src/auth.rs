//! Login and stored-token management.

use lingopatch::github::oauth::take_token_from_url;
use lingopatch::github::{HttpTransport, TokenFile, authorize_url, exchange_code};

use crate::config::Config;
use crate::remote::report;

/// Environment variable with the OAuth app secret, needed to exchange a code.
pub const CLIENT_SECRET_ENV: &str = "LINGOPATCH_CLIENT_SECRET";

/// Where to come back to after the authorization page.
const DEFAULT_STATE: &str = "http://localhost/";

fn token_file(config: &Config) -> TokenFile {
    TokenFile::new(config.token_path())
}

fn store_token(config: &Config, token: &str) -> Result<(), String> {
    let file = token_file(config);
    file.save(token)
        .map_err(|e| format!("Cannot store token at {}: {}", file.path().display(), e))?;
    println!("✅ Token stored at {}", file.path().display());
    Ok(())
}

/// How the user finishes a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginInput {
    /// Print the authorization URL.
    Start { force: bool, state: Option<String> },
    /// Exchange an authorization code for a token.
    Code(String),
    /// Take the token from the URL the handler redirected to.
    RedirectUrl(String),
}

pub async fn run_login_command(config: &Config, input: LoginInput) -> Result<(), String> {
    match input {
        LoginInput::Start { force, state } => {
            let state = state.unwrap_or_else(|| DEFAULT_STATE.to_string());
            let url = authorize_url(&config.oauth_app(), &state, force).map_err(|e| e.to_string())?;
            println!("Open this URL in a browser to log in to GitHub:\n\n  {}\n", url);
            println!("Then finish with `lingopatch login --redirect-url <URL>` using the URL you land on.");
            Ok(())
        }
        LoginInput::Code(code) => {
            let secret = std::env::var(CLIENT_SECRET_ENV)
                .map_err(|_| format!("{} must be set to exchange a code", CLIENT_SECRET_ENV))?;
            let transport = HttpTransport::new().map_err(|e| report(&e))?;
            let token = exchange_code(&transport, &config.oauth_app(), &secret, &code)
                .await
                .map_err(|e| report(&e))?;
            store_token(config, &token)
        }
        LoginInput::RedirectUrl(url) => {
            let (token, _) = take_token_from_url(&url).map_err(|e| e.to_string())?;
            let token = token.ok_or_else(|| format!("No access_token found in {}", url))?;
            store_token(config, &token)
        }
    }
}

pub fn run_token_set_command(config: &Config, token: String) -> Result<(), String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("Token cannot be empty".to_string());
    }
    store_token(config, token)
}

pub fn run_token_clear_command(config: &Config) -> Result<(), String> {
    let file = token_file(config);
    file.clear()
        .map_err(|e| format!("Cannot remove token at {}: {}", file.path().display(), e))?;
    println!("✅ Logged out");
    Ok(())
}
