//! OAuth authorization-code flow helpers.
//!
//! The flow is: send the user to [`authorize_url`], let GitHub redirect to a
//! small handler that calls [`exchange_code`], then hand the token back to the
//! originating page with [`redirect_with_token`]. Passing the token in the URL
//! is only acceptable because this is a local tool without a backend.

use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::github::transport::{ApiRequest, Method, Transport};

pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Query parameter carrying the token back to the caller.
pub const TOKEN_PARAM: &str = "access_token";

/// A registered OAuth application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthApp {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl OAuthApp {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        OAuthApp {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: "public_repo".to_string(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// Authorization page URL. `state` is returned to the redirect handler
/// untouched, typically the URL to come back to. `force_login` asks GitHub to
/// show the account chooser even when a session exists.
pub fn authorize_url(app: &OAuthApp, state: &str, force_login: bool) -> Result<String> {
    let mut params = vec![
        ("client_id", app.client_id.as_str()),
        ("redirect_uri", app.redirect_uri.as_str()),
        ("scope", app.scope.as_str()),
        ("state", state),
    ];
    if force_login {
        params.push(("prompt", "login"));
    }
    let url = Url::parse_with_params(AUTHORIZE_URL, &params)
        .map_err(|e| Error::invalid(format!("cannot build authorize url: {e}")))?;
    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code<T: Transport>(
    transport: &T,
    app: &OAuthApp,
    client_secret: &str,
    code: &str,
) -> Result<String> {
    if code.trim().is_empty() {
        return Err(Error::OAuth("missing code".to_string()));
    }

    let request = ApiRequest::new(Method::Post, TOKEN_URL)
        .with_accept("application/json")
        .with_body(Some(json!({
            "client_id": app.client_id,
            "client_secret": client_secret,
            "code": code,
        })));
    let response = transport.send(&request).await?;
    if !response.is_success() {
        return Err(Error::OAuth(format!(
            "token endpoint answered {} {}",
            response.status, response.reason
        )));
    }

    let payload: TokenResponse = response.json()?;
    if let Some(error) = payload.error {
        return Err(Error::OAuth(payload.error_description.unwrap_or(error)));
    }
    payload
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::OAuth("response carried no access token".to_string()))
}

/// `return_url` with the token appended as a query parameter.
pub fn redirect_with_token(return_url: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(return_url)
        .map_err(|e| Error::invalid(format!("invalid return url `{return_url}`: {e}")))?;
    url.query_pairs_mut().append_pair(TOKEN_PARAM, token);
    Ok(url.to_string())
}

/// Split a redirected URL into the token it carries and the URL without it.
pub fn take_token_from_url(url: &str) -> Result<(Option<String>, String)> {
    let mut parsed =
        Url::parse(url).map_err(|e| Error::invalid(format!("invalid url `{url}`: {e}")))?;

    let mut token = None;
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter_map(|(key, value)| {
            if key == TOKEN_PARAM {
                token = Some(value.into_owned());
                None
            } else {
                Some((key.into_owned(), value.into_owned()))
            }
        })
        .collect();

    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }
    Ok((token, parsed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> OAuthApp {
        OAuthApp::new("client123", "https://handler.example/callback")
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let url = authorize_url(&app(), "http://localhost:8000/?issue=1", false).unwrap();
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fhandler.example%2Fcallback"));
        assert!(url.contains("scope=public_repo"));
        assert!(url.contains("state=http%3A%2F%2Flocalhost%3A8000%2F%3Fissue%3D1"));
        assert!(!url.contains("prompt=login"));
    }

    #[test]
    fn test_authorize_url_force_login() {
        let url = authorize_url(&app(), "s", true).unwrap();
        assert!(url.ends_with("&prompt=login"));
    }

    #[test]
    fn test_redirect_and_take_token() {
        let redirect = redirect_with_token("http://localhost:8000/edit.html?language=de-DE", "gho_1").unwrap();
        assert_eq!(
            redirect,
            "http://localhost:8000/edit.html?language=de-DE&access_token=gho_1"
        );

        let (token, rest) = take_token_from_url(&redirect).unwrap();
        assert_eq!(token.as_deref(), Some("gho_1"));
        assert_eq!(rest, "http://localhost:8000/edit.html?language=de-DE");
    }

    #[test]
    fn test_take_token_only_param() {
        let (token, rest) = take_token_from_url("http://localhost:8000/?access_token=abc").unwrap();
        assert_eq!(token.as_deref(), Some("abc"));
        assert_eq!(rest, "http://localhost:8000/");
    }

    #[test]
    fn test_invalid_return_url() {
        assert!(redirect_with_token("not a url", "t").is_err());
    }
}
