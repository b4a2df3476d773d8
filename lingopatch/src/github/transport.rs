//! HTTP transport used by the GitHub client.
//!
//! The client only ever talks to a [`Transport`]; [`HttpTransport`] is the
//! `reqwest` implementation used outside of tests.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, RateLimit, Result};

/// Media type requested from the REST API.
pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("lingopatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
        }
    }
}

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub accept: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub token: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            accept: GITHUB_JSON.to_string(),
            token: None,
            body: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }
}

/// A response with the body already read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: String,
    /// Header names are lowercase.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            reason: reason_phrase(status).to_string(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(Error::Json)
    }

    /// The `X-RateLimit-*` headers. Absent or unparsable values read as zero.
    pub fn rate_limit(&self) -> RateLimit {
        let number = |name: &str| {
            self.header(name)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };
        RateLimit {
            limit: number("x-ratelimit-limit"),
            remaining: number("x-ratelimit-remaining"),
            reset: self
                .header("x-ratelimit-reset")
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0),
            resource: self
                .header("x-ratelimit-resource")
                .unwrap_or_default()
                .to_string(),
            used: number("x-ratelimit-used"),
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Something that can execute [`ApiRequest`]s.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; only failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(ACCEPT, &request.accept);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = lowercase_headers(response.headers());
        let body = response.text().await?;

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn lowercase_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = ApiResponse::new(200, "{}").with_header("X-RateLimit-Remaining", "12");
        assert_eq!(response.header("x-ratelimit-remaining"), Some("12"));
        assert_eq!(response.header("X-RATELIMIT-REMAINING"), Some("12"));
        assert!(response.is_success());
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let response = ApiResponse::new(403, "")
            .with_header("X-RateLimit-Limit", "60")
            .with_header("X-RateLimit-Remaining", "0")
            .with_header("X-RateLimit-Reset", "1700000000")
            .with_header("X-RateLimit-Resource", "core")
            .with_header("X-RateLimit-Used", "60");
        assert_eq!(
            response.rate_limit(),
            RateLimit {
                limit: 60,
                remaining: 0,
                reset: 1_700_000_000,
                resource: "core".to_string(),
                used: 60,
            }
        );
    }

    #[test]
    fn test_missing_rate_limit_headers_default_to_zero() {
        assert_eq!(ApiResponse::new(401, "").rate_limit(), RateLimit::default());
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(ApiResponse::new(404, "").reason, "Not Found");
        assert_eq!(ApiResponse::new(799, "").reason, "");
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new(Method::Post, "https://api.github.com/user")
            .with_token(Some("abc".to_string()))
            .with_body(Some(serde_json::json!({"a": 1})));
        assert_eq!(request.accept, GITHUB_JSON);
        assert_eq!(request.token.as_deref(), Some("abc"));
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
