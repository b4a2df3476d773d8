//! Human readable failure reports for GitHub errors.

use chrono::{DateTime, Local, Utc};
use lingopatch::{Error, RateLimit};

/// Relative time until `seconds` from now, e.g. `in 5 minutes`.
pub fn duration_string(seconds: i64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (minutes as f64 / 60.0).round() as i64;
    let days = (hours as f64 / 24.0).round() as i64;

    if seconds < 2 {
        "now".to_string()
    } else if minutes < 2 {
        format!("in {} seconds", seconds)
    } else if hours < 2 {
        format!("in {} minutes", minutes)
    } else if days < 2 {
        format!("in {} hours", hours)
    } else {
        format!("in {} days", days)
    }
}

/// Absolute local time of a reset followed by the relative duration.
pub fn reset_string(reset: i64, now: DateTime<Utc>) -> String {
    let relative = duration_string(reset - now.timestamp());
    match DateTime::<Utc>::from_timestamp(reset, 0) {
        Some(at) => format!(
            "{} ({})",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            relative
        ),
        None => relative,
    }
}

fn rate_limit_lines(rate_limit: &RateLimit, authenticated: bool, now: DateTime<Utc>) -> Vec<String> {
    vec![
        format!(
            "You are {}authenticated.",
            if authenticated { "" } else { "not " }
        ),
        format!("Limit: {}", rate_limit.limit),
        format!("Used: {}", rate_limit.used),
        format!("Remaining: {}", rate_limit.remaining),
        format!("Resource: {}", rate_limit.resource),
        format!("Resets: {}", reset_string(rate_limit.reset, now)),
    ]
}

/// Multi-line report with a title, details and what the user can do.
pub fn describe_error(error: &Error, now: DateTime<Utc>) -> String {
    let mut out = Vec::new();
    match error {
        Error::QuotaExceeded { authenticated, rate_limit } => {
            out.push("GitHub API rate limit exceeded.".to_string());
            out.push("Details:".to_string());
            out.extend(
                rate_limit_lines(rate_limit, *authenticated, now)
                    .into_iter()
                    .map(|line| format!("  - {}", line)),
            );
            out.push("Solutions:".to_string());
            if *authenticated {
                out.push("  - Log in with a different GitHub account to reset the limit: lingopatch login --force".to_string());
            } else {
                out.push("  - Log in to GitHub to increase the limit: lingopatch login".to_string());
            }
            out.push("  - Wait for the rate limit to reset and retry.".to_string());
        }
        Error::AuthenticationRequired { .. } => {
            out.push("GitHub authentication required.".to_string());
            out.push("This action needs a GitHub login. Run `lingopatch login` or set GITHUB_TOKEN.".to_string());
        }
        Error::Transport { status, reason, headers } => {
            out.push("Unknown HTTP error.".to_string());
            out.push("Details:".to_string());
            out.push(format!("  - Status: {} {}", status, reason));
            let headers = serde_json::to_string(headers).unwrap_or_default();
            out.push(format!("  - Headers: {}", headers));
            out.push("Solutions:".to_string());
            out.push("  - Retry and hope that the error resolves by itself.".to_string());
        }
        Error::Timeout { .. } => {
            out.push(format!("{}.", error));
            out.push("GitHub may still be processing the request; retry in a moment.".to_string());
        }
        _ => {
            out.push("Unknown error.".to_string());
            out.push(format!("  {}", error));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    #[test]
    fn test_duration_string() {
        assert_eq!(duration_string(-5), "now");
        assert_eq!(duration_string(1), "now");
        assert_eq!(duration_string(45), "in 45 seconds");
        assert_eq!(duration_string(600), "in 10 minutes");
        assert_eq!(duration_string(3 * 3600), "in 3 hours");
        assert_eq!(duration_string(5 * 86400), "in 5 days");
    }

    #[test]
    fn test_describe_quota_error() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let error = Error::QuotaExceeded {
            authenticated: false,
            rate_limit: RateLimit {
                limit: 60,
                remaining: 0,
                reset: now.timestamp() + 1200,
                resource: "core".to_string(),
                used: 60,
            },
        };
        let text = describe_error(&error, now);
        assert!(text.starts_with("GitHub API rate limit exceeded."));
        assert!(text.contains("You are not authenticated."));
        assert!(text.contains("Limit: 60"));
        assert!(text.contains("(in 20 minutes)"));
        assert!(text.contains("lingopatch login"));
    }

    #[test]
    fn test_describe_transport_error() {
        let mut headers = BTreeMap::new();
        headers.insert("x-github-request-id".to_string(), "abc".to_string());
        let error = Error::Transport {
            status: 502,
            reason: "Bad Gateway".to_string(),
            headers,
        };
        let text = describe_error(&error, Utc::now());
        assert!(text.contains("Status: 502 Bad Gateway"));
        assert!(text.contains(r#"{"x-github-request-id":"abc"}"#));
    }
}
