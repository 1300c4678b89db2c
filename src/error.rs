//! Error types for image transformation.

use std::time::Duration;

/// Errors that can occur while transforming an image.
#[derive(Debug, thiserror::Error)]
pub enum RestyleError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Delay suggested by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// Invalid request parameters or input image.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading the input or saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The service answered with a body we could not interpret.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for transformation operations.
pub type Result<T> = std::result::Result<T, RestyleError>;

/// Longest error body kept in an error message.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Trims an error body for display and strips anything that looks like an API key.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let scrubbed: String = text
        .split_whitespace()
        .map(|word| {
            let trimmed =
                word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-');
            if trimmed.starts_with("AIza") && trimmed.len() >= 30 {
                word.replace(trimmed, "[REDACTED]")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if scrubbed.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = scrubbed.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        scrubbed
    }
}

/// Reads a `Retry-After` header given in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
