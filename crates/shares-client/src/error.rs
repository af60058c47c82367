//! Client-layer error taxonomy.

use thiserror::Error;

/// Maximum length for response bodies embedded in error messages.
const MAX_ERROR_BODY_LEN: usize = 256;

/// Errors surfaced by the REST envelope and resource API methods.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resource not found: {method} {url}: {body}")]
    NotFound {
        method: String,
        url: String,
        body: String,
    },

    #[error("forbidden: {method} {url}: {body}")]
    Forbidden {
        method: String,
        url: String,
        body: String,
    },

    #[error("{method} {url} returned status {actual}, expected {expected}: {body}")]
    UnexpectedStatus {
        method: String,
        url: String,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("response from {url} is missing the x-request-id correlation header")]
    MissingRequestId { url: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid microversion string: {0:?}")]
    InvalidMicroversion(String),
}

impl ApiError {
    /// True for the "already gone" outcomes a cleanup pass always
    /// tolerates: the resource no longer exists, or access to it was
    /// already revoked.
    pub fn is_gone(&self) -> bool {
        matches!(self, ApiError::NotFound { .. } | ApiError::Forbidden { .. })
    }
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LEN {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_ERROR_BODY_LEN)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...[truncated]", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gone_covers_not_found_and_forbidden() {
        let nf = ApiError::NotFound {
            method: "GET".into(),
            url: "http://x/shares/1".into(),
            body: String::new(),
        };
        let fb = ApiError::Forbidden {
            method: "DELETE".into(),
            url: "http://x/shares/1".into(),
            body: String::new(),
        };
        let other = ApiError::MissingRequestId {
            url: "http://x/shares".into(),
        };
        assert!(nf.is_gone());
        assert!(fb.is_gone());
        assert!(!other.is_gone());
    }

    #[test]
    fn test_truncate_body_limits_length() {
        let long = "x".repeat(1000);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() < long.len());
        assert_eq!(truncate_body("short"), "short");
    }
}
