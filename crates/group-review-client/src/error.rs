use thiserror::Error;

/// Why a create or update request did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestFailure {
    /// The server answered with a non-success status.
    #[error("server returned {status}{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Http { status: u16, detail: Option<String> },
    /// No response was received (connection refused, timeout, TLS failure).
    #[error("request failed: {message}")]
    Transport { message: String },
}

impl RequestFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestFailure::Http { status, .. } => Some(*status),
            RequestFailure::Transport { .. } => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            RequestFailure::Http { detail, .. } => detail.as_deref(),
            RequestFailure::Transport { .. } => None,
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        RequestFailure::Transport {
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let failure = RequestFailure::Http {
            status: 409,
            detail: Some("duplicate review".to_string()),
        };
        assert_eq!(failure.to_string(), "server returned 409: duplicate review");
        assert_eq!(failure.status(), Some(409));
        assert_eq!(failure.detail(), Some("duplicate review"));
    }

    #[test]
    fn test_display_without_detail() {
        let failure = RequestFailure::Http { status: 500, detail: None };
        assert_eq!(failure.to_string(), "server returned 500");
        assert_eq!(failure.detail(), None);
    }

    #[test]
    fn test_transport_has_no_status() {
        let failure = RequestFailure::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(failure.status(), None);
        assert_eq!(failure.detail(), None);
    }
}
