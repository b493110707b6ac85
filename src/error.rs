use thiserror::Error;

/// Failures surfaced to callers of the snapshot pipeline.
///
/// Partial failures (an individual stylesheet fetch, an unresolved CSS
/// variable, a challenge phrase that never clears) are absorbed inside the
/// pipeline and degrade output instead of appearing here.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrl(String),

    #[error("Unable to reach the website. Please check the URL.")]
    Unreachable(String),

    #[error("Request timed out. The website took too long to respond.")]
    Timeout(String),

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Rendering session failed: {0}")]
    Renderer(String),

    #[error("Failed to extract content from the website.")]
    Internal(String),
}

impl SnapshotError {
    /// Status code for callers that map failures onto an HTTP surface.
    pub fn status_code(&self) -> u16 {
        match self {
            SnapshotError::MissingUrl | SnapshotError::InvalidUrl(_) => 400,
            SnapshotError::Unreachable(_) => 400,
            SnapshotError::Timeout(_) => 408,
            SnapshotError::UpstreamStatus { status } => *status,
            SnapshotError::Renderer(_) | SnapshotError::Internal(_) => 500,
        }
    }

    /// Detail string for logs; the Display impl stays caller-facing.
    pub fn detail(&self) -> &str {
        match self {
            SnapshotError::MissingUrl => "missing url",
            SnapshotError::InvalidUrl(d)
            | SnapshotError::Unreachable(d)
            | SnapshotError::Timeout(d)
            | SnapshotError::Renderer(d)
            | SnapshotError::Internal(d) => d,
            SnapshotError::UpstreamStatus { .. } => "upstream status",
        }
    }
}

/// Classifies a reqwest failure into the snapshot taxonomy.
pub fn classify_fetch_error(err: reqwest::Error) -> SnapshotError {
    if err.is_timeout() {
        SnapshotError::Timeout(err.to_string())
    } else if err.is_connect() {
        SnapshotError::Unreachable(err.to_string())
    } else {
        SnapshotError::Internal(err.to_string())
    }
}

/// Classifies a WebDriver command failure by message text.
///
/// Fantoccini surfaces browser-side navigation failures as opaque strings,
/// so host-resolution and timeout cases are recognized the same way the
/// browser reports them.
pub fn classify_webdriver_error(err: fantoccini::error::CmdError) -> SnapshotError {
    let message = err.to_string();
    if message.contains("ERR_NAME_NOT_RESOLVED")
        || message.contains("ENOTFOUND")
        || message.contains("EAI_AGAIN")
        || message.contains("not resolved")
    {
        SnapshotError::Unreachable(message)
    } else if message.to_lowercase().contains("timeout") || message.contains("ETIMEDOUT") {
        SnapshotError::Timeout(message)
    } else {
        SnapshotError::Renderer(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(SnapshotError::MissingUrl.status_code(), 400);
        assert_eq!(SnapshotError::InvalidUrl("x".into()).status_code(), 400);
        assert_eq!(SnapshotError::Unreachable("dns".into()).status_code(), 400);
        assert_eq!(SnapshotError::Timeout("nav".into()).status_code(), 408);
        assert_eq!(
            SnapshotError::UpstreamStatus { status: 503 }.status_code(),
            503
        );
        assert_eq!(SnapshotError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_display_messages_are_caller_facing() {
        let err = SnapshotError::Unreachable("ERR_NAME_NOT_RESOLVED".into());
        assert_eq!(
            err.to_string(),
            "Unable to reach the website. Please check the URL."
        );

        let err = SnapshotError::Timeout("navigation deadline".into());
        assert_eq!(
            err.to_string(),
            "Request timed out. The website took too long to respond."
        );
    }
}
