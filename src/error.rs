use thiserror::Error;

pub const UNKNOWN_BACKEND_ERROR: &str = "Unknown error occurred";

/// Reasons a submission never leaves the client. None of these change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no log file selected")]
    MissingFile,
    #[error("no server selected")]
    MissingServer,
    #[error("dashboard name is empty")]
    MissingDashboardName,
    #[error("a submission is already in progress")]
    Busy,
    #[error("no selection round is active")]
    NoSelectionRound,
    #[error("the active selection round has no value")]
    NothingSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-2xx upload response, optionally carrying the backend's `detail`.
    #[error("backend rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    /// Non-2xx chat response; the body is not inspected.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl BackendError {
    /// Text shown inline in the uploader panel or the chat log.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { detail, .. } => detail
                .as_deref()
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or(UNKNOWN_BACKEND_ERROR)
                .to_string(),
            other => format!("Error: {other}"),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, UNKNOWN_BACKEND_ERROR};

    #[test]
    fn rejection_surfaces_detail_verbatim() {
        let err = BackendError::Rejected {
            status: 500,
            detail: Some("bad file".to_string()),
        };
        assert_eq!(err.user_message(), "bad file");
    }

    #[test]
    fn rejection_without_detail_uses_fallback() {
        let err = BackendError::Rejected {
            status: 422,
            detail: None,
        };
        assert_eq!(err.user_message(), UNKNOWN_BACKEND_ERROR);
    }

    #[test]
    fn chat_status_and_transport_errors_are_prefixed() {
        assert_eq!(
            BackendError::Status(503).user_message(),
            "Error: HTTP error! status: 503"
        );
        assert_eq!(
            BackendError::Transport("connection refused".to_string()).user_message(),
            "Error: connection refused"
        );
    }
}
