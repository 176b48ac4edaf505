use thiserror::Error;

pub const SERVICE_FALLBACK_MESSAGE: &str = "Error retrieving solution";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// A submission blocked before any request is made. Nothing is shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("clue is empty")]
    EmptyClue,
}

/// A submission that reached the solving service but produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("solving service returned {status}: {}", .message.as_deref().unwrap_or(SERVICE_FALLBACK_MESSAGE))]
    Service { status: u16, message: Option<String> },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl SolveError {
    /// Text placed on the error surface.
    pub fn user_message(&self) -> &str {
        match self {
            SolveError::Service { message, .. } => message
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or(SERVICE_FALLBACK_MESSAGE),
            SolveError::Transport(_) => NETWORK_ERROR_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for SolveError {
    fn from(value: reqwest::Error) -> Self {
        SolveError::Transport(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_message_is_verbatim() {
        let err = SolveError::Service {
            status: 400,
            message: Some("No clue provided".into()),
        };
        assert_eq!(err.user_message(), "No clue provided");
    }

    #[test]
    fn service_without_message_falls_back() {
        let err = SolveError::Service {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), SERVICE_FALLBACK_MESSAGE);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn transport_detail_is_not_surfaced() {
        let err = SolveError::Transport("connection refused".into());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
    }
}
