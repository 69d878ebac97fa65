use thiserror::Error;

/// Errors surfaced by a chat exchange.
///
/// Every variant is returned to the caller of the send operation; the
/// transcript is left in its last-good state.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Non-2xx response, or a network failure before any bytes arrived.
    #[error("API error: {} - {message}", status_label(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("no response body")]
    MissingBody,

    /// The byte stream failed after the response started.
    #[error("stream error: {0}")]
    Stream(String),

    /// The stream ended in the middle of a multi-byte character.
    #[error("decode error: {0}")]
    Decode(String),

    /// The transcript is not in a state that allows the requested operation.
    #[error("invalid transcript: {0}")]
    InvalidTranscript(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "network".to_string(),
    }
}

/// Errors from repository operations (used by trait definitions in claimchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = ChatError::Transport {
            status: Some(429),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 429 - rate limited");
    }

    #[test]
    fn test_network_error_display() {
        let err = ChatError::Transport {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "API error: network - connection refused");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
