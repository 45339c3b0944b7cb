//! Error types for access review operations

use thiserror::Error;

/// Main error type for access review operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Reviewer configuration or usage error
    ///
    /// Returned when the reviewer is constructed with an invalid combination
    /// of identity sources, or invoked without a bearer token while configured
    /// from a config template. Never retryable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Kubernetes API error from the rules-review round trip
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_carries_message() {
        let err = Error::config("only one identity source may be set");
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("identity source"));

        match err {
            Error::Config(msg) => assert_eq!(msg, "only one identity source may be set"),
            _ => panic!("expected Config variant"),
        }
    }

    #[test]
    fn config_error_accepts_owned_and_borrowed_messages() {
        let cluster = "devcluster1";
        let err = Error::config(format!("no token supplied for {}", cluster));
        assert!(err.to_string().contains("devcluster1"));

        let err = Error::config("static message");
        assert!(err.to_string().contains("static message"));
    }
}
