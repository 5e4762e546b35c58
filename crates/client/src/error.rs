//! Client error taxonomy.
//!
//! Propagation policy: API, auth, and validation failures carry the server's
//! message and are converted to a user-facing notification at the call site
//! nearest the user action. Transport and parse failures are the only
//! "unexpected" class and surface as a generic notice. Token decode failures
//! never reach this type - the session absorbs them and downgrades to
//! unauthenticated (see [`crate::token`]).

use thiserror::Error;

/// Errors that can occur when talking to the Tilbud backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (network unreachable, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend reported a failure (non-2xx or `success: false` envelope).
    #[error("api error: {0}")]
    Api(String),

    /// Backend rejected the credentials or the bearer token (401/403).
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Backend rejected the request body (400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A local precondition failed: the operation requires a signed-in
    /// session. No network call was made.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ClientError {
    /// Short user-facing message for this error.
    ///
    /// Server-provided messages are surfaced verbatim; transport and parse
    /// failures map to a generic notice - never a raw payload or a
    /// stack trace.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Netværksfejl - prøv igen senere.".to_owned(),
            Self::Parse(_) => "Noget gik galt. Prøv igen.".to_owned(),
            Self::Api(msg) | Self::Auth(msg) | Self::Validation(msg) => msg.clone(),
            Self::NotAuthenticated => "Log ind for at fortsætte.".to_owned(),
        }
    }

    /// Whether this error is unexpected and should also reach the top-level
    /// boundary (logged with full detail) rather than only the notification.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_messages_surface_verbatim() {
        let err = ClientError::Auth("Wrong email or password".to_owned());
        assert_eq!(err.user_message(), "Wrong email or password");

        let err = ClientError::Validation("Email is required".to_owned());
        assert_eq!(err.user_message(), "Email is required");
    }

    #[test]
    fn test_unexpected_errors_get_generic_notice() {
        let parse_err =
            ClientError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(parse_err.is_fatal());
        // Never leak the raw parse error to the user.
        assert!(!parse_err.user_message().contains("EOF"));
    }

    #[test]
    fn test_not_authenticated_is_local() {
        let err = ClientError::NotAuthenticated;
        assert!(!err.is_fatal());
        assert_eq!(err.user_message(), "Log ind for at fortsætte.");
    }
}
