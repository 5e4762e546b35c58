//! The backend's uniform response envelope.
//!
//! Every endpoint answers `{success: bool, data?: ..., error?: "..."}`. The
//! gateway folds raw HTTP responses - including non-2xx statuses - into this
//! shape, so consumers only ever deal with a typed `Result`.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::ClientError;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    #[serde(default)]
    pub success: bool,
    /// Payload, present on success.
    pub data: Option<T>,
    /// Server-provided error message, present on failure.
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the envelope into a typed result.
    ///
    /// A `success: false` envelope - or a successful one with no payload -
    /// becomes [`ClientError::Api`] carrying the server message.
    pub fn into_result(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Api(
                self.error.unwrap_or_else(|| "Ukendt fejl fra serveren.".to_owned()),
            ));
        }
        self.data
            .ok_or_else(|| ClientError::Api("Tomt svar fra serveren.".to_owned()))
    }

    /// Unwrap an envelope whose payload does not matter (mutations).
    ///
    /// Success with or without data is `Ok(())`; failure carries the server
    /// message as with [`Self::into_result`].
    pub fn into_empty_result(self) -> Result<(), ClientError> {
        if self.success {
            Ok(())
        } else {
            Err(ClientError::Api(
                self.error.unwrap_or_else(|| "Ukendt fejl fra serveren.".to_owned()),
            ))
        }
    }
}

/// Map a non-2xx status and its server message to the error taxonomy.
///
/// 401/403 are authentication failures, 400 is a validation failure, and
/// everything else (including 5xx) is a plain API error.
pub(crate) fn error_for_status(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(message),
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        _ => ClientError::Api(message),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_yields_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_envelope_carries_server_message() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "error": "No result found"}"#).unwrap();
        match envelope.into_result() {
            Err(ClientError::Api(msg)) => assert_eq!(msg, "No result found"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_result_ignores_payload() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.into_empty_result().is_ok());

        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "error": "nope"}"#).unwrap();
        assert!(envelope.into_empty_result().is_err());
    }

    #[test]
    fn test_missing_fields_default_to_failure() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str("{}").unwrap();
        assert!(envelope.into_result().is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, "nope".into()),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "nope".into()),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, "bad".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            ClientError::Api(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "gone".into()),
            ClientError::Api(_)
        ));
    }
}
