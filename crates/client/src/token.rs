//! Bearer token persistence and claim decoding.
//!
//! The token is an opaque bearer string with JWT-shaped embedded claims
//! (`role`, `email`, `name`, `exp`). The client holds no verification key
//! and performs no signature check - decoding is claim inspection only,
//! and validity is purely `exp` against the wall clock. A token that fails
//! to decode is treated exactly like no token at all.
//!
//! Persistence is a single file (the analog of the browser's one
//! local-storage key); nothing else is stored client-side.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the token store.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token text is not a decodable claims-bearing token.
    ///
    /// Absorbed by the session and downgraded to "not authenticated";
    /// never shown to the user.
    #[error("malformed token")]
    Malformed,

    /// Reading or writing the token file failed.
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Claims embedded in the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// User role, e.g. `"user"`.
    #[serde(default)]
    pub role: String,
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

impl Claims {
    /// Whether the claims are expired at `now`.
    ///
    /// `exp <= now` is expired; there is no refresh mechanism, so expiry is
    /// terminal and forces re-authentication.
    #[must_use]
    pub const fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Whether the claims are expired right now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Decode the claims segment of a bearer token.
///
/// Splits on `.`, base64-url-decodes the middle segment, and parses the
/// claims JSON. Any failure - wrong segment count, bad base64, bad JSON -
/// is [`TokenError::Malformed`]; nothing here panics on corrupted input.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// File-backed store for the single persisted bearer token.
///
/// `Debug` output includes the path only, never the token text.
pub struct TokenStore {
    path: PathBuf,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("path", &self.path)
            .finish()
    }
}

impl TokenStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted token, if any.
    ///
    /// A missing or empty file is simply "no token"; an unreadable file is
    /// logged and treated the same way.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_owned())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Token file unreadable");
                None
            }
        }
    }

    /// Persist a token, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Storage` if the file cannot be written.
    pub fn save(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    /// Delete the persisted token. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Storage` for I/O failures other than the file
    /// already being gone.
    pub fn clear(&self) -> Result<(), TokenError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenError::Storage(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Build an unsigned JWT-shaped token around the given claims JSON.
    fn make_token(claims_json: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_claims() {
        let token = make_token(
            r#"{"role":"user","email":"a@b.dk","name":"Anna","exp":4102444800}"#,
        );
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.email, "a@b.dk");
        assert_eq!(claims.name, "Anna");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_decode_malformed_inputs() {
        assert!(matches!(decode_claims(""), Err(TokenError::Malformed)));
        assert!(matches!(decode_claims("a.b"), Err(TokenError::Malformed)));
        assert!(matches!(decode_claims("a.b.c.d"), Err(TokenError::Malformed)));
        // Bad base64 in the payload segment.
        assert!(matches!(
            decode_claims("head.@@@.sig"),
            Err(TokenError::Malformed)
        ));
        // Valid base64, invalid JSON.
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(matches!(
            decode_claims(&format!("h.{payload}.s")),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        let claims = Claims {
            role: String::new(),
            email: String::new(),
            name: String::new(),
            exp: now.timestamp() - 1,
        };
        // One second in the past is expired, same as no token.
        assert!(claims.is_expired_at(now));

        let claims = Claims {
            exp: now.timestamp(),
            ..claims
        };
        assert!(claims.is_expired_at(now));

        let claims = Claims {
            exp: now.timestamp() + 1,
            ..claims
        };
        assert!(!claims.is_expired_at(now));
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load(), None);

        store.save("tok-123").unwrap();
        assert_eq!(store.load(), Some("tok-123".to_owned()));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // clear() is idempotent.
        store.clear().unwrap();
    }

    #[test]
    fn test_debug_never_prints_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save("super-secret-token").unwrap();

        let debug_output = format!("{store:?}");
        assert!(!debug_output.contains("super-secret-token"));
    }
}
