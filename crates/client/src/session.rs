//! Authentication session state machine.
//!
//! States: `Unauthenticated -> Authenticating -> Authenticated`, falling
//! back to `Unauthenticated` on expiry or logout. Validity is a pure
//! function of the decoded `exp` claim against the wall clock - no network
//! round-trip validates a token. There is no refresh mechanism; an expired
//! token is deleted and the user signs in again.
//!
//! A stored token that fails to decode is absorbed: the session starts
//! `Unauthenticated` and the corrupted value is removed. That failure never
//! reaches the user.

use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::token::{Claims, TokenStore, decode_claims};

/// Identity derived from the token claims, available while authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// User role.
    pub role: String,
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl From<Claims> for UserIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            role: claims.role,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No valid token held.
    Unauthenticated,
    /// A login or register call is in flight.
    Authenticating,
    /// A valid token is held; the derived identity is available.
    Authenticated(UserIdentity),
}

/// Process-wide authentication state over the token store.
pub struct AuthSession {
    gateway: ApiGateway,
    store: TokenStore,
    state: AuthState,
    token: Option<String>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The bearer token never appears in Debug output.
        f.debug_struct("AuthSession")
            .field("store", &self.store)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Build the session from whatever token the store holds.
    ///
    /// A missing, undecodable, or expired stored token yields an
    /// `Unauthenticated` session; invalid tokens are deleted so the next
    /// start does not re-examine them.
    #[must_use]
    pub fn initialize(gateway: ApiGateway, store: TokenStore) -> Self {
        let mut session = Self {
            gateway,
            store,
            state: AuthState::Unauthenticated,
            token: None,
        };

        let Some(token) = session.store.load() else {
            debug!("No stored token; starting unauthenticated");
            return session;
        };

        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired() => {
                debug!(email = %claims.email, "Restored session from stored token");
                session.state = AuthState::Authenticated(claims.into());
                session.token = Some(token);
            }
            Ok(claims) => {
                info!(email = %claims.email, "Stored token expired; signing out");
                session.discard_stored_token();
            }
            Err(_) => {
                // Corrupted persisted value; treat as no token at all.
                warn!("Stored token failed to decode; discarding");
                session.discard_stored_token();
            }
        }

        session
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// Whether a valid token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// The authenticated identity, when there is one.
    #[must_use]
    pub const fn identity(&self) -> Option<&UserIdentity> {
        match &self.state {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// The bearer token for authenticated requests, when there is one.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the session remains `Unauthenticated` and the
    /// server-provided message propagates verbatim. No retry.
    ///
    /// # Errors
    ///
    /// Returns the gateway error on rejection or transport failure.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ClientError> {
        self.state = AuthState::Authenticating;
        let result = self.gateway.login(email, password).await;
        self.adopt_token(result)
    }

    /// Create an account and open a session.
    ///
    /// # Errors
    ///
    /// Returns the gateway error on rejection or transport failure.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role_type: &str,
    ) -> Result<UserIdentity, ClientError> {
        self.state = AuthState::Authenticating;
        let result = self.gateway.register(name, email, password, role_type).await;
        self.adopt_token(result)
    }

    /// Sign out. Synchronous and idempotent.
    pub fn logout(&mut self) {
        self.discard_stored_token();
        self.token = None;
        self.state = AuthState::Unauthenticated;
        info!("Signed out");
    }

    /// Take an auth-endpoint outcome and move the machine accordingly.
    fn adopt_token(
        &mut self,
        result: Result<String, ClientError>,
    ) -> Result<UserIdentity, ClientError> {
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                self.state = AuthState::Unauthenticated;
                return Err(e);
            }
        };

        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired() => {
                if let Err(e) = self.store.save(&token) {
                    // A session that cannot persist still works for this run.
                    warn!(error = %e, "Failed to persist token");
                }
                info!(email = %claims.email, "Signed in");
                let identity = UserIdentity::from(claims);
                self.state = AuthState::Authenticated(identity.clone());
                self.token = Some(token);
                Ok(identity)
            }
            _ => {
                // The server handed back a token the client cannot use.
                // Absorb the decode failure; the user only sees a sign-in
                // prompt, never a decoder error.
                warn!("Server-issued token failed to decode or is already expired");
                self.state = AuthState::Unauthenticated;
                Err(ClientError::NotAuthenticated)
            }
        }
    }

    fn discard_stored_token(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove stored token");
        }
    }
}
