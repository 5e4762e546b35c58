//! Favorite-store registry, synchronized with backend state.
//!
//! The registry owns the membership set and is the only code allowed to
//! mutate it. Mutations are strictly server-confirmed: the local set changes
//! only after the backend call succeeds, so a failed toggle leaves both
//! sides where they were and the caller can revert any optimistic UI state.
//!
//! Lifecycle: `load` rebuilds the set from the backend whenever
//! authentication becomes true (full replacement, no incremental merge, so
//! drift from updates made elsewhere cannot accumulate); `clear` empties it
//! when authentication becomes false.

use std::collections::HashSet;

use tracing::{debug, info};

use tilbud_core::types::{Store, StoreId};

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::session::AuthSession;

/// Whether a removal failure means the favorite was already gone.
///
/// Matches one fragment of the server's error wording. Brittle coupling,
/// kept to mirror the backend's current contract; replace with a structured
/// error code if the backend ever grows one.
fn is_missing_favorite(message: &str) -> bool {
    message.contains("No result found")
}

/// Tracks which stores the current user has marked favorite.
#[derive(Debug)]
pub struct FavoritesRegistry {
    gateway: ApiGateway,
    set: HashSet<StoreId>,
}

impl FavoritesRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            set: HashSet::new(),
        }
    }

    /// Rebuild the set from the backend's authoritative favorite list.
    ///
    /// The local set is replaced entirely, never merged.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a network call when the
    /// session holds no token; otherwise the gateway error.
    pub async fn load(&mut self, session: &AuthSession) -> Result<(), ClientError> {
        let token = session.bearer().ok_or(ClientError::NotAuthenticated)?;
        let stores = self.gateway.favorite_stores(token).await?;
        self.set = stores.into_iter().map(|store| store.id).collect();
        debug!(count = self.set.len(), "Favorites loaded");
        Ok(())
    }

    /// Empty the set. Called when authentication transitions to false.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Flip a store's favorite status, server-confirmed.
    ///
    /// Returns the new status. The local set mutates only after the backend
    /// accepts the change, with one exception: a removal the backend rejects
    /// because the favorite no longer exists is already the desired end
    /// state and counts as a successful removal.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a network call when the
    /// session holds no token; otherwise the gateway error, with the local
    /// set untouched.
    pub async fn toggle(
        &mut self,
        session: &AuthSession,
        id: &StoreId,
    ) -> Result<bool, ClientError> {
        let token = session.bearer().ok_or(ClientError::NotAuthenticated)?;

        if self.set.contains(id) {
            match self.gateway.remove_favorite(token, id).await {
                Ok(()) => {}
                Err(ClientError::Api(message)) if is_missing_favorite(&message) => {
                    // Absence is what removal was after; normalize to success.
                    info!(store = %id, "Favorite already absent on backend");
                }
                Err(e) => return Err(e),
            }
            self.set.remove(id);
            Ok(false)
        } else {
            self.gateway.add_favorite(token, id).await?;
            self.set.insert(id.clone());
            Ok(true)
        }
    }

    /// O(1) membership query.
    #[must_use]
    pub fn is_favorite(&self, id: &StoreId) -> bool {
        self.set.contains(id)
    }

    /// Number of favorite stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether no stores are marked favorite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Overwrite the `is_favorite` decoration on fetched stores.
    ///
    /// The flag on a `Store` is never authoritative; this stamps the
    /// registry's membership set onto every record after a fetch.
    pub fn decorate(&self, stores: &mut [Store]) {
        for store in stores {
            store.is_favorite = self.set.contains(&store.id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::token::TokenStore;
    use std::time::Duration;

    fn gateway() -> ApiGateway {
        let config = ClientConfig {
            api_url: "http://127.0.0.1:1".parse().unwrap(),
            token_file: std::env::temp_dir().join("unused"),
            request_timeout: Duration::from_secs(1),
        };
        ApiGateway::new(&config).unwrap()
    }

    fn gateway_at(addr: std::net::SocketAddr) -> ApiGateway {
        let config = ClientConfig {
            api_url: format!("http://{addr}").parse().unwrap(),
            token_file: std::env::temp_dir().join("unused"),
            request_timeout: Duration::from_secs(5),
        };
        ApiGateway::new(&config).unwrap()
    }

    /// Session holding a valid unsigned token, persisted under `dir`.
    fn signed_in_session(gateway: ApiGateway, dir: &tempfile::TempDir) -> AuthSession {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let store = TokenStore::new(dir.path().join("token"));
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let claims = format!(
            r#"{{"role":"user","email":"a@b.dk","name":"A","exp":{}}}"#,
            chrono::Utc::now().timestamp() + 3600
        );
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        store.save(&format!("{header}.{payload}.s")).unwrap();
        AuthSession::initialize(gateway, store)
    }

    /// Answer one connection per body with a canned 200 JSON response.
    async fn serve_json(listener: tokio::net::TcpListener, bodies: Vec<&'static str>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        for body in bodies {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0_u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        }
    }

    #[test]
    fn test_missing_favorite_detection() {
        assert!(is_missing_favorite("No result found"));
        assert!(is_missing_favorite("Error: No result found for id abc"));
        assert!(!is_missing_favorite("Internal server error"));
        assert!(!is_missing_favorite(""));
    }

    #[test]
    fn test_membership_and_decoration() {
        let mut registry = FavoritesRegistry::new(gateway());
        registry.set.insert(StoreId::new("a"));

        assert!(registry.is_favorite(&StoreId::new("a")));
        assert!(!registry.is_favorite(&StoreId::new("b")));
        assert_eq!(registry.len(), 1);

        let mut stores: Vec<Store> = serde_json::from_str(
            r#"[
                {"id": "a", "isFavorite": false},
                {"id": "b", "isFavorite": true}
            ]"#,
        )
        .unwrap();
        registry.decorate(&mut stores);
        // Decoration overwrites whatever the fetch carried, both ways.
        assert!(stores[0].is_favorite);
        assert!(!stores[1].is_favorite);
    }

    #[test]
    fn test_clear_empties_the_set() {
        let mut registry = FavoritesRegistry::new(gateway());
        registry.set.insert(StoreId::new("a"));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_session_makes_no_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            AuthSession::initialize(gateway(), TokenStore::new(dir.path().join("token")));
        let mut registry = FavoritesRegistry::new(gateway());

        // The gateway points at a dead address; reaching the network would
        // hang out to the timeout. The precondition check must fail first.
        let result = registry.toggle(&session, &StoreId::new("a")).await;
        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_load_without_session_fails_locally() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            AuthSession::initialize(gateway(), TokenStore::new(dir.path().join("token")));
        let mut registry = FavoritesRegistry::new(gateway());

        let result = registry.load(&session).await;
        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_set_unchanged() {
        // Authenticated session against a dead backend: the add call fails
        // at the transport level and the set must not change.
        let dir = tempfile::tempdir().unwrap();
        let session = signed_in_session(gateway(), &dir);
        assert!(session.is_authenticated());

        let mut registry = FavoritesRegistry::new(gateway());
        let result = registry.toggle(&session, &StoreId::new("a")).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
        assert!(!registry.is_favorite(&StoreId::new("a")));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_status() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // One accepted POST, then one accepted DELETE.
        let server = tokio::spawn(serve_json(
            listener,
            vec![
                r#"{"success":true,"data":null}"#,
                r#"{"success":true,"data":null}"#,
            ],
        ));

        let dir = tempfile::tempdir().unwrap();
        let session = signed_in_session(gateway_at(addr), &dir);
        let mut registry = FavoritesRegistry::new(gateway_at(addr));
        let id = StoreId::new("a");

        assert!(registry.toggle(&session, &id).await.unwrap());
        assert!(registry.is_favorite(&id));
        assert!(!registry.toggle(&session, &id).await.unwrap());
        assert!(!registry.is_favorite(&id));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_treats_absent_removal_as_success() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_json(
            listener,
            vec![r#"{"success":false,"error":"No result found"}"#],
        ));

        let dir = tempfile::tempdir().unwrap();
        let session = signed_in_session(gateway_at(addr), &dir);
        let mut registry = FavoritesRegistry::new(gateway_at(addr));
        let id = StoreId::new("a");
        registry.set.insert(id.clone());

        // The backend no longer knows the favorite; removal still succeeds
        // and the local set drops the id.
        assert!(!registry.toggle(&session, &id).await.unwrap());
        assert!(!registry.is_favorite(&id));
        server.await.unwrap();
    }
}
