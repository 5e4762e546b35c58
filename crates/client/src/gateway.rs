//! REST client for the Tilbud backend.
//!
//! One shared `reqwest::Client` behind a cheaply-cloneable handle. Every
//! response is folded into the `{success, data, error}` envelope; ordinary
//! HTTP error statuses become typed [`ClientError`] variants, and only
//! transport failures and JSON parse failures are distinct classes.
//!
//! Authenticated calls take the bearer token as an argument - the gateway
//! itself holds no auth state. Unauthenticated store listings are cached
//! for 5 minutes; everything else goes to the network every time.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use tilbud_core::normalize::{repair_store, repair_stores};
use tilbud_core::types::{Store, StoreId};

use crate::config::ClientConfig;
use crate::envelope::{ApiEnvelope, error_for_status};
use crate::error::ClientError;

const CACHE_CAPACITY: u64 = 100;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cache key for unauthenticated store listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Stores,
    PostalCode(String),
}

/// Token payload returned by the auth endpoints.
#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: String,
}

/// Client for the Tilbud REST backend.
///
/// Cheap to clone; all clones share one HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<ApiGatewayInner>,
}

struct ApiGatewayInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, Vec<Store>>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    /// Create a new gateway from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiGatewayInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path)
    }

    /// Perform a request and fold the response into the envelope shape.
    ///
    /// Non-2xx statuses never become a transport error: the server message
    /// is extracted from the body (when it is an envelope) and mapped onto
    /// the taxonomy by status code.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let url = self.endpoint(path);
        debug!(%method, %url, "Backend request");

        let mut request = self.inner.client.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Pull the server message out of the envelope when there is one;
            // fall back to the status line.
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            warn!(%status, %url, message, "Backend returned error status");
            return Err(error_for_status(status, message));
        }

        Ok(serde_json::from_str(&text)?)
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Fetch all stores with their discounted product listings. Cached.
    pub async fn stores(&self) -> Result<Vec<Store>, ClientError> {
        self.cached_store_list(CacheKey::Stores, "stores").await
    }

    /// Fetch one store by id.
    pub async fn store(&self, id: &StoreId) -> Result<Store, ClientError> {
        let envelope: ApiEnvelope<Store> = self
            .request(Method::GET, &format!("stores/{id}"), None, None)
            .await?;
        let mut store = envelope.into_result()?;
        repair_store(&mut store);
        Ok(store)
    }

    /// Fetch stores narrowed server-side by postal code. Cached.
    pub async fn stores_by_postal_code(&self, code: &str) -> Result<Vec<Store>, ClientError> {
        self.cached_store_list(
            CacheKey::PostalCode(code.to_owned()),
            &format!("stores/postal_code/{code}"),
        )
        .await
    }

    async fn cached_store_list(
        &self,
        key: CacheKey,
        path: &str,
    ) -> Result<Vec<Store>, ClientError> {
        if let Some(stores) = self.inner.cache.get(&key).await {
            debug!(?key, "Store listing served from cache");
            return Ok(stores);
        }

        let envelope: ApiEnvelope<Vec<Store>> =
            self.request(Method::GET, path, None, None).await?;
        let mut stores = envelope.into_result()?;
        repair_stores(&mut stores);

        // Only successful fetches are cached.
        self.inner.cache.insert(key, stores.clone()).await;
        Ok(stores)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Fetch the current user's favorite stores.
    pub async fn favorite_stores(&self, token: &str) -> Result<Vec<Store>, ClientError> {
        let envelope: ApiEnvelope<Vec<Store>> = self
            .request(Method::GET, "stores/favorites", Some(token), None)
            .await?;
        let mut stores = envelope.into_result()?;
        repair_stores(&mut stores);
        Ok(stores)
    }

    /// Mark a store favorite.
    pub async fn add_favorite(&self, token: &str, id: &StoreId) -> Result<(), ClientError> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .request(Method::POST, &format!("stores/{id}/favorite"), Some(token), None)
            .await?;
        envelope.into_empty_result()
    }

    /// Unmark a store favorite.
    ///
    /// The "favorite no longer exists" case is NOT normalized here - the
    /// favorites registry decides that an absent favorite equals a
    /// successful removal.
    pub async fn remove_favorite(&self, token: &str, id: &StoreId) -> Result<(), ClientError> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .request(
                Method::DELETE,
                &format!("stores/{id}/favorite"),
                Some(token),
                None,
            )
            .await?;
        envelope.into_empty_result()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body = json!({ "email": email, "password": password });
        let envelope: ApiEnvelope<AuthPayload> = self
            .request(Method::POST, "auth/login", None, Some(body))
            .await?;
        Ok(envelope.into_result()?.token)
    }

    /// Create an account and receive a bearer token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role_type: &str,
    ) -> Result<String, ClientError> {
        let body = json!({
            "name": name,
            "email": email,
            "password": password,
            "roleType": role_type,
        });
        let envelope: ApiEnvelope<AuthPayload> = self
            .request(Method::POST, "auth/register", None, Some(body))
            .await?;
        Ok(envelope.into_result()?.token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> ApiGateway {
        let config = ClientConfig {
            api_url: base.parse().unwrap(),
            token_file: std::env::temp_dir().join("tilbud-test-token"),
            request_timeout: Duration::from_secs(5),
        };
        ApiGateway::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joining_handles_trailing_slash() {
        let g = gateway("https://api.example.dk/");
        assert_eq!(g.endpoint("stores"), "https://api.example.dk/stores");

        let g = gateway("https://api.example.dk/v1/");
        assert_eq!(
            g.endpoint("stores/postal_code/2100"),
            "https://api.example.dk/v1/stores/postal_code/2100"
        );
    }

    #[test]
    fn test_gateway_clones_share_inner() {
        let g = gateway("https://api.example.dk");
        let clone = g.clone();
        assert!(Arc::ptr_eq(&g.inner, &clone.inner));
    }
}
