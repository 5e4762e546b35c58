//! Tilbud Client - HTTP gateway and client-side state for the Tilbud backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - Every response is normalized into the backend's `{success, data, error}`
//!   envelope before a consumer sees it
//! - Unauthenticated store listings are cached in memory via `moka`
//!   (5 minute TTL); authenticated and mutating calls never are
//! - The only persisted client state is the bearer token, held by
//!   [`token::TokenStore`]
//!
//! # Components
//!
//! - [`gateway::ApiGateway`] - REST calls, envelope normalization, caching
//! - [`token::TokenStore`] - bearer token persistence and claim decoding
//! - [`session::AuthSession`] - login/register/logout state machine
//! - [`favorites::FavoritesRegistry`] - server-confirmed favorite stores
//! - [`catalog::StoreCatalog`] - latest store list with stale-fetch guard
//!
//! # Example
//!
//! ```rust,ignore
//! use tilbud_client::{ApiGateway, AuthSession, ClientConfig, TokenStore};
//!
//! let config = ClientConfig::from_env()?;
//! let gateway = ApiGateway::new(&config)?;
//! let mut session = AuthSession::initialize(gateway.clone(), TokenStore::new(&config.token_file));
//!
//! session.login("user@example.com", "hunter2").await?;
//! let stores = gateway.stores().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod envelope;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod session;
pub mod token;

pub use catalog::StoreCatalog;
pub use config::{ClientConfig, ConfigError};
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use favorites::FavoritesRegistry;
pub use gateway::ApiGateway;
pub use session::{AuthSession, AuthState, UserIdentity};
pub use token::TokenStore;
