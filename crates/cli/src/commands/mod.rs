//! Command implementations and shared wiring.

pub mod auth;
pub mod favorites;
pub mod stores;

use thiserror::Error;

use tilbud_client::{ApiGateway, AuthSession, ClientConfig, ClientError, ConfigError, TokenStore};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A backend or session operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl CliError {
    /// Short user-facing message; configuration problems are precise, the
    /// rest follows the client taxonomy.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Client(e) => e.user_message(),
        }
    }

    /// Whether the full error chain should also be logged.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Client(e) => e.is_fatal(),
        }
    }
}

/// Everything a command needs: the gateway plus the restored session.
pub struct Context {
    pub gateway: ApiGateway,
    pub session: AuthSession,
}

impl Context {
    /// Build the context from environment configuration, restoring any
    /// persisted session.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let gateway = ApiGateway::new(&config)?;
        let session = AuthSession::initialize(gateway.clone(), TokenStore::new(&config.token_file));
        Ok(Self { gateway, session })
    }
}
