//! Latest-fetched store list with a stale-response guard.
//!
//! Two rapid successive fetches can resolve out of order, and without a
//! guard the slower response clobbers the faster one's result. The catalog
//! closes that race with a monotonic request generation: every fetch begins
//! by taking a ticket, and a completion commits only while its ticket is
//! still the newest one issued. Stale completions are discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use tilbud_core::types::Store;

use crate::error::ClientError;
use crate::gateway::ApiGateway;

/// Monotonic generation counter for supersede-able fetches.
#[derive(Debug, Default)]
pub struct FetchSequence(AtomicU64);

/// Ticket identifying one fetch generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchSequence {
    /// Start a new fetch, superseding every ticket issued before.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest one issued.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}

/// Owns the most recently committed store list.
#[derive(Debug)]
pub struct StoreCatalog {
    gateway: ApiGateway,
    sequence: FetchSequence,
    stores: Vec<Store>,
}

impl StoreCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            sequence: FetchSequence::default(),
            stores: Vec::new(),
        }
    }

    /// The last committed store list.
    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Take a ticket for a fetch about to start.
    pub fn begin(&self) -> FetchTicket {
        self.sequence.begin()
    }

    /// Commit a completed fetch.
    ///
    /// Returns `false` and discards the result when a newer fetch has begun
    /// since `ticket` was issued.
    pub fn commit(&mut self, ticket: FetchTicket, stores: Vec<Store>) -> bool {
        if self.sequence.is_current(ticket) {
            self.stores = stores;
            true
        } else {
            debug!(?ticket, "Discarding stale fetch result");
            false
        }
    }

    /// Fetch all stores and commit the result unless superseded.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; the catalog keeps its previous list.
    pub async fn refresh(&mut self) -> Result<&[Store], ClientError> {
        let ticket = self.begin();
        let stores = self.gateway.stores().await?;
        self.commit(ticket, stores);
        Ok(&self.stores)
    }

    /// Fetch stores for a postal code and commit unless superseded.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; the catalog keeps its previous list.
    pub async fn refresh_postal_code(&mut self, code: &str) -> Result<&[Store], ClientError> {
        let ticket = self.begin();
        let stores = self.gateway.stores_by_postal_code(code).await?;
        self.commit(ticket, stores);
        Ok(&self.stores)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::time::Duration;

    fn catalog() -> StoreCatalog {
        let config = ClientConfig {
            api_url: "http://127.0.0.1:1".parse().unwrap(),
            token_file: std::env::temp_dir().join("unused"),
            request_timeout: Duration::from_secs(1),
        };
        StoreCatalog::new(ApiGateway::new(&config).unwrap())
    }

    fn store(id: &str) -> Store {
        serde_json::from_str(&format!(r#"{{"id": "{id}"}}"#)).unwrap()
    }

    #[test]
    fn test_commit_in_order() {
        let mut catalog = catalog();
        let ticket = catalog.begin();
        assert!(catalog.commit(ticket, vec![store("a")]));
        assert_eq!(catalog.stores().len(), 1);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut catalog = catalog();

        // Fetch 1 starts, then fetch 2 starts before fetch 1 lands.
        let slow = catalog.begin();
        let fast = catalog.begin();

        // Fetch 2 completes first and commits.
        assert!(catalog.commit(fast, vec![store("new")]));

        // Fetch 1 limps in afterwards; its result must not clobber.
        assert!(!catalog.commit(slow, vec![store("old")]));

        assert_eq!(catalog.stores().len(), 1);
        assert_eq!(catalog.stores()[0].id.as_str(), "new");
    }

    #[test]
    fn test_sequence_monotonicity() {
        let sequence = FetchSequence::default();
        let first = sequence.begin();
        assert!(sequence.is_current(first));

        let second = sequence.begin();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let mut catalog = catalog();
        let ticket = catalog.begin();
        catalog.commit(ticket, vec![store("kept")]);

        // Dead backend: refresh fails, existing list survives.
        assert!(catalog.refresh().await.is_err());
        assert_eq!(catalog.stores().len(), 1);
        assert_eq!(catalog.stores()[0].id.as_str(), "kept");
    }
}
