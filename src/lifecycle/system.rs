use std::time::Duration;
use tracing::{error, info};

use crate::clients::StoreClient;
use crate::daemon::{StatusRefreshDaemon, DEFAULT_REFRESH_INTERVAL};
use crate::store::{self, Database, StoreError};

/// The runtime orchestrator for the ordering engine.
///
/// `RestaurantSystem` is responsible for:
/// - **Lifecycle**: spawning the store task and the status refresh daemon,
///   and tearing both down cleanly.
/// - **Session demarcation**: running the archival sweep exactly once at
///   start, so `paid`/`cancelled` leftovers from a previous session become
///   their `-completed` variants before any new request is served.
/// - **Handle distribution**: exposing the cloneable [`StoreClient`] that
///   the dispatch layer, the daemon, and any embedding UI all share.
///
/// # Example
///
/// ```ignore
/// let system = RestaurantSystem::start(store::seed::demo_database()?).await?;
/// let reply = dispatch::execute_tool(system.client(), "get_categories", json!({})).await;
/// system.shutdown().await;
/// ```
pub struct RestaurantSystem {
    client: StoreClient,
    daemon: StatusRefreshDaemon,
    store_handle: tokio::task::JoinHandle<()>,
}

impl RestaurantSystem {
    /// Start the system over `db` with the default refresh cadence.
    pub async fn start(db: Database) -> Result<Self, StoreError> {
        Self::start_with_refresh_interval(db, DEFAULT_REFRESH_INTERVAL).await
    }

    /// Start with an explicit refresh cadence (tests shorten it).
    pub async fn start_with_refresh_interval(
        db: Database,
        refresh_interval: Duration,
    ) -> Result<Self, StoreError> {
        let (actor, client) = store::new(db);
        let store_handle = tokio::spawn(actor.run());

        // Demarcate the previous session before anything else touches the
        // ledger.
        let archived = client.finalize_session().await?;
        info!(archived, "Session started");

        let daemon = StatusRefreshDaemon::spawn(client.clone(), refresh_interval);

        Ok(Self { client, daemon, store_handle })
    }

    /// The shared store handle.
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Stop the daemon, then release the store task and wait for it.
    ///
    /// Dropping the last client closes the store's channel; the store task
    /// drains whatever is queued and exits.
    pub async fn shutdown(self) {
        info!("Shutting down system...");
        self.daemon.shutdown().await;
        drop(self.client);
        if let Err(join_error) = self.store_handle.await {
            error!(%join_error, "Store task failed");
        }
        info!("System shutdown complete.");
    }
}
