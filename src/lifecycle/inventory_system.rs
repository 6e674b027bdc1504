use tracing::{error, info};

use crate::clients::InventoryClient;
use crate::framework::Repository;
use crate::inventory_actor::SharedNotifier;
use crate::model::InventoryItem;

/// Owns the running item actor.
///
/// # Example
///
/// ```ignore
/// let store = SqliteRepository::open("inventory.db")?;
/// let system = InventorySystem::start(32, store, Arc::new(LogNotifier));
///
/// let item = system.client.create_item(payload).await?;
///
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    /// Client for the item actor. Clone it freely; the actor stops once every clone is gone.
    pub client: InventoryClient,

    handle: tokio::task::JoinHandle<()>,
}

impl InventorySystem {
    /// Spawns the item actor over `store`.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn start(
        buffer_size: usize,
        store: impl Repository<InventoryItem>,
        notifier: SharedNotifier,
    ) -> Self {
        let (actor, client) = crate::inventory_actor::new(buffer_size, store);
        let handle = tokio::spawn(actor.run(notifier));
        info!(buffer_size, "Inventory system started");

        Self { client, handle }
    }

    /// Drops the system's client and waits for the actor to finish.
    ///
    /// Clones handed out earlier (e.g. to the HTTP router) must be dropped first,
    /// otherwise this waits until they are.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down inventory system...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Actor task failed");
            return Err(format!("Actor task failed: {e:?}"));
        }

        info!("Inventory system shutdown complete.");
        Ok(())
    }
}
