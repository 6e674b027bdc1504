use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::inventory_actor::{InventoryError, ItemAction, ItemFilter};
use crate::model::{InventoryItem, ItemPayload};

/// Client for interacting with the inventory item actor.
///
/// Every method returns the item state after the operation was committed.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryItem>,
}

impl InventoryClient {
    pub fn new(inner: ResourceClient<InventoryItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, payload))]
    pub async fn create_item(&self, payload: ItemPayload) -> Result<InventoryItem, InventoryError> {
        debug!(?payload, "create_item called");
        let item = self.inner.create(payload).await.map_err(Self::map_error)?;
        info!(id = ?item.id, "Item saved");
        Ok(item)
    }

    /// Like [`ActorClient::get`], with absence turned into [`InventoryError::NotFound`].
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i64) -> Result<InventoryItem, InventoryError> {
        self.get(id).await?.ok_or(InventoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: Option<ItemFilter>) -> Result<Vec<InventoryItem>, InventoryError> {
        let items = self.list(filter).await?;
        info!(count = items.len(), "Items returned");
        Ok(items)
    }

    #[instrument(skip(self, payload))]
    pub async fn update_item(&self, id: i64, payload: ItemPayload) -> Result<InventoryItem, InventoryError> {
        debug!(?payload, "update_item called");
        self.inner.update(id, payload).await.map_err(Self::map_error)
    }

    /// Removes the item. Deleting an unknown id succeeds.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<(), InventoryError> {
        match self.inner.delete(id).await {
            Ok(()) => {
                info!("Delete complete");
                Ok(())
            }
            Err(FrameworkError::NotFound(_)) => {
                debug!("Nothing to delete");
                Ok(())
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn archive_item(&self, id: i64) -> Result<InventoryItem, InventoryError> {
        let result = self
            .inner
            .perform_action(id, ItemAction::Archive)
            .await
            .map_err(Self::map_error)?;
        info!("Item archived");
        Ok(result.into_item())
    }

    /// Takes one unit out of stock. Low-stock notification happens inside the actor.
    #[instrument(skip(self))]
    pub async fn decrement_item(&self, id: i64) -> Result<InventoryItem, InventoryError> {
        let result = self
            .inner
            .perform_action(id, ItemAction::Decrement)
            .await
            .map_err(Self::map_error)?;
        info!("Item quantity decremented");
        Ok(result.into_item())
    }
}

#[async_trait]
impl ActorClient<InventoryItem> for InventoryClient {
    type Error = InventoryError;

    fn inner(&self) -> &ResourceClient<InventoryItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError<i64>) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => InventoryError::NotFound(id),
            FrameworkError::Rejected(message) => InventoryError::Rejected(message),
            FrameworkError::Storage(e) => InventoryError::Storage(e.to_string()),
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                InventoryError::ActorCommunicationError(e.to_string())
            }
        }
    }
}
