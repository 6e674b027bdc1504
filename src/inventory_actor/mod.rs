//! Inventory-specific resource logic: the item entity, its actions and notifications.

mod actions;
pub mod entity;
pub mod error;
pub mod notify;

pub use actions::*;
pub use entity::ItemFilter;
pub use error::*;
pub use notify::*;

use crate::clients::InventoryClient;
use crate::framework::{Repository, ResourceActor};
use crate::model::InventoryItem;

/// Message returned when archiving an item that is already archived.
pub const ALREADY_ARCHIVED: &str = "Item is already archived.";

/// Creates a new inventory item actor over `store` and its client.
pub fn new(buffer_size: usize, store: impl Repository<InventoryItem>) -> (ResourceActor<InventoryItem>, InventoryClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, store);
    let client = InventoryClient::new(generic_client);

    (actor, client)
}
