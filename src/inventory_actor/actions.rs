//! Custom actions for the inventory item actor.
//!
//! This module defines the domain-specific operations (Actions) that can be performed
//! on an [`InventoryItem`] beyond plain CRUD: archiving it and taking one unit out of stock.
//! These actions are handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action).

use crate::model::InventoryItem;

/// Custom actions for inventory items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Moves the item to the `archived` condition.
    ///
    /// # Errors
    /// Refused when the item is already archived.
    Archive,
    /// Takes one unit out of stock, flooring the quantity at zero.
    Decrement,
}

/// Results from ItemActions - variants match 1:1 with ItemAction
#[derive(Debug, Clone, PartialEq)]
pub enum ItemActionResult {
    /// The archived item.
    Archived(InventoryItem),
    /// The decremented item and whether it is now below its restock level.
    Decremented {
        item: InventoryItem,
        below_restock: bool,
    },
}

impl ItemActionResult {
    /// The item state the action left behind.
    pub fn into_item(self) -> InventoryItem {
        match self {
            ItemActionResult::Archived(item) => item,
            ItemActionResult::Decremented { item, .. } => item,
        }
    }
}
