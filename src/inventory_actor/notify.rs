//! Below-restock notifications.
//!
//! The notifier is the item actor's [`Context`](crate::framework::ActorEntity::Context):
//! it is handed to the actor at `run()` time and called after a decrement that left
//! an item under its restock level has been committed. Nothing is persisted.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::model::InventoryItem;

/// Receives low-stock signals.
pub trait RestockNotifier: Send + Sync {
    fn below_restock_level(&self, item: &InventoryItem);
}

/// Shared handle injected into the item actor.
pub type SharedNotifier = Arc<dyn RestockNotifier>;

/// Default notifier: a structured `warn!` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl RestockNotifier for LogNotifier {
    fn below_restock_level(&self, item: &InventoryItem) {
        warn!(
            id = ?item.id,
            name = %item.name,
            quantity = item.quantity,
            restock_level = ?item.restock_level,
            "Item is below restock level"
        );
    }
}

/// Keeps every notified item in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<InventoryItem>>>,
}

impl RecordingNotifier {
    /// Items notified so far, oldest first.
    pub fn notified(&self) -> Vec<InventoryItem> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl RestockNotifier for RecordingNotifier {
    fn below_restock_level(&self, item: &InventoryItem) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(item.clone());
        }
    }
}
