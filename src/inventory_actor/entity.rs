//! Entity trait implementation for the inventory item.
//!
//! This module contains the [`ActorEntity`] implementation that lets
//! [`InventoryItem`] be served by the generic [`crate::framework::ResourceActor`],
//! including the archive and decrement transitions.

use async_trait::async_trait;

use super::actions::{ItemAction, ItemActionResult};
use super::notify::SharedNotifier;
use super::ALREADY_ARCHIVED;
use crate::framework::ActorEntity;
use crate::model::{Condition, InventoryItem, ItemPayload};

/// Exact-match queries over the item table.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFilter {
    Name(String),
    Condition(Condition),
    Id(i64),
}

#[async_trait]
impl ActorEntity for InventoryItem {
    type Id = i64;
    type CreateParams = ItemPayload;
    type UpdateParams = ItemPayload;
    type Action = ItemAction;
    type ActionResult = ItemActionResult;
    type Filter = ItemFilter;
    type Context = SharedNotifier;

    /// Payloads arrive already validated, so construction cannot fail.
    fn from_create_params(params: ItemPayload) -> Result<Self, String> {
        Ok(Self::from_payload(params))
    }

    /// Full replacement of every field but the id.
    async fn on_update(&mut self, update: ItemPayload, _ctx: &SharedNotifier) -> Result<(), String> {
        self.apply(update);
        Ok(())
    }

    /// # Actions
    /// - `Archive`: any condition except `archived` becomes `archived`
    /// - `Decrement`: quantity drops by one, never below zero
    async fn handle_action(&mut self, action: ItemAction, _ctx: &SharedNotifier) -> Result<ItemActionResult, String> {
        match action {
            ItemAction::Archive => {
                if self.is_archived() {
                    return Err(ALREADY_ARCHIVED.to_string());
                }
                self.condition = Some(Condition::Archived);
                Ok(ItemActionResult::Archived(self.clone()))
            }
            ItemAction::Decrement => {
                let below_restock = self.decrement();
                Ok(ItemActionResult::Decremented {
                    item: self.clone(),
                    below_restock,
                })
            }
        }
    }

    async fn on_action_committed(&self, result: &ItemActionResult, notifier: &SharedNotifier) {
        if let ItemActionResult::Decremented { below_restock: true, .. } = result {
            notifier.below_restock_level(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_actor::RecordingNotifier;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn item(quantity: i32, restock_level: Option<i32>) -> InventoryItem {
        InventoryItem::from_payload(ItemPayload {
            name: "Widget".into(),
            description: None,
            quantity,
            price: Decimal::new(100, 2),
            product_id: 1,
            restock_level,
            condition: Some(Condition::Used),
        })
    }

    #[tokio::test]
    async fn archive_is_refused_once_archived() {
        let ctx: SharedNotifier = Arc::new(RecordingNotifier::default());
        let mut widget = item(1, None);

        let result = widget.handle_action(ItemAction::Archive, &ctx).await.unwrap();
        assert!(widget.is_archived());
        assert_eq!(result, ItemActionResult::Archived(widget.clone()));

        let again = widget.handle_action(ItemAction::Archive, &ctx).await;
        assert_eq!(again, Err(ALREADY_ARCHIVED.to_string()));
    }

    #[tokio::test]
    async fn only_committed_low_stock_decrements_notify() {
        let recorder = RecordingNotifier::default();
        let ctx: SharedNotifier = Arc::new(recorder.clone());
        let mut widget = item(3, Some(3));

        let result = widget.handle_action(ItemAction::Decrement, &ctx).await.unwrap();
        assert_eq!(widget.quantity, 2);
        assert!(matches!(result, ItemActionResult::Decremented { below_restock: true, .. }));
        assert!(recorder.notified().is_empty());

        widget.on_action_committed(&result, &ctx).await;
        assert_eq!(recorder.notified(), vec![widget.clone()]);

        let archived = ItemActionResult::Archived(widget.clone());
        widget.on_action_committed(&archived, &ctx).await;
        assert_eq!(recorder.notified().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_id() {
        let ctx: SharedNotifier = Arc::new(RecordingNotifier::default());
        let mut widget = InventoryItem { id: Some(9), ..item(1, None) };
        let mut replacement = ItemPayload::from_json(&serde_json::json!({
            "name": "Gadget", "quantity": 4, "price": "2.50", "product_id": 2
        }))
        .unwrap();
        replacement.condition = Some(Condition::New);

        widget.on_update(replacement, &ctx).await.unwrap();
        assert_eq!(widget.id, Some(9));
        assert_eq!(widget.name, "Gadget");
        assert_eq!(widget.quantity, 4);
        assert_eq!(widget.condition, Some(Condition::New));
    }
}
