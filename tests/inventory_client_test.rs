use inventory_service::clients::InventoryClient;
use inventory_service::framework::mock::MockClient;
use inventory_service::framework::{FrameworkError, StorageError};
use inventory_service::inventory_actor::{InventoryError, ItemActionResult, ItemFilter};
use inventory_service::model::{Condition, InventoryItem, ItemPayload};
use rust_decimal::Decimal;

fn payload() -> ItemPayload {
    ItemPayload {
        name: "Widget".to_string(),
        description: None,
        quantity: 3,
        price: Decimal::new(999, 2),
        product_id: 1,
        restock_level: Some(2),
        condition: Some(Condition::New),
    }
}

fn stored(id: i64) -> InventoryItem {
    InventoryItem {
        id: Some(id),
        ..InventoryItem::from_payload(payload())
    }
}

/// Client-level test: the InventoryClient against a mocked actor.
/// Checks request routing and error mapping without a store.
#[tokio::test]
async fn test_client_maps_replies() {
    let mut mock = MockClient::<InventoryItem>::new();

    mock.expect_create().return_ok(stored(1));
    mock.expect_get(1).return_ok(Some(stored(1)));
    mock.expect_get(2).return_ok(None);
    mock.expect_list().return_ok(vec![stored(1)]);
    mock.expect_update(1).return_ok(stored(1));
    let archived = InventoryItem {
        condition: Some(Condition::Archived),
        ..stored(1)
    };
    mock.expect_action(1).return_ok(ItemActionResult::Archived(archived.clone()));
    let decremented = InventoryItem { quantity: 2, ..stored(1) };
    mock.expect_action(1).return_ok(ItemActionResult::Decremented {
        item: decremented.clone(),
        below_restock: false,
    });

    let client = InventoryClient::new(mock.client());

    assert_eq!(client.create_item(payload()).await, Ok(stored(1)));
    assert_eq!(client.get_item(1).await, Ok(stored(1)));
    assert_eq!(client.get_item(2).await, Err(InventoryError::NotFound(2)));
    assert_eq!(
        client.list_items(Some(ItemFilter::Condition(Condition::New))).await,
        Ok(vec![stored(1)])
    );
    assert_eq!(client.update_item(1, payload()).await, Ok(stored(1)));
    assert_eq!(client.archive_item(1).await, Ok(archived));
    assert_eq!(client.decrement_item(1).await, Ok(decremented));

    mock.verify();
}

#[tokio::test]
async fn test_client_maps_framework_errors() {
    let mut mock = MockClient::<InventoryItem>::new();

    mock.expect_update(5).return_err(FrameworkError::NotFound(5));
    mock.expect_action(5)
        .return_err(FrameworkError::Rejected("Item is already archived.".into()));
    mock.expect_create()
        .return_err(FrameworkError::Storage(StorageError::Backend("CHECK constraint failed".into())));
    mock.expect_get(5).return_err(FrameworkError::ActorDropped);
    mock.expect_action(i64::MAX).return_err(FrameworkError::NotFound(i64::MAX));

    let client = InventoryClient::new(mock.client());

    assert_eq!(client.update_item(5, payload()).await, Err(InventoryError::NotFound(5)));
    assert_eq!(
        client.archive_item(5).await,
        Err(InventoryError::Rejected("Item is already archived.".into()))
    );
    assert_eq!(
        client.create_item(payload()).await,
        Err(InventoryError::Storage("storage failure: CHECK constraint failed".into()))
    );
    assert!(matches!(
        client.get_item(5).await,
        Err(InventoryError::ActorCommunicationError(_))
    ));
    assert_eq!(client.decrement_item(i64::MAX).await, Err(InventoryError::NotFound(i64::MAX)));

    mock.verify();
}

/// Deleting an id the actor does not know is still a success.
#[tokio::test]
async fn test_delete_is_idempotent() {
    let mut mock = MockClient::<InventoryItem>::new();

    mock.expect_delete(1).return_ok(());
    mock.expect_delete(1).return_err(FrameworkError::NotFound(1));
    mock.expect_delete(1).return_err(FrameworkError::ActorClosed);

    let client = InventoryClient::new(mock.client());

    assert_eq!(client.delete_item(1).await, Ok(()));
    assert_eq!(client.delete_item(1).await, Ok(()));
    assert_eq!(
        client.delete_item(1).await,
        Err(InventoryError::ActorCommunicationError("Actor closed".into()))
    );

    mock.verify();
}
