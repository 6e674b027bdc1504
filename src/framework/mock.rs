//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`MockClient`] to queue canned replies, or [`create_mock_client`] to get a
//! client and the raw receiver and answer requests by hand with helpers like
//! [`expect_create`] or [`expect_action`].

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
///
/// Requests carrying an id are checked against the expected id before the canned
/// response is sent.
enum Expectation<T: ActorEntity> {
    Create(Result<T, FrameworkError<T::Id>>),
    Get(T::Id, Result<Option<T>, FrameworkError<T::Id>>),
    List(Result<Vec<T>, FrameworkError<T::Id>>),
    Update(T::Id, Result<T, FrameworkError<T::Id>>),
    Delete(T::Id, Result<(), FrameworkError<T::Id>>),
    Action(T::Id, Result<T::ActionResult, FrameworkError<T::Id>>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<InventoryItem>::new();
/// mock.expect_get(1).return_ok(Some(item));
///
/// let client = InventoryClient::new(mock.client());
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

fn reply<R, Id>(respond_to: Response<R, Id>, response: Result<R, FrameworkError<Id>>) {
    let _ = respond_to.send(response);
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
                        reply(respond_to, response);
                    }
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(expected, response))) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        reply(respond_to, response);
                    }
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List(response))) => {
                        reply(respond_to, response);
                    }
                    (ResourceRequest::Update { id, respond_to, .. }, Some(Expectation::Update(expected, response))) => {
                        assert_eq!(id, expected, "update called with unexpected id");
                        reply(respond_to, response);
                    }
                    (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete(expected, response))) => {
                        assert_eq!(id, expected, "delete called with unexpected id");
                        reply(respond_to, response);
                    }
                    (ResourceRequest::Action { id, respond_to, .. }, Some(Expectation::Action(expected, response))) => {
                        assert_eq!(id, expected, "action called with unexpected id");
                        reply(respond_to, response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(&mut self, wrap: impl FnOnce(Result<R, FrameworkError<T::Id>>) -> Expectation<T> + 'static) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap: Box::new(wrap),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Create)
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.expect(move |response| Expectation::Get(id, response))
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(Expectation::List)
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |response| Expectation::Update(id, response))
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.expect(move |response| Expectation::Delete(id, response))
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.expect(move |response| Expectation::Action(id, response))
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues the canned reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: Box<dyn FnOnce(Result<R, FrameworkError<T::Id>>) -> Expectation<T>>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.expectations.lock().unwrap().push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError<T::Id>) {
        self.expectations.lock().unwrap().push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// LOW-LEVEL HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// In unit/integration tests, we don't want to spin up a full `ResourceActor` if we are just
/// testing the *Client* logic (e.g., `InventoryClient`).
///
/// Instead, we create a "Mock Client". This client sends messages to a channel we control (`receiver`).
/// We can then inspect the messages arriving on that channel and assert they are correct.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<T: ActorEntity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::CreateParams, Response<T, T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_actor::{ItemAction, ItemActionResult};
    use crate::model::{Condition, InventoryItem, ItemPayload};
    use rust_decimal::Decimal;

    fn payload() -> ItemPayload {
        ItemPayload {
            name: "Widget".into(),
            description: None,
            quantity: 2,
            price: Decimal::new(1099, 2),
            product_id: 1,
            restock_level: None,
            condition: Some(Condition::New),
        }
    }

    fn stored(id: i64) -> InventoryItem {
        InventoryItem { id: Some(id), ..InventoryItem::from_payload(payload()) }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<InventoryItem>(10);

        let create_task = tokio::spawn(async move { client.create(payload()).await });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Widget");
        responder.send(Ok(stored(1))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(stored(1)));
    }

    #[tokio::test]
    async fn test_mock_client_action_helper() {
        let (client, mut receiver) = create_mock_client::<InventoryItem>(10);

        let task = tokio::spawn(async move { client.perform_action(4, ItemAction::Archive).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, 4);
        assert!(matches!(action, ItemAction::Archive));
        responder.send(Err(FrameworkError::NotFound(4))).unwrap();

        assert!(matches!(task.await.unwrap(), Err(FrameworkError::NotFound(4))));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<InventoryItem>::new();

        mock.expect_create().return_ok(stored(1));
        mock.expect_get(1).return_ok(Some(stored(1)));
        mock.expect_list().return_ok(vec![stored(1)]);
        mock.expect_action(1).return_ok(ItemActionResult::Archived(stored(1)));
        mock.expect_delete(1).return_err(FrameworkError::ActorClosed);

        let client = mock.client();

        let created = client.create(payload()).await.unwrap();
        assert_eq!(created.id, Some(1));
        let fetched = client.get(1).await.unwrap();
        assert_eq!(fetched, Some(stored(1)));
        assert_eq!(client.list(None).await.unwrap().len(), 1);
        assert!(client.perform_action(1, ItemAction::Archive).await.is_ok());
        assert_eq!(client.delete(1).await, Err(FrameworkError::ActorClosed));

        mock.verify();
    }
}
