//! # Core Resource Framework
//!
//! This module defines the generic building blocks for the resource runtime.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all resource types must implement.
//! - [`ResourceActor`]: The generic actor that owns a [`Repository`] and serves requests.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound, Storage).

use std::fmt::{Debug, Display};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::repository::{Repository, StorageError};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

use async_trait::async_trait;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Architecture Note
/// By defining a contract (`ActorEntity`) that every resource type must satisfy,
/// the message loop, the transaction boundaries and the error mapping are written
/// *once* in [`ResourceActor`].
///
/// Associated types keep the payloads apart: an item actor only accepts item
/// payloads, item filters and item actions.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks.
/// The `Context` type is injected into every hook at `run()` time ("Late Binding"),
/// which is how side channels such as notifiers reach the entity.
///
/// # Provided Methods (Hooks)
/// [`ActorEntity::on_create`], [`ActorEntity::on_delete`] and
/// [`ActorEntity::on_action_committed`] default to doing nothing.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The identifier assigned by the repository (e.g., i64, Uuid).
    type Id: Eq + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type CreateParams: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type UpdateParams: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `Archive`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Exact-match query understood by the repository.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// Construct an unsaved entity from the payload.
    /// The repository assigns the identity afterwards.
    fn from_create_params(params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the entity is persisted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), String> { Ok(()) }

    /// Applies an update request to the loaded entity. Persisting is the actor's job.
    async fn on_update(&mut self, update: Self::UpdateParams, _ctx: &Self::Context) -> Result<(), String>;

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), String> { Ok(()) }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(&mut self, action: Self::Action, _ctx: &Self::Context) -> Result<Self::ActionResult, String>;

    /// Called once the state changed by an action has been committed.
    async fn on_action_committed(&self, _result: &Self::ActionResult, _ctx: &Self::Context) {}
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the resource framework.
///
/// `Id` is the entity's [`ActorEntity::Id`], so a missing entity is reported with
/// the same typed id the caller asked for.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError<Id> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(Id),
    /// An entity hook refused the request.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T, Id> = oneshot::Sender<Result<T, FrameworkError<Id>>>;

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map directly to **CRUD** operations plus filtered listing and a
/// custom `Action` variant for resource-specific logic that doesn't fit CRUD.
///
/// - **Create**: Uses [`ActorEntity::CreateParams`]; replies with the stored entity.
/// - **Get**: Fetches the current state by ID; absence is `Ok(None)`.
/// - **List**: Every entity, or those matching an [`ActorEntity::Filter`].
/// - **Update**: Uses [`ActorEntity::UpdateParams`] to modify a stored entity.
/// - **Delete**: Removes the entity.
/// - **Action**: Executes a custom [`ActorEntity::Action`] and persists its effect.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Id>,
    },
    List {
        filter: Option<T::Filter>,
        respond_to: Response<Vec<T>, T::Id>,
    },
    Update {
        id: T::Id,
        update: T::UpdateParams,
        respond_to: Response<T, T::Id>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Id>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Id>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that serves one entity type out of a repository.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the storage handle and
/// the receiver end of the channel.
///
/// **Concurrency Model**:
/// Requests are processed *sequentially* in a loop, so the repository needs no
/// locking and two writes to the same row can never interleave.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Box<dyn Repository<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        store: impl Repository<T>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Box::new(store),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    fn lookup(&self, id: &T::Id) -> Result<T, FrameworkError<T::Id>> {
        match self.store.find(id)? {
            Some(item) => Ok(item),
            None => Err(FrameworkError::NotFound(id.clone())),
        }
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "InventoryItem")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let mut item = match T::from_create_params(params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        continue;
                    }
                    let created = self.store.create(&mut item);
                    match created {
                        Ok(id) => {
                            info!(entity_type, %id, "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            error!(entity_type, error = %e, "Create rolled back");
                            let _ = respond_to.send(Err(e.into()));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.find(&id);
                    let found = matches!(item, Ok(Some(_)));
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(item.map_err(FrameworkError::from));
                }
                ResourceRequest::List { filter, respond_to } => {
                    debug!(entity_type, ?filter, "List");
                    let items = match &filter {
                        Some(filter) => self.store.find_by(filter),
                        None => self.store.find_all(),
                    };
                    if let Ok(items) = &items {
                        debug!(entity_type, count = items.len(), "Listed");
                    }
                    let _ = respond_to.send(items.map_err(FrameworkError::from));
                }
                ResourceRequest::Update { id, update, respond_to } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let found = self.lookup(&id);
                    let mut item = match found {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        continue;
                    }
                    let saved = self.store.update(&item);
                    match saved {
                        Ok(()) => {
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            error!(entity_type, %id, error = %e, "Update rolled back");
                            let _ = respond_to.send(Err(e.into()));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let found = self.lookup(&id);
                    let item = match found {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Delete failed");
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                        continue;
                    }
                    let removed = self.store.delete(&item);
                    match removed {
                        Ok(()) => {
                            info!(entity_type, %id, "Deleted");
                            let _ = respond_to.send(Ok(()));
                        }
                        Err(e) => {
                            error!(entity_type, %id, error = %e, "Delete rolled back");
                            let _ = respond_to.send(Err(e.into()));
                        }
                    }
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let found = self.lookup(&id);
                    let mut item = match found {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                    };
                    let result = match item.handle_action(action, &context).await {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::Rejected(e)));
                            continue;
                        }
                    };
                    let saved = self.store.update(&item);
                    if let Err(e) = saved {
                        error!(entity_type, %id, error = %e, "Action rolled back");
                        let _ = respond_to.send(Err(e.into()));
                        continue;
                    }
                    item.on_action_committed(&result, &context).await;
                    info!(entity_type, %id, "Action ok");
                    let _ = respond_to.send(Ok(result));
                }
            }
        }

        info!(entity_type, "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Derived Clone would demand `T: Clone` on every associated type.
impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Id>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Id>> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to))
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, filter: Option<T::Filter>) -> Result<Vec<T>, FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, update: T::UpdateParams) -> Result<T, FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::Update { id, update, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Id>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct SimpleUser {
        id: u64,
        name: String,
        is_admin: bool,
    }

    #[derive(Debug)]
    struct SimpleUserCreate {
        name: String,
    }

    #[derive(Debug)]
    struct SimpleUserUpdate {
        name: Option<String>,
    }

    #[derive(Debug)]
    enum UserAction {
        PromoteToAdmin,
    }

    #[derive(Debug)]
    enum UserFilter {
        Admins,
    }

    /// Records every committed action so tests can see the hook ran.
    type Committed = Arc<Mutex<Vec<u64>>>;

    #[async_trait]
    impl ActorEntity for SimpleUser {
        type Id = u64;
        type CreateParams = SimpleUserCreate;
        type UpdateParams = SimpleUserUpdate;
        type Action = UserAction;
        type ActionResult = bool;
        type Filter = UserFilter;
        type Context = Committed;

        fn from_create_params(params: SimpleUserCreate) -> Result<Self, String> {
            if params.name.is_empty() {
                return Err("name is required".into());
            }
            Ok(Self { id: 0, name: params.name, is_admin: false })
        }

        async fn on_update(&mut self, update: SimpleUserUpdate, _ctx: &Committed) -> Result<(), String> {
            if let Some(name) = update.name {
                self.name = name;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: UserAction, _ctx: &Committed) -> Result<bool, String> {
            match action {
                UserAction::PromoteToAdmin => {
                    if self.is_admin {
                        Err("already an admin".into())
                    } else {
                        self.is_admin = true;
                        Ok(true)
                    }
                }
            }
        }

        async fn on_action_committed(&self, _result: &bool, ctx: &Committed) {
            ctx.lock().unwrap().push(self.id);
        }
    }

    // --- Repositories ---

    #[derive(Default)]
    struct MemoryRepository {
        rows: BTreeMap<u64, SimpleUser>,
        next_id: u64,
    }

    impl Repository<SimpleUser> for MemoryRepository {
        fn create(&mut self, entity: &mut SimpleUser) -> Result<u64, StorageError> {
            self.next_id += 1;
            entity.id = self.next_id;
            self.rows.insert(entity.id, entity.clone());
            Ok(entity.id)
        }

        fn update(&mut self, entity: &SimpleUser) -> Result<(), StorageError> {
            self.rows.insert(entity.id, entity.clone());
            Ok(())
        }

        fn delete(&mut self, entity: &SimpleUser) -> Result<(), StorageError> {
            self.rows.remove(&entity.id);
            Ok(())
        }

        fn find(&self, id: &u64) -> Result<Option<SimpleUser>, StorageError> {
            Ok(self.rows.get(id).cloned())
        }

        fn find_all(&self) -> Result<Vec<SimpleUser>, StorageError> {
            Ok(self.rows.values().cloned().collect())
        }

        fn find_by(&self, filter: &UserFilter) -> Result<Vec<SimpleUser>, StorageError> {
            match filter {
                UserFilter::Admins => Ok(self.rows.values().filter(|u| u.is_admin).cloned().collect()),
            }
        }
    }

    /// Accepts reads but refuses every write.
    struct ReadOnlyRepository(MemoryRepository);

    impl Repository<SimpleUser> for ReadOnlyRepository {
        fn create(&mut self, _entity: &mut SimpleUser) -> Result<u64, StorageError> {
            Err(StorageError::Backend("read-only".into()))
        }
        fn update(&mut self, _entity: &SimpleUser) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only".into()))
        }
        fn delete(&mut self, _entity: &SimpleUser) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only".into()))
        }
        fn find(&self, id: &u64) -> Result<Option<SimpleUser>, StorageError> {
            self.0.find(id)
        }
        fn find_all(&self) -> Result<Vec<SimpleUser>, StorageError> {
            self.0.find_all()
        }
        fn find_by(&self, filter: &UserFilter) -> Result<Vec<SimpleUser>, StorageError> {
            self.0.find_by(filter)
        }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let committed = Committed::default();
        let (actor, client) = ResourceActor::new(10, MemoryRepository::default());
        let handle = tokio::spawn(actor.run(committed.clone()));

        // 1. Create
        let alice = client.create(SimpleUserCreate { name: "Alice".into() }).await.unwrap();
        assert_eq!(alice.id, 1);
        client.create(SimpleUserCreate { name: "Bob".into() }).await.unwrap();

        // 2. Perform Action: Promote
        let changed = client.perform_action(alice.id, UserAction::PromoteToAdmin).await.unwrap();
        assert!(changed);
        assert_eq!(*committed.lock().unwrap(), vec![alice.id]);

        // Verify state
        let user = client.get(alice.id).await.unwrap().unwrap();
        assert!(user.is_admin);

        // 3. Promote again is refused and not committed
        let again = client.perform_action(alice.id, UserAction::PromoteToAdmin).await;
        assert_eq!(again, Err(FrameworkError::Rejected("already an admin".into())));
        assert_eq!(committed.lock().unwrap().len(), 1);

        // 4. List
        assert_eq!(client.list(None).await.unwrap().len(), 2);
        let admins = client.list(Some(UserFilter::Admins)).await.unwrap();
        assert_eq!(admins, vec![user]);

        // 5. Update
        let update = SimpleUserUpdate { name: Some("Alicia".into()) };
        let updated_user = client.update(alice.id, update).await.unwrap();
        assert_eq!(updated_user.name, "Alicia");

        // 6. Delete
        client.delete(alice.id).await.unwrap();
        assert!(client.get(alice.id).await.unwrap().is_none());
        assert_eq!(client.delete(alice.id).await, Err(FrameworkError::NotFound(1)));

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejections_and_missing_entities() {
        let (actor, client) = ResourceActor::new(10, MemoryRepository::default());
        tokio::spawn(actor.run(Committed::default()));

        let err = client.create(SimpleUserCreate { name: String::new() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected("name is required".into()));

        assert_eq!(client.get(99).await, Ok(None));
        let err = client.update(99, SimpleUserUpdate { name: None }).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound(99));
        let err = client.perform_action(99, UserAction::PromoteToAdmin).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound(99));
    }

    #[tokio::test]
    async fn test_storage_failures_are_reported_and_skip_commit_hooks() {
        let mut seeded = MemoryRepository::default();
        let mut carol = SimpleUser { id: 0, name: "Carol".into(), is_admin: false };
        seeded.create(&mut carol).unwrap();

        let committed = Committed::default();
        let (actor, client) = ResourceActor::new(10, ReadOnlyRepository(seeded));
        tokio::spawn(actor.run(committed.clone()));

        let err = client.create(SimpleUserCreate { name: "Dave".into() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Storage(StorageError::Backend("read-only".into())));

        let err = client.perform_action(carol.id, UserAction::PromoteToAdmin).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Storage(_)));
        assert!(committed.lock().unwrap().is_empty());

        let stored = client.get(carol.id).await.unwrap().unwrap();
        assert!(!stored.is_admin);
    }

    #[tokio::test]
    async fn test_closed_actor() {
        let (actor, client) = ResourceActor::<SimpleUser>::new(1, MemoryRepository::default());
        drop(actor);
        assert_eq!(client.get(1).await, Err(FrameworkError::ActorClosed));
    }
}
