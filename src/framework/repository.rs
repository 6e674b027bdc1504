//! # Persistence Gateway
//!
//! The storage seam of the framework. A [`ResourceActor`](super::ResourceActor)
//! owns exactly one `Repository` and is the only caller of it, so implementations
//! never see two operations interleave. Every mutating method is one transaction:
//! it either commits or rolls back and reports a [`StorageError`].

use super::ActorEntity;
use thiserror::Error;

/// Failures raised by a [`Repository`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// `update` was called on an entity that was never persisted.
    #[error("update called with empty identity")]
    MissingIdentity,

    /// The backing store refused the operation; the transaction was rolled back.
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Durable storage for one entity type.
pub trait Repository<T: ActorEntity>: Send + 'static {
    /// Persists a new entity, writes the assigned identity into it and returns it.
    fn create(&mut self, entity: &mut T) -> Result<T::Id, StorageError>;

    /// Writes the current state of an already persisted entity.
    fn update(&mut self, entity: &T) -> Result<(), StorageError>;

    /// Removes the entity's row.
    fn delete(&mut self, entity: &T) -> Result<(), StorageError>;

    /// Looks an entity up by identity. Absence is `Ok(None)`.
    fn find(&self, id: &T::Id) -> Result<Option<T>, StorageError>;

    /// Every stored entity, oldest first.
    fn find_all(&self) -> Result<Vec<T>, StorageError>;

    /// Entities matching an exact-match filter.
    fn find_by(&self, filter: &T::Filter) -> Result<Vec<T>, StorageError>;
}
