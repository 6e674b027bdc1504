//! Error types for the inventory actor.

use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// The requested item was not found.
    #[error("Item with id '{0}' was not found.")]
    NotFound(i64),

    /// The item refused the requested transition (e.g., archiving twice).
    #[error("{0}")]
    Rejected(String),

    /// The store rolled the operation back.
    #[error("{0}")]
    Storage(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
