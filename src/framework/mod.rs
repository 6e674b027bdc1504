//! Generic resource framework.
//!
//! This module provides the core building blocks for serving resource entities
//! with CRUD operations and custom actions out of a durable store.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns a [`Repository`] and processes requests in order
//! - [`ResourceClient`] - Type-safe handle for sending requests to an actor
//! - [`Repository`] - The persistence seam, one transaction per mutation
//! - [`FrameworkError`] / [`StorageError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;
pub mod repository;

// Re-export core types for convenience
pub use core::*;
pub use repository::*;
