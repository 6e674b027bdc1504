//! # System Lifecycle
//!
//! Starting, wiring and stopping the item actor.
//!
//! - [`InventorySystem`] spawns the actor over a repository, injects the
//!   restock notifier as its context and hands out the [`InventoryClient`](crate::clients::InventoryClient).
//! - [`setup_tracing`] initializes the global `tracing` subscriber.
//!
//! Shutdown is cooperative: dropping every client closes the actor's channel,
//! the actor drains what is queued and returns, and [`InventorySystem::shutdown`]
//! waits for that.

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::InventorySystem;
pub use tracing::setup_tracing;
