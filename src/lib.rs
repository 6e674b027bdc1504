//! # Inventory Service
//!
//! A REST service for tracking stocked items: create, read, replace, delete,
//! filter, archive, and decrement quantity with a low-stock notification.
//!
//! ## Architecture
//!
//! Every request goes through one resource actor that owns the SQLite connection:
//!
//! ```text
//! axum handler -> ItemPayload::from_json -> InventoryClient
//!     -> mpsc -> ResourceActor<InventoryItem> -> entity hook -> Repository transaction
//!     <- oneshot reply
//! ```
//!
//! The actor handles one message at a time, so the store needs no locking and
//! two writes to the same item never interleave.
//!
//! ## Module Tour
//!
//! - [`framework`]: the generic engine. [`ActorEntity`](framework::ActorEntity),
//!   [`ResourceActor`](framework::ResourceActor), [`ResourceClient`](framework::ResourceClient),
//!   the [`Repository`](framework::Repository) seam and the [`mock`](framework::mock) helpers.
//! - [`model`]: [`InventoryItem`](model::InventoryItem), [`Condition`](model::Condition)
//!   and payload validation.
//! - [`store`]: [`SqliteRepository`](store::SqliteRepository), one transaction per mutation.
//! - [`inventory_actor`]: the item's actions, errors and restock notifier.
//! - [`clients`]: [`InventoryClient`](clients::InventoryClient), the typed face of the actor.
//! - [`http`]: routes, handlers and JSON errors.
//! - [`lifecycle`]: [`InventorySystem`](lifecycle::InventorySystem) and tracing setup.
//! - [`config`]: [`Settings`](config::Settings) from file and environment.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod http;
pub mod inventory_actor;
pub mod lifecycle;
pub mod model;
pub mod store;
