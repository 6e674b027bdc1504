//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the actor tags its
//! lines with `entity_type` instead.
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Full payloads at client entry points, plus every actor message
//! RUST_LOG=debug cargo run
//!
//! # Only the storage layer
//! RUST_LOG=inventory_service::store=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, creating and decrementing an item looks like:
//!
//! ```text
//! INFO Creating item name="Widget"
//! INFO Created entity_type="InventoryItem" id=1
//! INFO create_item: Item saved id=Some(1)
//! INFO Saving item id=1 name="Widget"
//! WARN Item is below restock level id=Some(1) name="Widget" quantity=0 restock_level=Some(5)
//! INFO Action ok entity_type="InventoryItem" id=1
//! INFO decrement_item{id=1}: Item quantity decremented
//! ```
//!
//! The actor runs in its own task, so its lines carry no client span.
//!
//! Storage rollbacks are logged at `error`, refused requests at `warn`.

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
