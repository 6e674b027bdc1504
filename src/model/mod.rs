//! Pure data structures for the inventory resource.

pub mod error;
pub mod item;

pub use error::*;
pub use item::*;
