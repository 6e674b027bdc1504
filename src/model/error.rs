//! Validation errors raised while parsing an item payload.

use thiserror::Error;

/// Errors produced by [`ItemPayload::from_json`](crate::model::ItemPayload::from_json).
///
/// Every variant is a client mistake and maps to `400 Bad Request`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// The body was not a JSON object.
    #[error("Invalid InventoryItem: body of request contained bad or no data")]
    NotAnObject,

    /// A required key was absent or null.
    #[error("Invalid InventoryItem: missing {0}")]
    MissingField(&'static str),

    /// An integer field held something other than an `i32`.
    #[error("Invalid type for integer [{field}]: {found}")]
    InvalidInteger { field: &'static str, found: String },

    /// A text field held something other than a string.
    #[error("Invalid type for string [{field}]: {found}")]
    InvalidString { field: &'static str, found: String },

    /// The item name was an empty string.
    #[error("Invalid InventoryItem: name must not be empty")]
    EmptyName,

    /// The price could not be read as a decimal number.
    #[error("Invalid type for decimal [price]: {0}")]
    InvalidDecimal(String),

    /// The price, rounded to cents, does not fit `NUMERIC(8, 2)`.
    #[error("Invalid value for decimal [price]: {0} is out of range")]
    PriceOutOfRange(String),

    /// The condition was not one of the known values.
    #[error("Invalid value for [condition]: {0}")]
    InvalidCondition(String),
}
