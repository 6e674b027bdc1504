//! The inventory item record and its wire format.
//!
//! Items leave the service through the derived [`Serialize`] impl (price is always
//! written as a string with two fractional digits) and enter it through
//! [`ItemPayload::from_json`], which validates an untyped JSON body before any
//! storage call is made.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::ValidationError;

/// Condition of a stocked item.
///
/// `Archived` is terminal as far as the archive action is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "open box")]
    OpenBox,
    #[serde(rename = "used")]
    Used,
    #[serde(rename = "archived")]
    Archived,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::New,
        Condition::OpenBox,
        Condition::Used,
        Condition::Archived,
    ];

    /// The wire and column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::OpenBox => "open box",
            Condition::Used => "used",
            Condition::Archived => "archived",
        }
    }
}

impl FromStr for Condition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCondition(s.to_string()))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single stocked item.
///
/// `id` stays `None` until the store has persisted the item; it is never taken
/// from client input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    #[serde(serialize_with = "serialize_price")]
    pub price: Decimal,
    pub product_id: i32,
    pub restock_level: Option<i32>,
    pub condition: Option<Condition>,
}

impl InventoryItem {
    /// Builds an unsaved item from a validated payload.
    pub fn from_payload(payload: ItemPayload) -> Self {
        Self {
            id: None,
            name: payload.name,
            description: payload.description,
            quantity: payload.quantity,
            price: payload.price,
            product_id: payload.product_id,
            restock_level: payload.restock_level,
            condition: payload.condition,
        }
    }

    /// Replaces every field except `id` with the payload's values.
    pub fn apply(&mut self, payload: ItemPayload) {
        self.name = payload.name;
        self.description = payload.description;
        self.quantity = payload.quantity;
        self.price = payload.price;
        self.product_id = payload.product_id;
        self.restock_level = payload.restock_level;
        self.condition = payload.condition;
    }

    pub fn is_archived(&self) -> bool {
        self.condition == Some(Condition::Archived)
    }

    /// Removes one unit from stock, flooring at zero.
    ///
    /// Returns `true` when the remaining quantity is below the restock level.
    pub fn decrement(&mut self) -> bool {
        self.quantity = self.quantity.saturating_sub(1).max(0);
        self.below_restock_level()
    }

    /// `false` when no restock level is configured.
    pub fn below_restock_level(&self) -> bool {
        self.restock_level
            .is_some_and(|level| self.quantity < level)
    }
}

/// Largest absolute price: eight digits, two of them after the point.
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Rounds half-to-even to cents and pads to exactly two fractional digits.
pub fn quantize_price(price: Decimal) -> Decimal {
    let mut cents = price.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    cents.rescale(2);
    cents
}

fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&quantize_price(*price).to_string())
}

/// The validated content of a create or update body.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPayload {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
    pub product_id: i32,
    pub restock_level: Option<i32>,
    pub condition: Option<Condition>,
}

impl ItemPayload {
    /// Parses and validates an untyped JSON body.
    ///
    /// `price` may be a JSON number or a numeric string. Keys are checked in a
    /// fixed order, so the first problem found is the one reported.
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let object = data.as_object().ok_or(ValidationError::NotAnObject)?;

        let name = string_field(required(object, "name")?, "name")?;
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let description = optional(object, "description")
            .map(|value| string_field(value, "description"))
            .transpose()?;
        let quantity = integer_field(required(object, "quantity")?, "quantity")?;
        let price = parse_price(required(object, "price")?)?;
        let product_id = integer_field(required(object, "product_id")?, "product_id")?;
        let restock_level = optional(object, "restock_level")
            .map(|value| integer_field(value, "restock_level"))
            .transpose()?;
        let condition = optional(object, "condition")
            .map(|value| match value {
                Value::String(text) => text.parse::<Condition>(),
                other => Err(ValidationError::InvalidCondition(other.to_string())),
            })
            .transpose()?;

        Ok(Self {
            name,
            description,
            quantity,
            price,
            product_id,
            restock_level,
            condition,
        })
    }
}

fn required<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ValidationError> {
    optional(object, key).ok_or(ValidationError::MissingField(key))
}

fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer out of range",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn integer_field(value: &Value, field: &'static str) -> Result<i32, ValidationError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ValidationError::InvalidInteger {
            field,
            found: kind(value).to_string(),
        })
}

fn string_field(value: &Value, field: &'static str) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidString {
            field,
            found: kind(value).to_string(),
        })
}

fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        other => {
            return Err(ValidationError::InvalidDecimal(format!(
                "expected a number or numeric string, found {}",
                kind(other)
            )))
        }
    };
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ValidationError::InvalidDecimal(format!("{text:?} {e}")))?;
    if quantize_price(price).abs() > MAX_PRICE {
        return Err(ValidationError::PriceOutOfRange(text));
    }
    Ok(price)
}
