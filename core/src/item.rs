//! Items and their identifiers.
//!
//! # Design
//! No schema is enforced: an item is any JSON value, by convention an
//! object carrying an `id` field once persisted. `ItemId` covers the two
//! id shapes seen on the wire, integers and strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured record manipulated by CRUD operations.
pub type Item = Value;

/// Key-value pairs used as a query predicate.
pub type Query = Map<String, Value>;

/// Identifier of a persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(u64),
    Text(String),
}

impl ItemId {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            ItemId::Int(n) => Some(*n),
            ItemId::Text(_) => None,
        }
    }

    /// The id as a JSON value, for storing back into an item.
    pub fn to_value(&self) -> Value {
        match self {
            ItemId::Int(n) => Value::from(*n),
            ItemId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}

/// Returns the item's id if it is defined.
///
/// Null, `false`, `0`, and the empty string count as "no id", as do
/// values that cannot address an item (negative or fractional numbers,
/// numbers beyond `u64::MAX`, arrays, objects).
pub fn item_id(item: &Item) -> Option<ItemId> {
    match item.get("id")? {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                return (n != 0).then_some(ItemId::Int(n));
            }
            // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
            let f = n.as_f64()?;
            (f > 0.0 && f.fract() == 0.0 && f < u64::MAX as f64).then_some(ItemId::Int(f as u64))
        }
        Value::String(s) if !s.is_empty() => Some(ItemId::Text(s.clone())),
        _ => None,
    }
}

/// Returns true if the item carries a defined id.
pub fn has_id(item: &Item) -> bool {
    item_id(item).is_some()
}
