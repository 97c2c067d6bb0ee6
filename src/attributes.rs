//! # Attribute Store
//!
//! [`ResourceAttributes`] is the key/value set a resource exposes, and
//! [`AttributeValue`] is the tagged union stored under each key.
//!
//! The store never notifies anybody on its own. Notification is a concern of
//! [`ResourceBase`](crate::resource::ResourceBase), which owns the live store and
//! only ever hands out [`snapshot`](ResourceAttributes::snapshot)s of it.

use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

/// A single attribute value.
///
/// Serialized untagged, so a JSON document such as
/// `{"power": "on", "level": 3, "nested": {"a": true}}` maps onto the obvious variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Attributes(ResourceAttributes),
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen to `f64`; every other variant yields `None`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(value) => Some(*value),
            AttributeValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&ResourceAttributes> {
        match self {
            AttributeValue::Attributes(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl From<()> for AttributeValue {
    fn from(_: ()) -> Self {
        AttributeValue::Null
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<ResourceAttributes> for AttributeValue {
    fn from(value: ResourceAttributes) -> Self {
        AttributeValue::Attributes(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(values: Vec<AttributeValue>) -> Self {
        AttributeValue::Array(values)
    }
}

/// Mapping from attribute key to [`AttributeValue`].
///
/// Keys are unique: [`set`](Self::set) on an existing key overwrites it, and an
/// unset key is simply absent. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceAttributes {
    entries: HashMap<String, AttributeValue>,
}

impl ResourceAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Merges every entry of `other` into this set. Colliding keys take the value from `other`.
    pub fn set_all(&mut self, other: ResourceAttributes) {
        self.entries.extend(other.entries);
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys currently present.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, AttributeValue> {
        self.entries.iter()
    }

    /// Independent deep copy. Later writes to `self` never show up in the
    /// snapshot and vice versa.
    pub fn snapshot(&self) -> ResourceAttributes {
        self.clone()
    }
}

impl<K, V> FromIterator<(K, V)> for ResourceAttributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ResourceAttributes {
    type Item = (String, AttributeValue);
    type IntoIter = hash_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceAttributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = hash_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
