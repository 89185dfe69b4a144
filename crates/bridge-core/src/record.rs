//! Generic key/value record consumed by the downstream adapter.
//!
//! A `GenericRecord` is an entity-kind tag plus an ordered list of
//! `KeyValuePair`s. Each pair carries the canonical string value, optionally
//! one typed scalar mirror of that value, and optionally a linked-entity
//! annotation when the key denotes a navigable reference.

use serde::{Deserialize, Serialize};

/// Marker suffix the adapter appends to a base key for the display
/// counterpart of a raw value. Any key containing this exact suffix is
/// treated as the formatted value of its base key.
pub const FORMATTED_VALUE_SUFFIX: &str = "@OData.Community.Display.V1.FormattedValue";

/// If `key` is a formatted-value key, return its base key.
pub fn formatted_base_key(key: &str) -> Option<&str> {
    let (base, rest) = key.split_once('@')?;
    (FORMATTED_VALUE_SUFFIX[1..] == *rest).then_some(base)
}

/// One scalar output of the forward conversion.
///
/// The wire protocol mirrors the canonical string value into exactly one
/// typed slot chosen by the value's own native type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// String value
    Str(String),

    /// 64-bit signed integer value
    Int(i64),

    /// 64-bit float value
    Float(f64),

    /// Boolean value
    Bool(bool),
}

impl ScalarValue {
    /// Canonical string form of this scalar, used as a pair's `value`.
    pub fn canonical(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Whether this scalar resolves to the empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

/// One key/value pair of a generic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Generic key name
    pub key: String,

    /// Canonical string value
    pub value: String,

    /// Typed mirror of `value`, absent on deletion pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<ScalarValue>,

    /// Separator-prefixed referenced entity kind, set only when the key is a
    /// navigation key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_entity: Option<String>,
}

impl KeyValuePair {
    /// Build a pair from an output scalar, mirroring it into both the
    /// canonical string value and the typed slot.
    pub fn from_scalar(key: impl Into<String>, scalar: ScalarValue) -> Self {
        Self {
            key: key.into(),
            value: scalar.canonical(),
            scalar: Some(scalar),
            linked_entity: None,
        }
    }

    /// Build a deletion pair: empty string value, no typed mirror.
    pub fn deletion(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
            scalar: None,
            linked_entity: None,
        }
    }

    /// Attach a linked-entity annotation.
    pub fn with_linked_entity(mut self, linked: impl Into<String>) -> Self {
        self.linked_entity = Some(linked.into());
        self
    }

    /// The raw value to apply on read-back: the typed mirror when present,
    /// otherwise the canonical string value.
    pub fn raw_value(&self) -> String {
        match &self.scalar {
            Some(scalar) => scalar.canonical(),
            None => self.value.clone(),
        }
    }
}

/// Entity-kind tag plus an ordered collection of key/value pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericRecord {
    /// Entity-kind tag, e.g. `contacts`
    pub kind: String,

    /// Identity guid, set on update payloads and adapter responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered key/value pairs
    pub pairs: Vec<KeyValuePair>,
}

impl GenericRecord {
    /// Create a record for an entity kind.
    pub fn new(kind: impl Into<String>, pairs: Vec<KeyValuePair>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            pairs,
        }
    }

    /// Set the identity guid.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Look up a pair by key.
    pub fn pair(&self, key: &str) -> Option<&KeyValuePair> {
        self.pairs.iter().find(|p| p.key == key)
    }
}
