//! Core types for the crm-bridge translation engine.
//!
//! This crate provides the foundational types shared across the bridge:
//!
//! - [`entity`] - the typed field model (`FieldKind`, `FieldValue`, formatted
//!   wrappers, closed enumerations) and the `DomainRecord` access trait
//! - [`record`] - the generic key/value record consumed by the downstream
//!   adapter (`GenericRecord`, `KeyValuePair`, `ScalarValue`)
//! - [`search`] - typed and generic search predicate shapes
//! - [`config`] - per-entity-kind configuration (mapping table, required and
//!   protected field sets, YAML loading)
//!
//! # Architecture
//!
//! ```text
//! bridge-core (this crate)
//!    │
//!    ├─── crm-types   (value codec: FieldValue ⇄ ScalarValue)
//!    ├─── crm-client  (gateway trait over GenericRecord / GenericSearch)
//!    └─── crm-bridge  (translation engine)
//! ```

pub mod config;
pub mod entity;
pub mod record;
pub mod search;

// Re-exports for convenience
pub use config::{
    ConfigError, EntityConfig, FieldMapping, MappingTable, Operation, ProtectedFields,
    ReferencedKinds,
};
pub use entity::{
    CreationSource, CustomValue, DomainRecord, FieldKind, FieldValue, Formatted, WorkRegion,
};
pub use record::{
    formatted_base_key, GenericRecord, KeyValuePair, ScalarValue, FORMATTED_VALUE_SUFFIX,
};
pub use search::{
    Criterion, EntitySearch, GenericCriterion, GenericGroup, GenericSearch, MatchOp, OrGroup,
    Returning,
};
