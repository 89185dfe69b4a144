//! crm-bridge
//!
//! A library for translating between strongly-typed domain records and the
//! generic key/value records consumed by a downstream CRM-style data store
//! behind an RPC adapter.
//!
//! # Features
//!
//! - Create/update payload generation driven by a declarative field mapping
//!   table, with reference-field navigation keys, required-field enforcement
//!   and per-operation protected fields
//! - Update diffing: unchanged `(key, value)` pairs are dropped and a fully
//!   unchanged update returns without any gateway call
//! - Read-back of generic adapter responses into typed records, pairing raw
//!   values with their formatted-value display counterparts and ignoring
//!   unknown keys
//! - Search predicate translation, including the half-open rewrite of
//!   timestamp equality into a one-second `>=` / `<` interval
//!
//! # Crate Layout
//!
//! ```text
//! crm-bridge (this crate: the translation engine)
//!    │
//!    ├─── bridge-core  (field model, generic record, search, config)
//!    ├─── crm-types    (value codec: FieldValue ⇄ ScalarValue)
//!    └─── crm-client   (CrmGateway trait, consumed not implemented)
//! ```
//!
//! # Example
//!
//! ```rust
//! use crm_bridge::testing::{contact_config, Contact, MockGateway};
//! use crm_bridge::EntityBridge;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), crm_bridge::BridgeError> {
//! let bridge = EntityBridge::new(contact_config());
//! let gateway = MockGateway::new();
//!
//! let mut contact = Contact::default();
//! contact.first_name = "Marge".into();
//! contact.last_name = "Simpson".into();
//!
//! let created = bridge.create(&gateway, &contact).await?;
//! assert_eq!(created.first_name, "Marge");
//! # Ok(())
//! # }
//! ```

pub mod crud;
pub mod error;
pub mod payload;
pub mod read;
pub mod search;
pub mod testing;

pub use error::BridgeError;

// Re-export the member crates under their roles
pub use bridge_core as model;
pub use crm_client as client;
pub use crm_types as types;

use bridge_core::EntityConfig;
use crm_types::{CodecExtensions, ValueCodec};

/// The translation engine for one entity kind.
///
/// One shared instance serves every conversion for its entity kind; entity
/// kinds customize behavior through configuration and the codec extension
/// registry, never through specialization. All methods take `&self` and the
/// engine holds no per-call state, so an instance may be shared freely across
/// concurrent callers.
pub struct EntityBridge {
    pub(crate) config: EntityConfig,
    pub(crate) codec: ValueCodec,
}

impl EntityBridge {
    /// Build an engine from an entity configuration, with only the built-in
    /// field kinds.
    pub fn new(config: EntityConfig) -> Self {
        Self {
            config,
            codec: ValueCodec::new(),
        }
    }

    /// Build an engine whose codec also handles caller-registered custom
    /// field kinds.
    pub fn with_extensions(config: EntityConfig, extensions: CodecExtensions) -> Self {
        Self {
            config,
            codec: ValueCodec::with_extensions(extensions),
        }
    }

    /// The entity configuration this engine was built from.
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }
}
