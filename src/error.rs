//! Error types for the translation engine.
//!
//! Every variant is a local validation failure surfaced synchronously before
//! or during payload construction, except `Gateway`, which wraps a transport
//! error from the adapter unmodified. Nothing is retried or swallowed here;
//! the single deliberate non-error is the read-back path ignoring response
//! keys it has no mapping for.

use crm_types::CodecError;
use thiserror::Error;

/// Errors returned by [`EntityBridge`](crate::EntityBridge) operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required field resolved to an empty value at create/update.
    #[error("The field '{field}' is required and cannot be left blank or deleted")]
    RequiredFieldEmpty { field: String },

    /// A reference field has no configured navigation key.
    #[error("No navigation key is configured for field '{field}'")]
    MissingNavigationKey { field: String },

    /// A reference field has no configured referenced kind.
    #[error("No referenced kind is configured for field '{field}'")]
    MissingReferencedKind { field: String },

    /// A search requested return fields outside the configured field set.
    #[error("Invalid fields to return: {fields}")]
    InvalidFields { fields: String },

    /// A mapped field does not exist on the domain record type.
    #[error("The record has no field named '{field}'")]
    UnknownField { field: String },

    /// A value conversion failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The adapter call itself failed; the transport error is carried
    /// unmodified.
    #[error("CRM gateway call failed: {0}")]
    Gateway(anyhow::Error),
}
