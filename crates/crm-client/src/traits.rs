//! CrmGateway trait definition.
//!
//! This trait abstracts the downstream CRM adapter's RPC surface so the
//! translation engine can be compiled against a single interface regardless
//! of the transport behind it. Timeouts, retries and connection management
//! are entirely the implementation's concern; the engine performs at most one
//! gateway call per public operation and propagates transport errors
//! unmodified.

use anyhow::Result;
use bridge_core::{GenericRecord, GenericSearch};

/// Operations the downstream CRM adapter exposes.
///
/// # Usage Pattern
///
/// Engine entry points use generics for zero-cost dispatch:
///
/// ```ignore
/// pub async fn create<R, G: CrmGateway>(
///     &self,
///     gateway: &G,
///     entity: &R,
/// ) -> Result<R, BridgeError> {
///     // Statically dispatched after monomorphization
///     let response = gateway.create_entity(payload).await?;
/// }
/// ```
#[async_trait::async_trait]
pub trait CrmGateway: Send + Sync {
    /// Create an entity from a generic record. The record carries no
    /// identity guid; the adapter assigns one and returns the stored record.
    async fn create_entity(&self, record: GenericRecord) -> Result<GenericRecord>;

    /// Update the entity identified by the record's guid. Returns the stored
    /// record after the update is applied.
    async fn update_entity(&self, record: GenericRecord) -> Result<GenericRecord>;

    /// Run a generic search and return the matching records.
    async fn search_entities(&self, search: GenericSearch) -> Result<Vec<GenericRecord>>;
}
