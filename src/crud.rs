//! Gateway-facing operations: create, update with diffing, search.
//!
//! Each operation performs at most one gateway call. The update diff is the
//! only cross-step decision: when every pair of the new payload already
//! appears in the existing entity's payload by `(key, value)`, the update
//! returns the existing entity unchanged and the gateway is never invoked.

use crate::{BridgeError, EntityBridge};
use bridge_core::{DomainRecord, EntitySearch, GenericRecord, Operation};
use crm_client::CrmGateway;
use std::collections::HashSet;

impl EntityBridge {
    /// Create `entity` through the gateway and decode the stored record the
    /// adapter returns.
    ///
    /// The payload carries no identity guid; the adapter assigns one.
    pub async fn create<R, G>(&self, gateway: &G, entity: &R) -> Result<R, BridgeError>
    where
        R: DomainRecord,
        G: CrmGateway + ?Sized,
    {
        let payload = self.to_generic_record(entity, Operation::Create, &[])?;
        tracing::info!(
            "Creating {} entity with {} pairs",
            self.config.kind,
            payload.pairs.len()
        );

        let response = gateway
            .create_entity(payload)
            .await
            .map_err(BridgeError::Gateway)?;
        self.record_to_entity(&response)
    }

    /// Update the entity identified by `guid` through the gateway.
    ///
    /// `already_empty` names fields that were empty before the update, so no
    /// redundant deletion pairs are sent for them. When `existing` is
    /// supplied the payload is reduced to pairs whose `(key, value)` differ
    /// from the existing entity's payload; a fully unchanged update returns
    /// `existing` without calling the gateway.
    pub async fn update<R, G>(
        &self,
        gateway: &G,
        entity: &R,
        guid: &str,
        already_empty: &[&str],
        existing: Option<&R>,
    ) -> Result<R, BridgeError>
    where
        R: DomainRecord,
        G: CrmGateway + ?Sized,
    {
        let mut payload = self.to_generic_record(entity, Operation::Update, already_empty)?;

        if let Some(existing) = existing {
            let existing_payload =
                self.to_generic_record(existing, Operation::Update, already_empty)?;
            let unchanged: HashSet<(&str, &str)> = existing_payload
                .pairs
                .iter()
                .map(|pair| (pair.key.as_str(), pair.value.as_str()))
                .collect();
            payload
                .pairs
                .retain(|pair| !unchanged.contains(&(pair.key.as_str(), pair.value.as_str())));

            if payload.pairs.is_empty() {
                tracing::debug!(
                    "No changed fields on {} {guid}; skipping gateway update",
                    self.config.kind
                );
                return Ok(existing.clone());
            }
        }

        tracing::info!(
            "Updating {} {guid} with {} changed pairs",
            self.config.kind,
            payload.pairs.len()
        );

        let response = gateway
            .update_entity(payload.with_id(guid))
            .await
            .map_err(BridgeError::Gateway)?;
        self.record_to_entity(&response)
    }

    /// Translate a typed search for record type `R` and run it through the
    /// gateway, returning the adapter's records undecoded.
    ///
    /// Use [`record_to_entity`](Self::record_to_entity) to decode each
    /// returned record.
    pub async fn search<R, G>(
        &self,
        gateway: &G,
        search: &EntitySearch,
    ) -> Result<Vec<GenericRecord>, BridgeError>
    where
        R: DomainRecord,
        G: CrmGateway + ?Sized,
    {
        let generic = self.translate_search::<R>(search)?;
        tracing::info!(
            "Searching {} with {} criteria group(s)",
            self.config.kind,
            generic.groups.len()
        );

        gateway
            .search_entities(generic)
            .await
            .map_err(BridgeError::Gateway)
    }
}
