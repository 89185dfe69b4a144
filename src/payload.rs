//! Payload generation: typed record → generic key/value pairs.
//!
//! Pair building walks the mapping table in order. A field resolving to an
//! empty value becomes a deletion pair (the adapter clears the property on
//! an empty string), a reference field is written under its navigation key
//! with a linked-entity annotation, and everything else becomes a regular
//! pair under its generic key. The typed scalar mirror on each non-deletion
//! pair is chosen by the output value's own native type, not by the source
//! field's kind.

use crate::{BridgeError, EntityBridge};
use bridge_core::{
    DomainRecord, FieldMapping, GenericRecord, KeyValuePair, Operation, ReferencedKinds,
    ScalarValue,
};

impl EntityBridge {
    /// Build the generic record for `entity` under the protected-field set of
    /// `op`.
    ///
    /// `already_empty` names fields the caller knows were empty before the
    /// operation; such fields are skipped instead of emitting a redundant
    /// deletion pair.
    pub fn to_generic_record<R: DomainRecord>(
        &self,
        entity: &R,
        op: Operation,
        already_empty: &[&str],
    ) -> Result<GenericRecord, BridgeError> {
        let pairs = self.build_pairs(entity, op, already_empty)?;
        Ok(GenericRecord::new(self.config.kind.clone(), pairs))
    }

    fn build_pairs<R: DomainRecord>(
        &self,
        entity: &R,
        op: Operation,
        already_empty: &[&str],
    ) -> Result<Vec<KeyValuePair>, BridgeError> {
        let mut pairs = Vec::new();

        for mapping in self.config.mappings.entries() {
            let field = mapping.field.as_str();
            if self.config.protected.contains(op, field) {
                continue;
            }

            let value = entity.field(field).ok_or_else(|| BridgeError::UnknownField {
                field: field.to_string(),
            })?;
            let scalar = self.codec.extract(&value, value.kind(), false)?;

            let resolved_empty = scalar.as_ref().map_or(true, ScalarValue::is_empty);
            if resolved_empty && self.config.required.iter().any(|r| r == field) {
                return Err(BridgeError::RequiredFieldEmpty {
                    field: field.to_string(),
                });
            }
            if resolved_empty && already_empty.contains(&field) {
                continue;
            }

            let pair = match scalar {
                Some(scalar) if !scalar.is_empty() => {
                    if mapping.is_reference() {
                        self.linked_pair(mapping, scalar)?
                    } else {
                        KeyValuePair::from_scalar(&mapping.key, scalar)
                    }
                }
                _ => self.deletion_pair(mapping),
            };
            pairs.push(pair);
        }

        Ok(pairs)
    }

    /// A pair that writes a reference field: navigation key, value, and the
    /// separator-prefixed authoritative referenced kind.
    fn linked_pair(
        &self,
        mapping: &FieldMapping,
        scalar: ScalarValue,
    ) -> Result<KeyValuePair, BridgeError> {
        let navigation =
            mapping
                .navigation
                .as_deref()
                .ok_or_else(|| BridgeError::MissingNavigationKey {
                    field: mapping.field.clone(),
                })?;
        let linked = mapping
            .references
            .as_ref()
            .and_then(ReferencedKinds::first)
            .ok_or_else(|| BridgeError::MissingReferencedKind {
                field: mapping.field.clone(),
            })?;
        Ok(KeyValuePair::from_scalar(navigation, scalar).with_linked_entity(format!("/{linked}")))
    }

    /// A pair that clears a field: empty value, keyed by the navigation key
    /// for reference fields, annotated with the referenced kind when one is
    /// configured.
    fn deletion_pair(&self, mapping: &FieldMapping) -> KeyValuePair {
        match (&mapping.navigation, &mapping.references) {
            (Some(navigation), Some(references)) => {
                let pair = KeyValuePair::deletion(navigation);
                match references.first() {
                    Some(linked) => pair.with_linked_entity(format!("/{linked}")),
                    None => pair,
                }
            }
            _ => KeyValuePair::deletion(&mapping.key),
        }
    }
}
