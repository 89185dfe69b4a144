//! Search translation: typed predicates → generic predicates.
//!
//! Each typed criterion translates one-to-one onto a generic criterion keyed
//! by the field's generic name, with two corrections:
//!
//! - equality on a timestamp field becomes a half-open interval, `>=` the
//!   value and `<` the value advanced one second, because the adapter stores
//!   second-granularity timestamps and cannot match an instant exactly;
//! - criteria on the entity's identity field have one leading and trailing
//!   single quote stripped after translation, because identity values are
//!   never quoted in the adapter's query encoding even though guid values
//!   travel as strings elsewhere.

use crate::{BridgeError, EntityBridge};
use bridge_core::{
    Criterion, DomainRecord, EntitySearch, FieldKind, FieldValue, Formatted, GenericCriterion,
    GenericGroup, GenericSearch, MatchOp, Returning, ScalarValue,
};

/// Strip one leading and one trailing single quote, each independently.
fn strip_single_quotes(value: &str) -> String {
    let value = value.strip_prefix('\'').unwrap_or(value);
    let value = value.strip_suffix('\'').unwrap_or(value);
    value.to_string()
}

impl EntityBridge {
    /// Translate a typed search for record type `R` into the generic shape.
    ///
    /// Requested return fields are validated against the full configured
    /// field set before anything else; an unknown name fails with
    /// [`BridgeError::InvalidFields`] and no gateway call is ever made.
    pub fn translate_search<R: DomainRecord>(
        &self,
        search: &EntitySearch,
    ) -> Result<GenericSearch, BridgeError> {
        let returning = self.translate_returning(&search.returning)?;

        let template = R::default();
        let mut groups = Vec::with_capacity(search.groups.len());
        for group in &search.groups {
            let mut criteria = Vec::new();
            for criterion in &group.criteria {
                criteria.extend(self.translate_criterion(&template, criterion)?);
            }
            groups.push(GenericGroup { criteria });
        }

        // Identity values are never quoted in the adapter's query encoding
        for group in &mut groups {
            for criterion in &mut group.criteria {
                if criterion.key == self.config.identity_field {
                    criterion.value = strip_single_quotes(&criterion.value);
                }
            }
        }

        Ok(GenericSearch {
            kind: self.config.kind.clone(),
            groups,
            limit: search.limit,
            returning,
        })
    }

    fn translate_returning(&self, returning: &Returning) -> Result<Returning, BridgeError> {
        match returning {
            Returning::All => Ok(Returning::All),
            Returning::Fields(fields) => {
                let mut keys = Vec::with_capacity(fields.len());
                let mut invalid = Vec::new();
                for field in fields {
                    match self.config.mappings.key_for(field) {
                        Some(key) => keys.push(key.to_string()),
                        None => invalid.push(field.as_str()),
                    }
                }
                if !invalid.is_empty() {
                    invalid.sort_unstable();
                    return Err(BridgeError::InvalidFields {
                        fields: invalid.join(","),
                    });
                }
                Ok(Returning::Fields(keys))
            }
        }
    }

    fn translate_criterion<R: DomainRecord>(
        &self,
        template: &R,
        criterion: &Criterion,
    ) -> Result<Vec<GenericCriterion>, BridgeError> {
        let field = criterion.field.as_str();
        let kind = template
            .field_kind(field)
            .ok_or_else(|| BridgeError::UnknownField {
                field: field.to_string(),
            })?;
        let key = self
            .config
            .mappings
            .key_for(field)
            .ok_or_else(|| BridgeError::UnknownField {
                field: field.to_string(),
            })?
            .to_string();

        // Second-granularity equality as a half-open one-second interval
        if criterion.op == MatchOp::Equal && kind == FieldKind::Timestamp {
            if let FieldValue::Timestamp(ts) = &criterion.value {
                let from = self.search_value(&criterion.value, kind)?;
                let next = FieldValue::Timestamp(Formatted::raw(ts.value + 1));
                let to = self.search_value(&next, kind)?;
                return Ok(vec![
                    GenericCriterion {
                        key: key.clone(),
                        op: MatchOp::GreaterOrEqual,
                        value: from,
                    },
                    GenericCriterion {
                        key,
                        op: MatchOp::LessThan,
                        value: to,
                    },
                ]);
            }
        }

        let value = self.search_value(&criterion.value, kind)?;
        Ok(vec![GenericCriterion {
            key,
            op: criterion.op,
            value,
        }])
    }

    fn search_value(&self, value: &FieldValue, kind: FieldKind) -> Result<String, BridgeError> {
        let scalar = self.codec.extract(value, kind, true)?;
        Ok(scalar.as_ref().map(ScalarValue::canonical).unwrap_or_default())
    }
}
