//! Read-back: generic adapter response → typed record.
//!
//! Response pairs are grouped by base key, pairing each raw value with the
//! display counterpart the adapter returns under the formatted-value marker
//! suffix. Keys with no entry in the reverse mapping view are ignored so new
//! adapter-side attributes never break existing callers.

use crate::{BridgeError, EntityBridge};
use bridge_core::{formatted_base_key, DomainRecord, GenericRecord};
use std::collections::HashMap;

#[derive(Default)]
struct CollectedValue {
    raw: Option<String>,
    formatted: Option<String>,
}

/// Group response pairs by base key, splitting formatted-value keys into the
/// display slot of their base key.
fn collect_values(record: &GenericRecord) -> HashMap<String, CollectedValue> {
    let mut grouped: HashMap<String, CollectedValue> = HashMap::new();
    for pair in &record.pairs {
        match formatted_base_key(&pair.key) {
            Some(base) => {
                grouped.entry(base.to_string()).or_default().formatted = Some(pair.raw_value());
            }
            None => {
                grouped.entry(pair.key.clone()).or_default().raw = Some(pair.raw_value());
            }
        }
    }
    grouped
}

impl EntityBridge {
    /// Decode a generic adapter response into a typed record.
    ///
    /// The reverse key view is derived fresh from the mapping table on each
    /// call; when two mappings share a generic key the last table entry wins.
    /// A formatted value with no base value to attach to is ignored, as is
    /// any key outside the mapping table.
    pub fn record_to_entity<R: DomainRecord>(
        &self,
        record: &GenericRecord,
    ) -> Result<R, BridgeError> {
        let reverse = self.config.mappings.reverse_keys();
        let template = R::default();
        let mut entity = R::default();

        for (key, collected) in collect_values(record) {
            let Some(field) = reverse.get(key.as_str()) else {
                continue;
            };
            let Some(raw) = collected.raw else {
                continue;
            };

            let kind = template
                .field_kind(field)
                .ok_or_else(|| BridgeError::UnknownField {
                    field: (*field).to_string(),
                })?;
            let value = self.codec.assign(
                kind,
                field,
                &raw,
                collected.formatted.as_deref().unwrap_or(""),
            )?;
            if !entity.set_field(field, value) {
                return Err(BridgeError::UnknownField {
                    field: (*field).to_string(),
                });
            }
        }

        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{contact_config, Contact};
    use bridge_core::{Formatted, KeyValuePair, ScalarValue, WorkRegion};

    fn bridge() -> EntityBridge {
        EntityBridge::new(contact_config())
    }

    fn response(pairs: Vec<KeyValuePair>) -> GenericRecord {
        GenericRecord::new("contacts", pairs)
    }

    #[test]
    fn known_keys_are_applied_unknown_keys_are_ignored() {
        let record = response(vec![
            KeyValuePair::from_scalar("firstname", ScalarValue::Str("Marge".into())),
            KeyValuePair::from_scalar("emailaddress1", ScalarValue::Str("m@example.com".into())),
            KeyValuePair::from_scalar("somethingnew", ScalarValue::Str("ignored".into())),
        ]);
        let contact: Contact = bridge().record_to_entity(&record).unwrap();
        assert_eq!(contact.first_name, "Marge");
        assert_eq!(contact.email, "m@example.com");
        assert_eq!(contact, {
            let mut expected = Contact::default();
            expected.first_name = "Marge".into();
            expected.email = "m@example.com".into();
            expected
        });
    }

    #[test]
    fn formatted_values_attach_to_their_base_key() {
        let record = response(vec![
            KeyValuePair::from_scalar("new_workregion", ScalarValue::Str("5".into())),
            KeyValuePair::from_scalar(
                "new_workregion@OData.Community.Display.V1.FormattedValue",
                ScalarValue::Str("Great Lakes".into()),
            ),
        ]);
        let contact: Contact = bridge().record_to_entity(&record).unwrap();
        assert_eq!(
            contact.region,
            Formatted::new(WorkRegion::GreatLakes, "Great Lakes")
        );
    }

    #[test]
    fn formatted_value_without_base_value_is_ignored() {
        let record = response(vec![KeyValuePair::from_scalar(
            "new_workregion@OData.Community.Display.V1.FormattedValue",
            ScalarValue::Str("Great Lakes".into()),
        )]);
        let contact: Contact = bridge().record_to_entity(&record).unwrap();
        assert_eq!(contact.region, Formatted::default());
    }

    #[test]
    fn typed_mirror_takes_precedence_over_string_value() {
        let mut pair = KeyValuePair::from_scalar("new_visitcount", ScalarValue::Int(7));
        pair.value = "not-a-number".into();
        let contact: Contact = bridge().record_to_entity(&response(vec![pair])).unwrap();
        assert_eq!(contact.visit_count, 7);
    }

    #[test]
    fn timestamps_decode_from_the_wire_format() {
        let record = response(vec![KeyValuePair::from_scalar(
            "new_lastvisit",
            ScalarValue::Str("2009-02-13T23:31:30Z".into()),
        )]);
        let contact: Contact = bridge().record_to_entity(&record).unwrap();
        assert_eq!(contact.last_visit, Formatted::raw(1_234_567_890));
    }

    #[test]
    fn malformed_values_surface_codec_errors() {
        let record = response(vec![KeyValuePair::from_scalar(
            "new_visitcount",
            ScalarValue::Str("many".into()),
        )]);
        let err = bridge().record_to_entity::<Contact>(&record).unwrap_err();
        assert!(matches!(err, BridgeError::Codec(_)));
    }
}
