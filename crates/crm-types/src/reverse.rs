//! Reverse conversion: generic adapter value → domain field value.
//!
//! Assignment parses the adapter's string encoding back into a typed field
//! value, carrying the formatted display counterpart when the adapter
//! returned one. The constructed value replaces the target field wholesale;
//! merging is never attempted.
//!
//! The module also provides the two generic enumeration helpers for entity
//! kinds whose enumerations are defined by the calling service rather than
//! built into the codec.

use crate::error::{CodecError, Result};
use crate::forward::TIMESTAMP_FORMAT;
use bridge_core::{CreationSource, FieldKind, FieldValue, Formatted, WorkRegion};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Parse a timestamp in the adapter's fixed UTC wire format into epoch
/// seconds. No timezone offsets are accepted.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    let dt = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| {
        CodecError::InvalidTimestamp {
            value: raw.to_string(),
        }
    })?;
    Ok(dt.and_utc().timestamp())
}

fn parse_i64(field: &str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| CodecError::InvalidFieldValue {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Adapter codes for enumeration kinds arrive as integer strings; an absent
/// or empty string means the unset code zero.
fn parse_enum_code(field: &str, raw: &str) -> Result<i64> {
    if raw.is_empty() {
        return Ok(0);
    }
    parse_i64(field, raw)
}

/// Construct a field value of the given kind from the adapter's raw string
/// and its optional display counterpart.
///
/// # Errors
///
/// - [`CodecError::InvalidFieldValue`] when a numeric kind's raw string does
///   not parse
/// - [`CodecError::InvalidTimestamp`] when a timestamp does not match the
///   fixed wire format
/// - [`CodecError::InvalidEnumValue`] when a closed enumeration has no entry
///   for the parsed integer
/// - [`CodecError::UnsupportedType`] for `Custom` kinds, which only the
///   codec's extension registry can handle
pub fn assign(kind: FieldKind, field: &str, raw: &str, display: &str) -> Result<FieldValue> {
    let value = match kind {
        FieldKind::Bool => FieldValue::Bool(raw == "true"),

        FieldKind::Str => FieldValue::Str(raw.to_string()),

        FieldKind::Int => FieldValue::Int(parse_i64(field, raw)?),

        FieldKind::Float => {
            FieldValue::Float(raw.parse().map_err(|_| CodecError::InvalidFieldValue {
                field: field.to_string(),
                value: raw.to_string(),
            })?)
        }

        FieldKind::Guid => FieldValue::Guid(Formatted::new(raw.to_string(), display)),

        FieldKind::FormattedInt => {
            FieldValue::FormattedInt(Formatted::new(parse_i64(field, raw)?, display))
        }

        FieldKind::FormattedStr => FieldValue::FormattedStr(Formatted::new(raw.to_string(), display)),

        FieldKind::Timestamp => FieldValue::Timestamp(Formatted::new(parse_timestamp(raw)?, display)),

        FieldKind::Region => {
            let code = parse_enum_code(field, raw)?;
            let region = WorkRegion::from_code(code)
                .ok_or(CodecError::InvalidEnumValue { kind, value: code })?;
            FieldValue::Region(Formatted::new(region, display))
        }

        FieldKind::CreationSource => {
            let code = parse_enum_code(field, raw)?;
            let source = CreationSource::from_code(code)
                .ok_or(CodecError::InvalidEnumValue { kind, value: code })?;
            FieldValue::CreationSource(Formatted::new(source, display))
        }

        FieldKind::Custom(_) => return Err(CodecError::UnsupportedType { kind }),
    };

    Ok(value)
}

fn short_type_name<E>() -> String {
    std::any::type_name::<E>()
        .rsplit("::")
        .next()
        .unwrap_or("enum")
        .to_string()
}

/// Parse an adapter integer string into a caller-defined enumeration value.
///
/// An absent or empty string is treated as the code zero, matching the
/// adapter's unset convention.
///
/// # Errors
///
/// - [`CodecError::InvalidFieldValue`] when `raw` is not an integer string
/// - [`CodecError::UnmappedEnum`] when the parsed integer is not a key of
///   `int_to_enum`
pub fn enum_from_string<E: Copy>(
    field: &str,
    raw: &str,
    int_to_enum: &BTreeMap<i64, E>,
) -> Result<E> {
    let code = parse_enum_code(field, raw)?;
    int_to_enum
        .get(&code)
        .copied()
        .ok_or_else(|| CodecError::UnmappedEnum {
            enum_name: short_type_name::<E>(),
            value: code.to_string(),
        })
}

/// Render a caller-defined enumeration value as its adapter integer string.
///
/// Returns `None` for the enumeration's explicit unspecified sentinel.
///
/// # Errors
///
/// [`CodecError::UnmappedEnum`], naming the symbolic variant, when the value
/// has no entry in `enum_to_int`.
pub fn string_from_enum<E: Ord + Copy + Debug>(
    value: E,
    enum_to_int: &BTreeMap<E, i64>,
    unspecified: E,
) -> Result<Option<String>> {
    if value == unspecified {
        return Ok(None);
    }
    match enum_to_int.get(&value) {
        Some(code) => Ok(Some(code.to_string())),
        None => Err(CodecError::UnmappedEnum {
            enum_name: short_type_name::<E>(),
            value: format!("{value:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_uses_exact_true_literal() {
        assert_eq!(
            assign(FieldKind::Bool, "active", "true", "").unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            assign(FieldKind::Bool, "active", "True", "").unwrap(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            assign(FieldKind::Bool, "active", "false", "").unwrap(),
            FieldValue::Bool(false)
        );
    }

    #[test]
    fn numeric_kinds_parse_their_raw_strings() {
        assert_eq!(
            assign(FieldKind::Int, "count", "42", "").unwrap(),
            FieldValue::Int(42)
        );
        assert_eq!(
            assign(FieldKind::Float, "score", "1.5", "").unwrap(),
            FieldValue::Float(1.5)
        );
        assert_eq!(
            assign(FieldKind::FormattedInt, "order", "7", "seven").unwrap(),
            FieldValue::FormattedInt(Formatted::new(7, "seven"))
        );
    }

    #[test]
    fn unparseable_numbers_name_the_field() {
        let err = assign(FieldKind::Int, "count", "many", "").unwrap_err();
        match err {
            CodecError::InvalidFieldValue { field, value } => {
                assert_eq!(field, "count");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn guid_keeps_raw_and_display_separate() {
        let value = assign(FieldKind::Guid, "owner", "abc-123", "Homer Simpson").unwrap();
        assert_eq!(
            value,
            FieldValue::Guid(Formatted::new("abc-123".to_string(), "Homer Simpson"))
        );
    }

    #[test]
    fn timestamp_parses_fixed_utc_format() {
        let value = assign(FieldKind::Timestamp, "created_on", "2009-02-13T23:31:30Z", "").unwrap();
        assert_eq!(value, FieldValue::Timestamp(Formatted::raw(1_234_567_890)));
    }

    #[test]
    fn timestamp_rejects_offsets_and_garbage() {
        assert!(assign(FieldKind::Timestamp, "created_on", "2009-02-13T23:31:30+01:00", "").is_err());
        assert!(assign(FieldKind::Timestamp, "created_on", "yesterday", "").is_err());
    }

    #[test]
    fn region_looks_up_the_closed_table() {
        let value = assign(FieldKind::Region, "region", "5", "Great Lakes").unwrap();
        assert_eq!(
            value,
            FieldValue::Region(Formatted::new(WorkRegion::GreatLakes, "Great Lakes"))
        );
    }

    #[test]
    fn unknown_region_code_names_the_offending_integer() {
        let err = assign(FieldKind::Region, "region", "99", "").unwrap_err();
        match err {
            CodecError::InvalidEnumValue { value, .. } => assert_eq!(value, 99),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_enum_string_means_unset() {
        assert_eq!(
            assign(FieldKind::Region, "region", "", "").unwrap(),
            FieldValue::Region(Formatted::new(WorkRegion::Unspecified, ""))
        );
    }

    #[test]
    fn creation_source_looks_up_the_closed_table() {
        let value = assign(FieldKind::CreationSource, "source", "100000011", "Service API").unwrap();
        assert_eq!(
            value,
            FieldValue::CreationSource(Formatted::new(CreationSource::ServiceApi, "Service API"))
        );
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum ContactStatus {
        Unspecified,
        Active,
        Dormant,
    }

    fn int_to_status() -> BTreeMap<i64, ContactStatus> {
        BTreeMap::from([
            (0, ContactStatus::Unspecified),
            (1, ContactStatus::Active),
            (2, ContactStatus::Dormant),
        ])
    }

    fn status_to_int() -> BTreeMap<ContactStatus, i64> {
        int_to_status().into_iter().map(|(k, v)| (v, k)).collect()
    }

    #[test]
    fn enum_from_string_parses_and_looks_up() {
        assert_eq!(
            enum_from_string("status", "2", &int_to_status()).unwrap(),
            ContactStatus::Dormant
        );
        // Absent values fall back to the zero code
        assert_eq!(
            enum_from_string("status", "", &int_to_status()).unwrap(),
            ContactStatus::Unspecified
        );
    }

    #[test]
    fn enum_from_string_rejects_garbage_and_unmapped_codes() {
        assert!(matches!(
            enum_from_string("status", "soon", &int_to_status()).unwrap_err(),
            CodecError::InvalidFieldValue { .. }
        ));
        let err = enum_from_string("status", "9", &int_to_status()).unwrap_err();
        match err {
            CodecError::UnmappedEnum { enum_name, value } => {
                assert_eq!(enum_name, "ContactStatus");
                assert_eq!(value, "9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn string_from_enum_maps_and_skips_unspecified() {
        assert_eq!(
            string_from_enum(
                ContactStatus::Active,
                &status_to_int(),
                ContactStatus::Unspecified,
            )
            .unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            string_from_enum(
                ContactStatus::Unspecified,
                &status_to_int(),
                ContactStatus::Unspecified,
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn string_from_enum_names_the_unmapped_variant() {
        let mut table = status_to_int();
        table.remove(&ContactStatus::Dormant);
        let err = string_from_enum(ContactStatus::Dormant, &table, ContactStatus::Unspecified)
            .unwrap_err();
        match err {
            CodecError::UnmappedEnum { enum_name, value } => {
                assert_eq!(enum_name, "ContactStatus");
                assert_eq!(value, "Dormant");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
