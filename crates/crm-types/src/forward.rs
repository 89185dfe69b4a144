//! Forward conversion: domain field value → generic output scalar.
//!
//! Extraction unwraps a typed field into the scalar the adapter stores:
//! plain scalars pass through natively, wrapper kinds yield their raw value
//! and drop the display string, enumeration kinds yield their numeric code.
//!
//! Wrapper kinds with a zero/unset raw value extract to `Ok(None)` — absent,
//! not an error. Callers treat absence as "field is empty", which the engine
//! later maps to the adapter's empty-string deletion semantics. Note both
//! absence and a genuinely empty string collapse to the same empty payload
//! value; this is a known lossy spot in the wire convention, preserved as-is.

use crate::error::{CodecError, Result};
use bridge_core::{FieldKind, FieldValue, ScalarValue};
use chrono::DateTime;

/// Fixed wire format for timestamps, always UTC, no offsets.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format epoch seconds in the adapter's fixed UTC wire format.
pub fn format_timestamp(seconds: i64) -> Result<String> {
    let dt = DateTime::from_timestamp(seconds, 0).ok_or_else(|| CodecError::InvalidTimestamp {
        value: seconds.to_string(),
    })?;
    Ok(dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Extract a field's generic output scalar, dispatching on its declared
/// kind.
///
/// With `for_search` set, plain string values are wrapped in single quotes,
/// a convention the downstream query-string encoding requires.
///
/// # Errors
///
/// - [`CodecError::TypeMismatch`] when the declared kind does not match the
///   value's own variant
/// - [`CodecError::UnsupportedType`] for `Custom` kinds, which only the
///   codec's extension registry can handle
pub fn extract(
    value: &FieldValue,
    kind: FieldKind,
    for_search: bool,
) -> Result<Option<ScalarValue>> {
    let scalar = match (kind, value) {
        (FieldKind::Bool, FieldValue::Bool(b)) => Some(ScalarValue::Bool(*b)),

        (FieldKind::Str, FieldValue::Str(s)) => {
            let s = if for_search {
                format!("'{s}'")
            } else {
                s.clone()
            };
            Some(ScalarValue::Str(s))
        }

        (FieldKind::Int, FieldValue::Int(i)) => Some(ScalarValue::Int(*i)),

        (FieldKind::Float, FieldValue::Float(f)) => Some(ScalarValue::Float(*f)),

        // Guid wrapper: the raw value, empty string meaning unset
        (FieldKind::Guid, FieldValue::Guid(g)) => {
            if g.value.is_empty() {
                None
            } else {
                Some(ScalarValue::Str(g.value.clone()))
            }
        }

        // Integer wrapper: stringified raw value, zero meaning unset
        (FieldKind::FormattedInt, FieldValue::FormattedInt(i)) => {
            if i.value == 0 {
                None
            } else {
                Some(ScalarValue::Str(i.value.to_string()))
            }
        }

        (FieldKind::FormattedStr, FieldValue::FormattedStr(s)) => {
            Some(ScalarValue::Str(s.value.clone()))
        }

        // Timestamp wrapper: fixed UTC wire format, zero meaning unset
        (FieldKind::Timestamp, FieldValue::Timestamp(ts)) => {
            if ts.value == 0 {
                None
            } else {
                Some(ScalarValue::Str(format_timestamp(ts.value)?))
            }
        }

        // Region: stringified numeric code, unspecified meaning unset
        (FieldKind::Region, FieldValue::Region(r)) => {
            let code = r.value.code();
            if code == 0 {
                None
            } else {
                Some(ScalarValue::Str(code.to_string()))
            }
        }

        // Creation source: numeric code, unspecified meaning unset
        (FieldKind::CreationSource, FieldValue::CreationSource(s)) => {
            let code = s.value.code();
            if code == 0 {
                None
            } else {
                Some(ScalarValue::Int(code))
            }
        }

        (FieldKind::Custom(_), _) => return Err(CodecError::UnsupportedType { kind }),

        (expected, actual) => {
            return Err(CodecError::TypeMismatch {
                expected,
                actual: actual.kind(),
            })
        }
    };

    Ok(scalar)
}
