//! Error types for value conversions.
//!
//! All unexpected cases return explicit errors; no conversion silently falls
//! back to a default value. The one deliberate non-error is the zero/unset
//! sentinel of the wrapper kinds, which extraction reports as an absent value
//! rather than a failure.

use bridge_core::FieldKind;
use thiserror::Error;

/// Errors that can occur during value conversions.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No conversion is registered for a field's type tag.
    #[error("No value conversion is registered for field kind '{kind}'")]
    UnsupportedType { kind: FieldKind },

    /// An integer has no entry in a closed enumeration table.
    #[error("Invalid {kind} value: {value} does not correspond to an enumerated value")]
    InvalidEnumValue { kind: FieldKind, value: i64 },

    /// An enumeration value is not mapped to an adapter code, or an adapter
    /// code is not mapped to an enumeration value.
    #[error("{enum_name} value {value} is not mapped to an adapter value")]
    UnmappedEnum { enum_name: String, value: String },

    /// A value expected to be an integer string is not parseable.
    #[error("Invalid value for field '{field}': expected a string representation of a number, got '{value}'")]
    InvalidFieldValue { field: String, value: String },

    /// A timestamp string does not match the fixed UTC wire format, or an
    /// epoch value is out of the representable range.
    #[error("Invalid timestamp '{value}': expected YYYY-MM-DDTHH:MM:SSZ in UTC")]
    InvalidTimestamp { value: String },

    /// A field's declared kind does not match the value it holds.
    #[error("Type mismatch: expected a {expected} value, got {actual}")]
    TypeMismatch { expected: FieldKind, actual: FieldKind },
}

/// Result type for value conversions.
pub type Result<T> = std::result::Result<T, CodecError>;
