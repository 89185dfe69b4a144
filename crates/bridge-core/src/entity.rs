//! Typed field model for domain records.
//!
//! This module defines `FieldKind`, the closed type-tag universe for domain
//! record fields, and `FieldValue`, the value a field of each kind carries.
//! Formatted wrapper kinds pair a raw value with a human-readable display
//! string that the downstream adapter returns alongside the raw value.
//!
//! The `DomainRecord` trait gives the translation engine named-field access
//! to a caller-owned record type without knowing its concrete shape. The
//! engine never restructures a record; it only reads and replaces fields
//! wholesale.

use std::fmt;

/// Closed type-tag enumeration for domain record fields.
///
/// Every field of a domain record declares exactly one kind. The value codec
/// dispatches on this tag; unknown `Custom` tags without a registered handler
/// are rejected at first use rather than silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Plain boolean
    Bool,

    /// Plain UTF-8 string
    Str,

    /// Plain 64-bit signed integer
    Int,

    /// Plain 64-bit float
    Float,

    /// Guid wrapper (string raw value + display string)
    Guid,

    /// Integer wrapper (i64 raw value + display string)
    FormattedInt,

    /// String wrapper (string raw value + display string)
    FormattedStr,

    /// Timestamp wrapper (epoch seconds + display string)
    Timestamp,

    /// Closed work-region enumeration
    Region,

    /// Closed creation-source enumeration
    CreationSource,

    /// Caller-registered extension kind, resolved through the codec's
    /// extension registry
    Custom(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Str => write!(f, "str"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Guid => write!(f, "guid"),
            Self::FormattedInt => write!(f, "formatted_int"),
            Self::FormattedStr => write!(f, "formatted_str"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Region => write!(f, "region"),
            Self::CreationSource => write!(f, "creation_source"),
            Self::Custom(tag) => write!(f, "custom({tag})"),
        }
    }
}

/// A raw value paired with its human-readable display string.
///
/// The display string is carried for the caller's benefit only; the forward
/// conversion discards it and the reverse conversion stores whatever the
/// adapter returned in its formatted-value counterpart pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formatted<T> {
    /// The raw value
    pub value: T,

    /// The display string returned by the adapter
    pub display: String,
}

impl<T> Formatted<T> {
    /// Create a formatted value with a display string.
    pub fn new(value: T, display: impl Into<String>) -> Self {
        Self {
            value,
            display: display.into(),
        }
    }

    /// Create a formatted value with an empty display string.
    pub fn raw(value: T) -> Self {
        Self {
            value,
            display: String::new(),
        }
    }
}

/// A caller-defined enumeration value resolved through the codec's
/// extension registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    /// The registered extension kind tag
    pub kind: &'static str,

    /// The numeric enumeration code (zero means unset)
    pub code: i64,

    /// The display string returned by the adapter
    pub display: String,
}

/// One domain record field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain boolean
    Bool(bool),

    /// Plain string
    Str(String),

    /// Plain integer
    Int(i64),

    /// Plain float
    Float(f64),

    /// Guid wrapper; an empty raw value means unset
    Guid(Formatted<String>),

    /// Integer wrapper; a zero raw value means unset
    FormattedInt(Formatted<i64>),

    /// String wrapper
    FormattedStr(Formatted<String>),

    /// Timestamp wrapper holding epoch seconds; zero means unset
    Timestamp(Formatted<i64>),

    /// Closed work-region enumeration; `WorkRegion::Unspecified` means unset
    Region(Formatted<WorkRegion>),

    /// Closed creation-source enumeration; `CreationSource::Unspecified`
    /// means unset
    CreationSource(Formatted<CreationSource>),

    /// Caller-defined enumeration; a zero code means unset
    Custom(CustomValue),
}

impl FieldValue {
    /// The type tag this value carries.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Str(_) => FieldKind::Str,
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Guid(_) => FieldKind::Guid,
            Self::FormattedInt(_) => FieldKind::FormattedInt,
            Self::FormattedStr(_) => FieldKind::FormattedStr,
            Self::Timestamp(_) => FieldKind::Timestamp,
            Self::Region(_) => FieldKind::Region,
            Self::CreationSource(_) => FieldKind::CreationSource,
            Self::Custom(c) => FieldKind::Custom(c.kind),
        }
    }

    /// Shorthand for a plain string value.
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Shorthand for a guid wrapper without a display string.
    pub fn guid(value: impl Into<String>) -> Self {
        Self::Guid(Formatted::raw(value.into()))
    }

    /// Shorthand for a timestamp wrapper from epoch seconds.
    pub fn timestamp(seconds: i64) -> Self {
        Self::Timestamp(Formatted::raw(seconds))
    }
}

/// Closed work-region enumeration.
///
/// Codes are fixed by the downstream adapter and must not be renumbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkRegion {
    /// Region not set
    #[default]
    Unspecified = 0,
    Northeast = 1,
    MidAtlantic = 2,
    Southeast = 3,
    Midwest = 4,
    GreatLakes = 5,
    GulfCoast = 6,
    Plains = 7,
    RockyMountain = 8,
    Southwest = 9,
    PacificNorthwest = 10,
    California = 11,
    National = 12,
    International = 13,
}

impl WorkRegion {
    /// The adapter's numeric code for this region.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Look up a region by its adapter code.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Unspecified,
            1 => Self::Northeast,
            2 => Self::MidAtlantic,
            3 => Self::Southeast,
            4 => Self::Midwest,
            5 => Self::GreatLakes,
            6 => Self::GulfCoast,
            7 => Self::Plains,
            8 => Self::RockyMountain,
            9 => Self::Southwest,
            10 => Self::PacificNorthwest,
            11 => Self::California,
            12 => Self::National,
            13 => Self::International,
            _ => return None,
        })
    }
}

/// Closed creation-source enumeration.
///
/// The adapter encodes the channel a record was created through as a large
/// numeric option-set value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CreationSource {
    /// Source not set
    #[default]
    Unspecified = 0,

    /// Record created through this service's API
    ServiceApi = 100_000_011,
}

impl CreationSource {
    /// The adapter's numeric code for this source.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Look up a source by its adapter code.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Unspecified,
            100_000_011 => Self::ServiceApi,
            _ => return None,
        })
    }
}

/// Named-field access to a caller-owned domain record.
///
/// The translation engine reads and writes fields by name only; the concrete
/// record type stays with the calling service. A fresh `Default` instance
/// must expose every mapped field so the engine can resolve field kinds
/// without a populated record.
pub trait DomainRecord: Default + Clone {
    /// Read a named field. `None` when the record has no such field.
    ///
    /// Implementors with native typed fields build the `FieldValue` on the
    /// fly; the engine only ever inspects it transiently.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Replace a named field wholesale. Returns `false` when the record has
    /// no such field.
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;

    /// The declared kind of a named field.
    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|value| value.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_reports_its_kind() {
        assert_eq!(FieldValue::Bool(true).kind(), FieldKind::Bool);
        assert_eq!(FieldValue::str("x").kind(), FieldKind::Str);
        assert_eq!(FieldValue::guid("abc").kind(), FieldKind::Guid);
        assert_eq!(FieldValue::timestamp(5).kind(), FieldKind::Timestamp);
        assert_eq!(
            FieldValue::Region(Formatted::raw(WorkRegion::Midwest)).kind(),
            FieldKind::Region
        );
        assert_eq!(
            FieldValue::Custom(CustomValue {
                kind: "contact_status",
                code: 2,
                display: String::new(),
            })
            .kind(),
            FieldKind::Custom("contact_status")
        );
    }

    #[test]
    fn work_region_codes_round_trip() {
        for code in 0..=13 {
            let region = WorkRegion::from_code(code).unwrap();
            assert_eq!(region.code(), code);
        }
        assert_eq!(WorkRegion::from_code(99), None);
    }

    #[test]
    fn creation_source_codes_round_trip() {
        assert_eq!(
            CreationSource::from_code(100_000_011),
            Some(CreationSource::ServiceApi)
        );
        assert_eq!(CreationSource::ServiceApi.code(), 100_000_011);
        assert_eq!(CreationSource::from_code(7), None);
    }

    #[test]
    fn field_kind_display_names() {
        assert_eq!(FieldKind::Timestamp.to_string(), "timestamp");
        assert_eq!(FieldKind::Custom("status").to_string(), "custom(status)");
    }
}
