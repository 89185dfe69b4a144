//! The value codec: built-in kind dispatch plus an extension registry.
//!
//! The built-in kinds cover the closed `FieldKind` universe. Entity kinds
//! whose enumerations live in the calling service register `Custom` handlers
//! here instead of subclassing anything; one shared codec instance then
//! serves every conversion for that entity kind.

use crate::error::{CodecError, Result};
use crate::{forward, reverse};
use bridge_core::{CustomValue, FieldKind, FieldValue, ScalarValue};
use std::collections::HashMap;

/// Extraction half of a custom kind handler.
pub type ExtractFn = Box<dyn Fn(&FieldValue, bool) -> Result<Option<ScalarValue>> + Send + Sync>;

/// Assignment half of a custom kind handler.
pub type AssignFn = Box<dyn Fn(&str, &str, &str) -> Result<FieldValue> + Send + Sync>;

/// A registered handler pair for one custom field kind.
pub struct ExtensionCodec {
    /// Field value → generic output scalar
    pub extract: ExtractFn,

    /// `(field, raw, display)` → field value
    pub assign: AssignFn,
}

impl ExtensionCodec {
    /// Handler for a caller-defined closed enumeration carried as a
    /// [`CustomValue`]: codes extract as integer strings (zero meaning
    /// unset) and assign by membership in the given code set.
    pub fn closed_enum(kind: &'static str, codes: Vec<i64>) -> Self {
        let extract_codes = codes.clone();
        Self {
            extract: Box::new(move |value, _for_search| match value {
                FieldValue::Custom(c) if c.kind == kind => {
                    if c.code == 0 {
                        Ok(None)
                    } else if extract_codes.contains(&c.code) {
                        Ok(Some(ScalarValue::Str(c.code.to_string())))
                    } else {
                        Err(CodecError::InvalidEnumValue {
                            kind: FieldKind::Custom(kind),
                            value: c.code,
                        })
                    }
                }
                other => Err(CodecError::TypeMismatch {
                    expected: FieldKind::Custom(kind),
                    actual: other.kind(),
                }),
            }),
            assign: {
                let table: std::collections::BTreeMap<i64, i64> =
                    codes.iter().map(|c| (*c, *c)).chain([(0, 0)]).collect();
                Box::new(move |field, raw, display| {
                    let code = reverse::enum_from_string(field, raw, &table)?;
                    Ok(FieldValue::Custom(CustomValue {
                        kind,
                        code,
                        display: display.to_string(),
                    }))
                })
            },
        }
    }
}

/// Registry of custom kind handlers, bundled into an entity kind's codec.
#[derive(Default)]
pub struct CodecExtensions {
    handlers: HashMap<&'static str, ExtensionCodec>,
}

impl CodecExtensions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a custom kind, replacing any previous one.
    pub fn register(&mut self, kind: &'static str, codec: ExtensionCodec) -> &mut Self {
        self.handlers.insert(kind, codec);
        self
    }

    fn get(&self, kind: &'static str) -> Option<&ExtensionCodec> {
        self.handlers.get(kind)
    }
}

/// Bidirectional converter for one entity kind's field values.
#[derive(Default)]
pub struct ValueCodec {
    extensions: CodecExtensions,
}

impl ValueCodec {
    /// A codec with only the built-in kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec with caller-registered custom kind handlers.
    pub fn with_extensions(extensions: CodecExtensions) -> Self {
        Self { extensions }
    }

    /// Extract a field's generic output scalar. See [`forward::extract`];
    /// `Custom` kinds resolve through the extension registry and fail with
    /// [`CodecError::UnsupportedType`] when unregistered.
    pub fn extract(
        &self,
        value: &FieldValue,
        kind: FieldKind,
        for_search: bool,
    ) -> Result<Option<ScalarValue>> {
        match kind {
            FieldKind::Custom(tag) => {
                let handler = self
                    .extensions
                    .get(tag)
                    .ok_or(CodecError::UnsupportedType { kind })?;
                (handler.extract)(value, for_search)
            }
            _ => forward::extract(value, kind, for_search),
        }
    }

    /// Construct a field value from the adapter's raw string and display
    /// counterpart. See [`reverse::assign`]; `Custom` kinds resolve through
    /// the extension registry.
    pub fn assign(
        &self,
        kind: FieldKind,
        field: &str,
        raw: &str,
        display: &str,
    ) -> Result<FieldValue> {
        match kind {
            FieldKind::Custom(tag) => {
                let handler = self
                    .extensions
                    .get(tag)
                    .ok_or(CodecError::UnsupportedType { kind })?;
                (handler.assign)(field, raw, display)
            }
            _ => reverse::assign(kind, field, raw, display),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "contact_status";

    fn codec_with_status() -> ValueCodec {
        let mut extensions = CodecExtensions::new();
        extensions.register(STATUS, ExtensionCodec::closed_enum(STATUS, vec![1, 2]));
        ValueCodec::with_extensions(extensions)
    }

    fn status(code: i64) -> FieldValue {
        FieldValue::Custom(CustomValue {
            kind: STATUS,
            code,
            display: String::new(),
        })
    }

    #[test]
    fn builtin_kinds_dispatch_without_extensions() {
        let codec = ValueCodec::new();
        assert_eq!(
            codec
                .extract(&FieldValue::str("x"), FieldKind::Str, false)
                .unwrap(),
            Some(ScalarValue::Str("x".into()))
        );
    }

    #[test]
    fn unregistered_custom_kind_fails_at_first_use() {
        let codec = ValueCodec::new();
        assert!(matches!(
            codec
                .extract(&status(1), FieldKind::Custom(STATUS), false)
                .unwrap_err(),
            CodecError::UnsupportedType { .. }
        ));
        assert!(matches!(
            codec
                .assign(FieldKind::Custom(STATUS), "status", "1", "")
                .unwrap_err(),
            CodecError::UnsupportedType { .. }
        ));
    }

    #[test]
    fn registered_closed_enum_round_trips() {
        let codec = codec_with_status();
        assert_eq!(
            codec
                .extract(&status(2), FieldKind::Custom(STATUS), false)
                .unwrap(),
            Some(ScalarValue::Str("2".into()))
        );
        let value = codec
            .assign(FieldKind::Custom(STATUS), "status", "2", "Dormant")
            .unwrap();
        match value {
            FieldValue::Custom(c) => {
                assert_eq!(c.code, 2);
                assert_eq!(c.display, "Dormant");
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn custom_zero_code_extracts_to_absent() {
        let codec = codec_with_status();
        assert_eq!(
            codec
                .extract(&status(0), FieldKind::Custom(STATUS), false)
                .unwrap(),
            None
        );
    }

    #[test]
    fn custom_unmapped_code_is_rejected_on_assign() {
        let codec = codec_with_status();
        assert!(matches!(
            codec
                .assign(FieldKind::Custom(STATUS), "status", "9", "")
                .unwrap_err(),
            CodecError::UnmappedEnum { .. }
        ));
    }
}
