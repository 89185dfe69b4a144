//! Value conversions between domain field values and the generic CRM record
//! encoding.
//!
//! This crate is the value codec of the bridge: bidirectional, per-kind
//! conversions between a field's native representation and the adapter's
//! string/scalar representation.
//!
//! # Modules
//!
//! - [`forward`] - domain field value → generic output scalar
//! - [`reverse`] - adapter raw string → domain field value, plus the generic
//!   enumeration helpers
//! - [`codec`] - the dispatching `ValueCodec` and its extension registry
//! - [`error`] - error types for conversion failures
//!
//! # Key Design Principles
//!
//! 1. **No silent fallbacks** - unexpected cases return explicit errors
//! 2. **Closed dispatch** - conversions are keyed by the closed `FieldKind`
//!    enumeration, not runtime reflection; custom kinds go through an
//!    explicit registry
//! 3. **Absent is not an error** - wrapper kinds with a zero/unset raw value
//!    extract to `Ok(None)`, which callers map to the adapter's empty-string
//!    deletion semantics

pub mod codec;
pub mod error;
pub mod forward;
pub mod reverse;

pub use codec::{CodecExtensions, ExtensionCodec, ValueCodec};
pub use error::{CodecError, Result};
pub use forward::{extract, format_timestamp, TIMESTAMP_FORMAT};
pub use reverse::{assign, enum_from_string, parse_timestamp, string_from_enum};
