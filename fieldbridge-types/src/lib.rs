//! Record description types for fieldbridge.
//!
//! Rust has no runtime reflection, so every record that takes part in a
//! conversion describes itself once through a static [`TypeDescriptor`]
//! and exposes index-based accessors through the [`Record`] trait:
//! - [`Value`]: the dynamic value that flows between accessors
//! - [`ScalarKind`] / [`FieldKind`]: the shape of a single field
//! - [`TypeDescriptor`] / [`FieldDescriptor`]: the ordered field table
//! - [`FieldValue`] / [`FieldAdapter`]: glue between concrete Rust field
//!   types and [`Value`]
//! - [`WireTimestamp`]: the `{seconds, nanos}` timestamp found in wire messages
//! - [`record!`]: declares a struct together with its `Record` impl
//!
//! Nothing in this crate knows about wire vs. model; that pairing lives in
//! `fieldbridge-core`.

mod adapter;
mod descriptor;
mod kind;
mod macros;
mod record;
mod timestamp;
mod value;

pub use adapter::{
    Callback, FieldAdapter, FieldValue, Nested, NestedList, OptionalNested, Scalar, ScalarField,
};
pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use kind::{FieldKind, ScalarKind, UnsupportedKind};
pub use record::{DescribedRecord, Record, records_equal};
pub use timestamp::WireTimestamp;
pub use value::Value;

/// Result type alias using the crate's error type.
pub type TypeResult<T> = std::result::Result<T, TypeError>;

/// Errors raised by record accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("{record}.{field}: expected {expected}, got {actual}")]
    InvalidValue {
        record: &'static str,
        field: &'static str,
        expected: String,
        actual: &'static str,
    },

    #[error("{record}: no field at index {index}")]
    FieldIndexOutOfRange { record: &'static str, index: usize },

    #[error("{record}: unknown field '{field}'")]
    UnknownField { record: &'static str, field: String },

    #[error("timestamp out of range: {seconds}s {nanos}ns")]
    TimestampOutOfRange { seconds: i64, nanos: i32 },
}
