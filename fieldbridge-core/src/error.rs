//! Error types for the conversion engine.

use fieldbridge_types::{TypeError, UnsupportedKind};
use fieldbridge_validation::ValidationFailure;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while planning or running a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Same-named fields whose kinds cannot be copied (or a narrowing copy
    /// whose value did not fit). Aborts the call at that field.
    #[error("field '{field}': cannot copy {source_kind} into {target_kind}: {reason}")]
    FieldTypeMismatch {
        field: String,
        source_kind: String,
        target_kind: String,
        reason: String,
    },

    /// A field kind without copy semantics. Reported as a plan-build
    /// warning, never returned from a conversion call.
    #[error("field '{field}' has unsupported kind {kind} and is excluded")]
    UnsupportedKind { field: String, kind: UnsupportedKind },

    /// A registered validation rule rejected the converted record.
    #[error(transparent)]
    ValidationFailed(#[from] ValidationFailure),

    /// Source or destination record is absent.
    #[error("{side} record is absent")]
    NilInput { side: &'static str },

    /// The resolver could not classify a type pair. Cached permanently.
    #[error("cannot build conversion plan for {pair}: {reason}")]
    CacheBuildFailure { pair: String, reason: String },

    /// A list conversion failed at the given element.
    #[error("element {index}: {source}")]
    ListElement {
        index: usize,
        #[source]
        source: Box<ConvertError>,
    },

    /// Record accessor failure outside of a planned field copy.
    #[error("record access failed: {0}")]
    Access(#[from] TypeError),

    /// Invalid converter configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ConvertError {
    /// Prefixes the field path of a mismatch with its parent field, so
    /// nested failures read `address.zip` or `items[2].id`.
    #[must_use]
    pub fn in_field(self, parent: &str) -> Self {
        match self {
            Self::FieldTypeMismatch {
                field,
                source_kind,
                target_kind,
                reason,
            } => Self::FieldTypeMismatch {
                field: format!("{parent}.{field}"),
                source_kind,
                target_kind,
                reason,
            },
            other => other,
        }
    }

    /// Returns the failing field path for field-level errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldTypeMismatch { field, .. } | Self::UnsupportedKind { field, .. } => {
                Some(field)
            }
            Self::ValidationFailed(failure) => Some(&failure.field_name),
            Self::ListElement { source, .. } => source.field(),
            _ => None,
        }
    }
}
