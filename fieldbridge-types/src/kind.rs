use crate::descriptor::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive shape of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    /// Wire `{seconds, nanos}` timestamp.
    Timestamp,
    /// Native `chrono::DateTime<Utc>`.
    DateTime,
}

impl ScalarKind {
    /// Returns true for the integer and floating-point kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I32 | Self::I64 | Self::U32 | Self::U64 | Self::F32 | Self::F64
        )
    }

    /// Returns true for the two time representations.
    #[must_use]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Timestamp | Self::DateTime)
    }

    /// Returns true if every value of `self` is exactly representable as `to`.
    #[must_use]
    pub const fn widens_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::I32, Self::I64)
                | (Self::I32, Self::F64)
                | (Self::U32, Self::U64)
                | (Self::U32, Self::I64)
                | (Self::U32, Self::F64)
                | (Self::F32, Self::F64)
        )
    }

    /// Short Rust-flavoured name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field kinds that have no copy semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedKind {
    Function,
    Channel,
    Union,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::Channel => "channel",
            Self::Union => "union",
        };
        f.write_str(name)
    }
}

/// Shape of a single record field.
///
/// Nested descriptors are referenced through function pointers so that
/// self-referential record types can be described without initializing
/// their descriptor recursively.
#[derive(Clone, Copy)]
pub enum FieldKind {
    Scalar { kind: ScalarKind, optional: bool },
    ScalarList(ScalarKind),
    Record {
        descriptor: fn() -> &'static TypeDescriptor,
        optional: bool,
    },
    RecordList(fn() -> &'static TypeDescriptor),
    Unsupported(UnsupportedKind),
}

impl FieldKind {
    /// Shorthand for a required scalar.
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar {
            kind,
            optional: false,
        }
    }

    /// Shorthand for an optional scalar.
    #[must_use]
    pub const fn optional(kind: ScalarKind) -> Self {
        Self::Scalar {
            kind,
            optional: true,
        }
    }

    /// Returns the unsupported kind, if this field has no copy semantics.
    #[must_use]
    pub const fn unsupported(&self) -> Option<UnsupportedKind> {
        match self {
            Self::Unsupported(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the nested record descriptor for record and record-list fields.
    #[must_use]
    pub fn nested_descriptor(&self) -> Option<&'static TypeDescriptor> {
        match self {
            Self::Record { descriptor, .. } | Self::RecordList(descriptor) => Some(descriptor()),
            _ => None,
        }
    }
}

impl PartialEq for FieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Scalar { kind, optional },
                Self::Scalar {
                    kind: other_kind,
                    optional: other_optional,
                },
            ) => kind == other_kind && optional == other_optional,
            (Self::ScalarList(a), Self::ScalarList(b)) => a == b,
            (
                Self::Record {
                    descriptor,
                    optional,
                },
                Self::Record {
                    descriptor: other_descriptor,
                    optional: other_optional,
                },
            ) => {
                optional == other_optional
                    && descriptor().type_id() == other_descriptor().type_id()
            }
            (Self::RecordList(a), Self::RecordList(b)) => a().type_id() == b().type_id(),
            (Self::Unsupported(a), Self::Unsupported(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldKind {}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar {
                kind,
                optional: false,
            } => write!(f, "{kind}"),
            Self::Scalar {
                kind,
                optional: true,
            } => write!(f, "optional {kind}"),
            Self::ScalarList(kind) => write!(f, "list of {kind}"),
            Self::Record {
                descriptor,
                optional: false,
            } => write!(f, "record {}", descriptor().name()),
            Self::Record {
                descriptor,
                optional: true,
            } => write!(f, "optional record {}", descriptor().name()),
            Self::RecordList(descriptor) => write!(f, "list of record {}", descriptor().name()),
            Self::Unsupported(kind) => write!(f, "unsupported {kind}"),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldKind({self})")
    }
}
