//! Dynamic field values.

use crate::kind::ScalarKind;
use crate::record::{records_equal, Record};
use crate::timestamp::WireTimestamp;
use chrono::{DateTime, Utc};

/// A field value in flight between two records.
///
/// `Null` stands for an absent optional (scalar or record).
#[derive(Debug)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(WireTimestamp),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
    Record(Box<dyn Record>),
}

/// Intermediate numeric form used for checked conversions.
#[derive(Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Value {
    /// Zero value for a scalar kind (what an unset required field holds).
    #[must_use]
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(false),
            ScalarKind::I32 => Self::I32(0),
            ScalarKind::I64 => Self::I64(0),
            ScalarKind::U32 => Self::U32(0),
            ScalarKind::U64 => Self::U64(0),
            ScalarKind::F32 => Self::F32(0.0),
            ScalarKind::F64 => Self::F64(0.0),
            ScalarKind::String => Self::String(String::new()),
            ScalarKind::Bytes => Self::Bytes(Vec::new()),
            ScalarKind::Timestamp => Self::Timestamp(WireTimestamp::default()),
            ScalarKind::DateTime => Self::DateTime(DateTime::<Utc>::default()),
        }
    }

    /// Scalar kind of this value, or `None` for `Null`, lists and records.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Bool(_) => Some(ScalarKind::Bool),
            Self::I32(_) => Some(ScalarKind::I32),
            Self::I64(_) => Some(ScalarKind::I64),
            Self::U32(_) => Some(ScalarKind::U32),
            Self::U64(_) => Some(ScalarKind::U64),
            Self::F32(_) => Some(ScalarKind::F32),
            Self::F64(_) => Some(ScalarKind::F64),
            Self::String(_) => Some(ScalarKind::String),
            Self::Bytes(_) => Some(ScalarKind::Bytes),
            Self::Timestamp(_) => Some(ScalarKind::Timestamp),
            Self::DateTime(_) => Some(ScalarKind::DateTime),
            Self::Null | Self::List(_) | Self::Record(_) => None,
        }
    }

    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            other => match other.scalar_kind() {
                Some(kind) => kind.name(),
                None => "unknown",
            },
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts a scalar to `target`.
    ///
    /// Numeric conversions are checked: the result is `None` unless the
    /// value survives the conversion exactly. Wire timestamps and native
    /// date-times convert into each other. `Null` is passed through.
    #[must_use]
    pub fn coerce(self, target: ScalarKind) -> Option<Self> {
        if self.is_null() || self.scalar_kind() == Some(target) {
            return Some(self);
        }
        match (self, target) {
            (Self::Timestamp(ts), ScalarKind::DateTime) => ts.to_datetime().ok().map(Self::DateTime),
            (Self::DateTime(dt), ScalarKind::Timestamp) => {
                Some(Self::Timestamp(WireTimestamp::from_datetime(dt)))
            }
            (value, target) if target.is_numeric() => {
                let number = value.as_number()?;
                Self::from_number(number, target)
            }
            _ => None,
        }
    }

    fn as_number(&self) -> Option<Number> {
        match *self {
            Self::I32(v) => Some(Number::Int(i128::from(v))),
            Self::I64(v) => Some(Number::Int(i128::from(v))),
            Self::U32(v) => Some(Number::Int(i128::from(v))),
            Self::U64(v) => Some(Number::Int(i128::from(v))),
            Self::F32(v) => Some(Number::Float(f64::from(v))),
            Self::F64(v) => Some(Number::Float(v)),
            _ => None,
        }
    }

    fn from_number(number: Number, target: ScalarKind) -> Option<Self> {
        match target {
            ScalarKind::F64 => match number {
                Number::Float(f) => Some(Self::F64(f)),
                Number::Int(i) => {
                    let f = i as f64;
                    (f as i128 == i).then_some(Self::F64(f))
                }
            },
            ScalarKind::F32 => match number {
                Number::Float(f) => {
                    let narrowed = f as f32;
                    (f.is_nan() || f64::from(narrowed) == f).then_some(Self::F32(narrowed))
                }
                Number::Int(i) => {
                    let f = i as f32;
                    (f as i128 == i).then_some(Self::F32(f))
                }
            },
            _ => {
                let int = match number {
                    Number::Int(i) => i,
                    Number::Float(f) => {
                        if !f.is_finite() || f.fract() != 0.0 || f.abs() > 1e38 {
                            return None;
                        }
                        f as i128
                    }
                };
                match target {
                    ScalarKind::I32 => i32::try_from(int).ok().map(Self::I32),
                    ScalarKind::I64 => i64::try_from(int).ok().map(Self::I64),
                    ScalarKind::U32 => u32::try_from(int).ok().map(Self::U32),
                    ScalarKind::U64 => u64::try_from(int).ok().map(Self::U64),
                    _ => None,
                }
            }
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(v) => Self::Bool(*v),
            Self::I32(v) => Self::I32(*v),
            Self::I64(v) => Self::I64(*v),
            Self::U32(v) => Self::U32(*v),
            Self::U64(v) => Self::U64(*v),
            Self::F32(v) => Self::F32(*v),
            Self::F64(v) => Self::F64(*v),
            Self::String(v) => Self::String(v.clone()),
            Self::Bytes(v) => Self::Bytes(v.clone()),
            Self::Timestamp(v) => Self::Timestamp(*v),
            Self::DateTime(v) => Self::DateTime(*v),
            Self::List(items) => Self::List(items.clone()),
            Self::Record(record) => Self::Record(record.clone_record()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits() || a == b,
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits() || a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => records_equal(a.as_ref(), b.as_ref()),
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
    WireTimestamp => Timestamp,
    DateTime<Utc> => DateTime,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
