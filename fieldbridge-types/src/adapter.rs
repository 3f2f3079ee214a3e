//! Glue between concrete Rust field types and [`Value`].
//!
//! [`FieldValue`] covers leaf types (scalars, optional scalars, scalar
//! lists, opaque unsupported kinds). [`FieldAdapter`] is what the
//! [`record!`](crate::record!) macro calls; its four implementors select how
//! a field is exposed: [`Scalar`] for any `FieldValue`, [`Nested`],
//! [`OptionalNested`] and [`NestedList`] for fields holding other records.

use crate::descriptor::TypeDescriptor;
use crate::kind::{FieldKind, ScalarKind, UnsupportedKind};
use crate::record::{downcast_record, DescribedRecord};
use crate::timestamp::WireTimestamp;
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Conversion between a concrete leaf field type and [`Value`].
///
/// `from_value` hands the value back on a shape mismatch so the caller can
/// report what it actually received.
pub trait FieldValue: Sized {
    fn field_kind() -> FieldKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Value>;
}

/// A leaf type with a fixed [`ScalarKind`]; gets `Option<T>` support for free.
pub trait ScalarField: FieldValue {
    const KIND: ScalarKind;
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_kind() -> FieldKind {
                    FieldKind::scalar(ScalarKind::$variant)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }

            impl ScalarField for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;
            }

            impl FieldValue for Vec<$ty> {
                fn field_kind() -> FieldKind {
                    FieldKind::ScalarList(ScalarKind::$variant)
                }

                fn to_value(&self) -> Value {
                    Value::List(self.iter().map(FieldValue::to_value).collect())
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Null => Ok(Vec::new()),
                        Value::List(items) => {
                            // Validate shapes first so a rejected list is returned intact.
                            if items.iter().any(|item| item.scalar_kind() != Some(ScalarKind::$variant)) {
                                return Err(Value::List(items));
                            }
                            items.into_iter().map(<$ty as FieldValue>::from_value).collect()
                        }
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    WireTimestamp => Timestamp,
    DateTime<Utc> => DateTime,
}

// Bytes are spelled `Vec<u8>`, so they cannot go through the list arm above.
impl FieldValue for Vec<u8> {
    fn field_kind() -> FieldKind {
        FieldKind::scalar(ScalarKind::Bytes)
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(other),
        }
    }
}

impl ScalarField for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Bytes;
}

impl<T: ScalarField> FieldValue for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::optional(T::KIND)
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// A function-valued field, e.g. a completion hook carried on a wire message.
///
/// Functions have no copy semantics, so the resolver always excludes them.
#[derive(Clone, Default)]
pub struct Callback(Option<Arc<dyn Fn() + Send + Sync>>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(f)))
    }

    /// Invokes the callback if one is set.
    pub fn call(&self) {
        if let Some(f) = &self.0 {
            f();
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_set() { "Callback(set)" } else { "Callback(unset)" })
    }
}

impl FieldValue for Callback {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Function)
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        Err(value)
    }
}

/// How a record field of type `T` is described and accessed.
pub trait FieldAdapter<T> {
    fn kind() -> FieldKind;

    fn get(field: &T) -> Value;

    fn set(field: &mut T, value: Value) -> Result<(), Value>;
}

/// Adapter for leaf fields implementing [`FieldValue`].
pub struct Scalar;

impl<T: FieldValue> FieldAdapter<T> for Scalar {
    fn kind() -> FieldKind {
        T::field_kind()
    }

    fn get(field: &T) -> Value {
        field.to_value()
    }

    fn set(field: &mut T, value: Value) -> Result<(), Value> {
        *field = T::from_value(value)?;
        Ok(())
    }
}

/// Adapter for a required nested record.
pub struct Nested;

impl<R: DescribedRecord> FieldAdapter<R> for Nested {
    fn kind() -> FieldKind {
        FieldKind::Record {
            descriptor: descriptor_of::<R>,
            optional: false,
        }
    }

    fn get(field: &R) -> Value {
        Value::Record(Box::new(field.clone()))
    }

    fn set(field: &mut R, value: Value) -> Result<(), Value> {
        *field = match value {
            Value::Null => R::default(),
            Value::Record(record) => downcast_record::<R>(record)?,
            other => return Err(other),
        };
        Ok(())
    }
}

/// Adapter for an `Option<R>` nested record.
pub struct OptionalNested;

impl<R: DescribedRecord> FieldAdapter<Option<R>> for OptionalNested {
    fn kind() -> FieldKind {
        FieldKind::Record {
            descriptor: descriptor_of::<R>,
            optional: true,
        }
    }

    fn get(field: &Option<R>) -> Value {
        match field {
            Some(record) => Value::Record(Box::new(record.clone())),
            None => Value::Null,
        }
    }

    fn set(field: &mut Option<R>, value: Value) -> Result<(), Value> {
        *field = match value {
            Value::Null => None,
            Value::Record(record) => Some(downcast_record::<R>(record)?),
            other => return Err(other),
        };
        Ok(())
    }
}

/// Adapter for a `Vec<R>` of nested records.
pub struct NestedList;

impl<R: DescribedRecord> FieldAdapter<Vec<R>> for NestedList {
    fn kind() -> FieldKind {
        FieldKind::RecordList(descriptor_of::<R>)
    }

    fn get(field: &Vec<R>) -> Value {
        Value::List(
            field
                .iter()
                .map(|record| Value::Record(Box::new(record.clone())))
                .collect(),
        )
    }

    fn set(field: &mut Vec<R>, value: Value) -> Result<(), Value> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::List(items) => items,
            other => return Err(other),
        };
        if items
            .iter()
            .any(|item| !matches!(item, Value::Record(record) if record.as_any().is::<R>()))
        {
            return Err(Value::List(items));
        }
        *field = items
            .into_iter()
            .map(|item| match item {
                Value::Record(record) => downcast_record::<R>(record),
                other => Err(other),
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

fn descriptor_of<R: DescribedRecord>() -> &'static TypeDescriptor {
    R::type_descriptor()
}
