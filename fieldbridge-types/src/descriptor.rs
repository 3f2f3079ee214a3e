use crate::kind::{FieldKind, ScalarKind, UnsupportedKind};
use crate::record::Record;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::any::TypeId;
use std::fmt;

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    index: usize,
    kind: FieldKind,
    sensitive: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor; the index is assigned by [`TypeDescriptor::new`].
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind, sensitive: bool) -> Self {
        Self {
            name,
            index: 0,
            kind,
            sensitive,
        }
    }

    /// Shorthand for a required scalar field.
    #[must_use]
    pub const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::scalar(kind), false)
    }

    /// Shorthand for an optional scalar field.
    #[must_use]
    pub const fn optional(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::optional(kind), false)
    }

    /// Shorthand for a field without copy semantics.
    #[must_use]
    pub const fn unsupported(name: &'static str, kind: UnsupportedKind) -> Self {
        Self::new(name, FieldKind::Unsupported(kind), false)
    }

    /// Marks the field for redaction when masking is enabled.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Position of the field in declaration order.
    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldDescriptor", 4)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("kind", &self.kind.to_string())?;
        state.serialize_field("sensitive", &self.sensitive)?;
        state.end()
    }
}

/// Static description of a record type: its declared name, Rust type
/// identity, ordered fields, and a constructor for empty instances.
///
/// Descriptors are built once per type and live for the whole process.
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDescriptor>,
    new_instance: fn() -> Box<dyn Record>,
}

impl TypeDescriptor {
    /// Creates a descriptor, assigning field indexes in the given order.
    #[must_use]
    pub fn new(
        name: &'static str,
        type_id: TypeId,
        fields: Vec<FieldDescriptor>,
        new_instance: fn() -> Box<dyn Record>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| FieldDescriptor { index, ..field })
            .collect();
        Self {
            name,
            type_id,
            fields,
            new_instance,
        }
    }

    /// Declared type name, used as the validation registry key.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by exact, case-sensitive name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Returns the first field name declared more than once, if any.
    pub fn duplicate_field(&self) -> Option<&'static str> {
        self.fields.iter().enumerate().find_map(|(i, field)| {
            self.fields[..i]
                .iter()
                .any(|earlier| earlier.name == field.name)
                .then_some(field.name)
        })
    }

    /// Creates a default-initialized instance of the described type.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Record> {
        (self.new_instance)()
    }

    /// JSON view of the descriptor, for diagnostics endpoints.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypeDescriptor", 2)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("fields", &self.fields)?;
        state.end()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}
