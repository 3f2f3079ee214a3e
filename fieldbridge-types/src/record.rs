use crate::descriptor::TypeDescriptor;
use crate::value::Value;
use crate::{TypeError, TypeResult};
use std::any::Any;
use std::fmt;

/// Index-based field access for a described record type.
///
/// Implementations are normally generated by [`record!`](crate::record!).
/// Field indexes follow the order of [`TypeDescriptor::fields`].
pub trait Record: fmt::Debug + Send + Sync + 'static {
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Reads the field at `index`, or `None` if the index is out of range.
    fn get_field(&self, index: usize) -> Option<Value>;

    /// Writes the field at `index`.
    fn set_field(&mut self, index: usize, value: Value) -> TypeResult<()>;

    fn clone_record(&self) -> Box<dyn Record>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Reads a field by name, resolving the name through the descriptor.
    fn get_by_name(&self, name: &str) -> Option<Value> {
        let field = self.descriptor().field(name)?;
        self.get_field(field.index())
    }

    /// Writes a field by name, resolving the name through the descriptor.
    fn set_by_name(&mut self, name: &str, value: Value) -> TypeResult<()> {
        let descriptor = self.descriptor();
        let field = descriptor
            .field(name)
            .ok_or_else(|| TypeError::UnknownField {
                record: descriptor.name(),
                field: name.to_string(),
            })?;
        self.set_field(field.index(), value)
    }
}

/// A [`Record`] whose descriptor is reachable without an instance.
pub trait DescribedRecord: Record + Default + Clone {
    fn type_descriptor() -> &'static TypeDescriptor;
}

/// Field-by-field equality across two dynamic records of the same type.
pub fn records_equal(a: &dyn Record, b: &dyn Record) -> bool {
    let descriptor = a.descriptor();
    if descriptor.type_id() != b.descriptor().type_id() {
        return false;
    }
    descriptor
        .fields()
        .iter()
        .all(|field| a.get_field(field.index()) == b.get_field(field.index()))
}

/// Downcasts a dynamic record into its concrete type.
///
/// Returns the record unchanged (as a [`Value`]) if the type does not match.
pub(crate) fn downcast_record<R: DescribedRecord>(record: Box<dyn Record>) -> Result<R, Value> {
    if !record.as_any().is::<R>() {
        return Err(Value::Record(record));
    }
    record
        .into_any()
        .downcast::<R>()
        .map(|boxed| *boxed)
        .map_err(|_| Value::Null)
}
