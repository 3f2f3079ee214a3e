//! Redaction of fields marked `#[sensitive]`.

use crate::error::ConvertResult;
use fieldbridge_types::{FieldKind, Record, ScalarKind, Value};

/// Marker written over sensitive string values.
pub const REDACTED: &str = "[REDACTED]";

/// Redacts every sensitive field of `record`, descending into nested
/// records. Returns the number of values replaced.
///
/// Strings become [`REDACTED`], bytes become empty, other scalars are reset
/// to zero. Absent optionals stay absent. A sensitive nested record is
/// cleared.
pub fn mask_sensitive(record: &mut dyn Record) -> ConvertResult<usize> {
    let descriptor = record.descriptor();
    let mut masked = 0;
    for field in descriptor.fields() {
        let index = field.index();
        let Some(current) = record.get_field(index) else {
            continue;
        };
        match (field.kind(), current) {
            (_, Value::Null) => {}
            (FieldKind::Unsupported(_), _) => {}
            (FieldKind::Scalar { kind, .. }, _) if field.is_sensitive() => {
                record.set_field(index, redacted(kind))?;
                masked += 1;
            }
            (FieldKind::ScalarList(kind), Value::List(items)) if field.is_sensitive() => {
                masked += items.len();
                let replaced = items.iter().map(|_| redacted(kind)).collect();
                record.set_field(index, Value::List(replaced))?;
            }
            (FieldKind::Record { .. } | FieldKind::RecordList(_), _) if field.is_sensitive() => {
                record.set_field(index, Value::Null)?;
                masked += 1;
            }
            (FieldKind::Record { .. }, Value::Record(mut nested)) => {
                let count = mask_sensitive(nested.as_mut())?;
                if count > 0 {
                    record.set_field(index, Value::Record(nested))?;
                    masked += count;
                }
            }
            (FieldKind::RecordList(_), Value::List(items)) => {
                let mut count = 0;
                let mut replaced = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Record(mut nested) => {
                            count += mask_sensitive(nested.as_mut())?;
                            replaced.push(Value::Record(nested));
                        }
                        other => replaced.push(other),
                    }
                }
                if count > 0 {
                    record.set_field(index, Value::List(replaced))?;
                    masked += count;
                }
            }
            _ => {}
        }
    }
    Ok(masked)
}

fn redacted(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::String => Value::String(REDACTED.to_string()),
        other => Value::zero(other),
    }
}
