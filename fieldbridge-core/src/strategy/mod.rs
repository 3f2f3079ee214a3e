//! Conversion strategies.
//!
//! All three tiers share one field-copy routine ([`transform`]) and differ
//! only in how they obtain the plan and reach the fields:
//! - [`NaiveStrategy`] resolves on every call and accesses fields by name
//! - [`CachedStrategy`] resolves once per key and accesses fields by name
//! - [`CompiledStrategy`] reuses the cached plan and runs per-field closures
//!   bound to field indexes

mod cached;
mod compiled;
mod naive;

pub use cached::CachedStrategy;
pub use compiled::{CompiledPlan, CompiledStrategy};
pub use naive::NaiveStrategy;

use crate::error::{ConvertError, ConvertResult};
use crate::plan::{
    Compatibility, ConversionPlan, Direction, FieldMapping, PlanKey, Presence, ScalarConversion,
};
use fieldbridge_types::{FieldKind, Record, TypeError, Value};

/// Conversion capability.
///
/// Validation registration is a separate capability
/// ([`RuleRegistration`](fieldbridge_validation::RuleRegistration)); no
/// strategy implements it.
pub trait ConversionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Copies every planned field of `src` into `dst`.
    ///
    /// Stops at the first failing field. Fields written before it stay
    /// written.
    fn run_plan(&self, key: PlanKey, src: &dyn Record, dst: &mut dyn Record)
        -> ConvertResult<()>;

    /// Converts `src` into `dst` in `direction`.
    ///
    /// Returns [`ConvertError::NilInput`] if either side is absent.
    fn convert(
        &self,
        src: Option<&dyn Record>,
        dst: Option<&mut dyn Record>,
        direction: Direction,
    ) -> ConvertResult<()> {
        let src = src.ok_or(ConvertError::NilInput { side: "source" })?;
        let dst = dst.ok_or(ConvertError::NilInput {
            side: "destination",
        })?;
        let key = PlanKey::new(src.descriptor(), dst.descriptor(), direction);
        self.run_plan(key, src, dst)
    }
}

/// Replays `plan` through the name-based accessors.
pub(crate) fn replay(
    plan: &ConversionPlan,
    src: &dyn Record,
    dst: &mut dyn Record,
    runner: &dyn ConversionStrategy,
) -> ConvertResult<()> {
    for mapping in plan.mappings() {
        let value = src
            .get_by_name(mapping.name)
            .ok_or_else(|| missing_field(mapping, src))?;
        let value = transform(mapping, value, runner)?;
        dst.set_by_name(mapping.name, value)
            .map_err(|err| write_error(mapping, err))?;
    }
    Ok(())
}

/// Applies the copy semantics of `mapping` to one source value.
///
/// Nested records are converted with `runner`, so a nested field uses the
/// same tier as its parent.
pub(crate) fn transform(
    mapping: &FieldMapping,
    value: Value,
    runner: &dyn ConversionStrategy,
) -> ConvertResult<Value> {
    match &mapping.compatibility {
        Compatibility::Scalar {
            conversion,
            presence,
        } => convert_scalar(mapping, value, *conversion, *presence),
        Compatibility::ScalarList(conversion) => match value {
            Value::Null => Ok(Value::List(Vec::new())),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    coerce(item, *conversion).ok_or_else(|| {
                        mismatch_at(
                            mapping,
                            format!("{}[{index}]", mapping.name),
                            out_of_range(*conversion),
                        )
                    })
                })
                .collect::<ConvertResult<Vec<_>>>()
                .map(Value::List),
            other => Err(unexpected_shape(mapping, &other)),
        },
        Compatibility::Nested(key) => match value {
            Value::Null => Ok(Value::Null),
            Value::Record(record) => {
                convert_nested(*key, record.as_ref(), runner).map_err(|err| err.in_field(mapping.name))
            }
            other => Err(unexpected_shape(mapping, &other)),
        },
        Compatibility::NestedList(key) => match value {
            Value::Null => Ok(Value::List(Vec::new())),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Record(record) => convert_nested(*key, record.as_ref(), runner)
                        .map_err(|err| err.in_field(&format!("{}[{index}]", mapping.name))),
                    other => Err(unexpected_shape(mapping, &other)),
                })
                .collect::<ConvertResult<Vec<_>>>()
                .map(Value::List),
            other => Err(unexpected_shape(mapping, &other)),
        },
        Compatibility::Incompatible { reason } => Err(mismatch(mapping, reason.clone())),
    }
}

fn convert_scalar(
    mapping: &FieldMapping,
    value: Value,
    conversion: ScalarConversion,
    presence: Presence,
) -> ConvertResult<Value> {
    if value.is_null() {
        return Ok(match (presence, mapping.target_kind) {
            (Presence::Unwrap, FieldKind::Scalar { kind, .. }) => Value::zero(kind),
            _ => Value::Null,
        });
    }
    // Wrapping needs no work: a present optional is carried as its bare value.
    coerce(value, conversion).ok_or_else(|| mismatch(mapping, out_of_range(conversion)))
}

fn coerce(value: Value, conversion: ScalarConversion) -> Option<Value> {
    match conversion {
        ScalarConversion::Identity => Some(value),
        ScalarConversion::Widen { to, .. }
        | ScalarConversion::Narrow { to, .. }
        | ScalarConversion::TimeCodec { to, .. } => value.coerce(to),
    }
}

fn convert_nested(
    key: PlanKey,
    src: &dyn Record,
    runner: &dyn ConversionStrategy,
) -> ConvertResult<Value> {
    let mut dst = key.target().instantiate();
    runner.run_plan(key, src, dst.as_mut())?;
    Ok(Value::Record(dst))
}

fn out_of_range(conversion: ScalarConversion) -> String {
    match conversion {
        ScalarConversion::TimeCodec { .. } => "timestamp is outside the supported range".to_string(),
        ScalarConversion::Widen { to, .. } | ScalarConversion::Narrow { to, .. } => {
            format!("value does not fit in {to}")
        }
        ScalarConversion::Identity => "value has the wrong shape".to_string(),
    }
}

fn unexpected_shape(mapping: &FieldMapping, value: &Value) -> ConvertError {
    mismatch(
        mapping,
        format!("source produced a {} value", value.type_name()),
    )
}

pub(crate) fn mismatch(mapping: &FieldMapping, reason: String) -> ConvertError {
    mismatch_at(mapping, mapping.name.to_string(), reason)
}

fn mismatch_at(mapping: &FieldMapping, field: String, reason: String) -> ConvertError {
    ConvertError::FieldTypeMismatch {
        field,
        source_kind: mapping.source_kind.to_string(),
        target_kind: mapping.target_kind.to_string(),
        reason,
    }
}

pub(crate) fn write_error(mapping: &FieldMapping, err: TypeError) -> ConvertError {
    mismatch(mapping, err.to_string())
}

pub(crate) fn missing_field(mapping: &FieldMapping, src: &dyn Record) -> ConvertError {
    ConvertError::Access(TypeError::UnknownField {
        record: src.descriptor().name(),
        field: mapping.name.to_string(),
    })
}
