//! Field Resolver: matches fields by exact name and classifies each pair.

use crate::error::{ConvertError, ConvertResult};
use crate::plan::{
    Compatibility, ConversionPlan, Direction, ExcludedField, Exclusion, FieldMapping, PlanKey,
    Presence, ScalarConversion, Side,
};
use fieldbridge_types::{FieldDescriptor, FieldKind, ScalarKind};
use tracing::{debug, warn};

/// Builds the plan for `key`.
///
/// Pure function of the two descriptors. Model fields are walked in
/// declaration order, so the plan order is the same in both directions.
pub fn resolve(key: PlanKey) -> ConvertResult<ConversionPlan> {
    let wire = key.pair.wire;
    let model = key.pair.model;

    for descriptor in [wire, model] {
        if let Some(name) = descriptor.duplicate_field() {
            return Err(ConvertError::CacheBuildFailure {
                pair: key.to_string(),
                reason: format!("{} declares field '{name}' more than once", descriptor.name()),
            });
        }
    }

    let mut mappings = Vec::new();
    let mut excluded = Vec::new();

    for model_field in model.fields() {
        if let Some(kind) = model_field.kind().unsupported() {
            excluded.push(ExcludedField {
                name: model_field.name(),
                side: Side::Model,
                reason: Exclusion::Unsupported(kind),
            });
            continue;
        }
        let Some(wire_field) = wire.field(model_field.name()) else {
            excluded.push(ExcludedField {
                name: model_field.name(),
                side: Side::Model,
                reason: Exclusion::OneSided,
            });
            continue;
        };
        // An unsupported wire counterpart is recorded in the wire pass below.
        if wire_field.kind().unsupported().is_some() {
            continue;
        }
        mappings.push(map_field(key, wire_field, model_field));
    }

    for wire_field in wire.fields() {
        if mappings.iter().any(|mapping: &FieldMapping| mapping.name == wire_field.name()) {
            continue;
        }
        let reason = match wire_field.kind().unsupported() {
            Some(kind) => Exclusion::Unsupported(kind),
            None => Exclusion::OneSided,
        };
        excluded.push(ExcludedField {
            name: wire_field.name(),
            side: Side::Wire,
            reason,
        });
    }

    Ok(ConversionPlan::new(key, mappings, excluded))
}

/// Logs the build-time diagnostics of a freshly cached plan.
///
/// Called once per plan by the caching strategies, so each unsupported
/// field is warned about exactly once per process.
pub fn report(plan: &ConversionPlan) {
    let pair = plan.key().to_string();
    for field in plan.excluded() {
        match field.reason {
            Exclusion::Unsupported(kind) => warn!(
                pair = %pair,
                field = field.name,
                kind = %kind,
                "Unsupported field kind excluded from conversion plan"
            ),
            Exclusion::OneSided => debug!(
                pair = %pair,
                field = field.name,
                side = ?field.side,
                "Field has no counterpart, skipped"
            ),
        }
    }
    debug!(
        pair = %pair,
        fields = plan.len(),
        excluded = plan.excluded().len(),
        "Conversion plan built"
    );
}

fn map_field(key: PlanKey, wire: &FieldDescriptor, model: &FieldDescriptor) -> FieldMapping {
    let (source, target) = match key.direction {
        Direction::ToModel => (wire, model),
        Direction::ToWire => (model, wire),
    };
    FieldMapping {
        name: model.name(),
        source_index: source.index(),
        target_index: target.index(),
        source_kind: source.kind(),
        target_kind: target.kind(),
        compatibility: classify(source.kind(), target.kind(), key),
    }
}

/// Classifies a source/target kind pair. Total: every pair gets a variant.
pub fn classify(source: FieldKind, target: FieldKind, key: PlanKey) -> Compatibility {
    match (source, target) {
        (
            FieldKind::Scalar {
                kind: from,
                optional: source_optional,
            },
            FieldKind::Scalar {
                kind: to,
                optional: target_optional,
            },
        ) => match scalar_conversion(from, to) {
            Some(conversion) => Compatibility::Scalar {
                conversion,
                presence: Presence::between(source_optional, target_optional),
            },
            None => incompatible(source, target),
        },
        (FieldKind::ScalarList(from), FieldKind::ScalarList(to)) => {
            match scalar_conversion(from, to) {
                Some(conversion) => Compatibility::ScalarList(conversion),
                None => incompatible(source, target),
            }
        }
        (
            FieldKind::Record {
                descriptor: from, ..
            },
            FieldKind::Record { descriptor: to, .. },
        ) => Compatibility::Nested(PlanKey::new(from(), to(), key.direction)),
        (FieldKind::RecordList(from), FieldKind::RecordList(to)) => {
            Compatibility::NestedList(PlanKey::new(from(), to(), key.direction))
        }
        _ => incompatible(source, target),
    }
}

/// Conversion between two scalar kinds, or `None` if there is none.
pub fn scalar_conversion(from: ScalarKind, to: ScalarKind) -> Option<ScalarConversion> {
    if from == to {
        Some(ScalarConversion::Identity)
    } else if from.widens_to(to) {
        Some(ScalarConversion::Widen { from, to })
    } else if from.is_numeric() && to.is_numeric() {
        Some(ScalarConversion::Narrow { from, to })
    } else if from.is_time() && to.is_time() {
        Some(ScalarConversion::TimeCodec { from, to })
    } else {
        None
    }
}

fn incompatible(source: FieldKind, target: FieldKind) -> Compatibility {
    Compatibility::Incompatible {
        reason: format!("{source} has no conversion to {target}"),
    }
}
