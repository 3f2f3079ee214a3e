//! Conversion plan model: which fields are copied for a type pair, and how.

use crate::error::ConvertError;
use fieldbridge_types::{FieldKind, ScalarKind, TypeDescriptor, UnsupportedKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Copy direction between a wire message and a domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Wire message → domain model.
    ToModel,
    /// Domain model → wire message.
    ToWire,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ToModel => "to_model",
            Self::ToWire => "to_wire",
        })
    }
}

/// A (wire type, model type) relationship.
///
/// Equality and hashing use the Rust type identities only.
#[derive(Clone, Copy)]
pub struct TypePair {
    pub wire: &'static TypeDescriptor,
    pub model: &'static TypeDescriptor,
}

impl TypePair {
    pub const fn new(wire: &'static TypeDescriptor, model: &'static TypeDescriptor) -> Self {
        Self { wire, model }
    }
}

impl PartialEq for TypePair {
    fn eq(&self, other: &Self) -> bool {
        self.wire.type_id() == other.wire.type_id() && self.model.type_id() == other.model.type_id()
    }
}

impl Eq for TypePair {}

impl Hash for TypePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wire.type_id().hash(state);
        self.model.type_id().hash(state);
    }
}

impl fmt::Debug for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypePair({} <-> {})", self.wire.name(), self.model.name())
    }
}

/// Cache key: one type pair in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub pair: TypePair,
    pub direction: Direction,
}

impl PlanKey {
    /// Builds the key for copying `source` into `target` in `direction`.
    pub const fn new(
        source: &'static TypeDescriptor,
        target: &'static TypeDescriptor,
        direction: Direction,
    ) -> Self {
        let pair = match direction {
            Direction::ToModel => TypePair::new(source, target),
            Direction::ToWire => TypePair::new(target, source),
        };
        Self { pair, direction }
    }

    pub const fn source(&self) -> &'static TypeDescriptor {
        match self.direction {
            Direction::ToModel => self.pair.wire,
            Direction::ToWire => self.pair.model,
        }
    }

    pub const fn target(&self) -> &'static TypeDescriptor {
        match self.direction {
            Direction::ToModel => self.pair.model,
            Direction::ToWire => self.pair.wire,
        }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source().name(), self.target().name())
    }
}

/// How a scalar value changes kind on its way across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarConversion {
    Identity,
    /// Lossless numeric widening.
    Widen { from: ScalarKind, to: ScalarKind },
    /// Numeric narrowing, checked per value at call time.
    Narrow { from: ScalarKind, to: ScalarKind },
    /// Wire timestamp ⇄ native date-time.
    TimeCodec { from: ScalarKind, to: ScalarKind },
}

/// How optional presence changes on the way across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Same,
    /// Bare → optional: always `Some`.
    Wrap,
    /// Optional → bare: `None` becomes the zero value.
    Unwrap,
}

impl Presence {
    pub const fn between(source_optional: bool, target_optional: bool) -> Self {
        match (source_optional, target_optional) {
            (false, true) => Self::Wrap,
            (true, false) => Self::Unwrap,
            _ => Self::Same,
        }
    }
}

/// Copy semantics of one matched field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Scalar {
        conversion: ScalarConversion,
        presence: Presence,
    },
    /// Repeated scalars, converted element-wise.
    ScalarList(ScalarConversion),
    /// Nested record, converted with the plan cached under its own key.
    Nested(PlanKey),
    /// Repeated nested record, converted element-wise.
    NestedList(PlanKey),
    /// Kinds that cannot be copied; the field fails when reached.
    Incompatible { reason: String },
}

impl Compatibility {
    /// Identical kinds and presence: the value is moved across untouched.
    pub fn is_direct(&self) -> bool {
        matches!(
            self,
            Self::Scalar {
                conversion: ScalarConversion::Identity,
                presence: Presence::Same,
            } | Self::ScalarList(ScalarConversion::Identity)
        )
    }
}

/// One matched field of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: &'static str,
    /// Field index in the source record.
    pub source_index: usize,
    /// Field index in the target record.
    pub target_index: usize,
    pub source_kind: FieldKind,
    pub target_kind: FieldKind,
    pub compatibility: Compatibility,
}

/// Which record a field was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Wire,
    Model,
}

/// Why a field is not part of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Declared on one side only.
    OneSided,
    /// No copy semantics for this kind.
    Unsupported(UnsupportedKind),
}

/// A field left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedField {
    pub name: &'static str,
    pub side: Side,
    pub reason: Exclusion,
}

/// Ordered field mappings for one [`PlanKey`].
///
/// Every field of both records appears exactly once, either as a mapping
/// or as an exclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    key: PlanKey,
    mappings: Vec<FieldMapping>,
    excluded: Vec<ExcludedField>,
}

impl ConversionPlan {
    pub(crate) fn new(key: PlanKey, mappings: Vec<FieldMapping>, excluded: Vec<ExcludedField>) -> Self {
        Self {
            key,
            mappings,
            excluded,
        }
    }

    pub fn key(&self) -> PlanKey {
        self.key
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn excluded(&self) -> &[ExcludedField] {
        &self.excluded
    }

    pub fn mapping(&self, name: &str) -> Option<&FieldMapping> {
        self.mappings.iter().find(|mapping| mapping.name == name)
    }

    /// Names of the mapped fields, in plan order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.mappings.iter().map(|mapping| mapping.name).collect()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Plan-build warnings for fields excluded because of their kind.
    pub fn warnings(&self) -> Vec<ConvertError> {
        self.excluded
            .iter()
            .filter_map(|field| match field.reason {
                Exclusion::Unsupported(kind) => Some(ConvertError::UnsupportedKind {
                    field: field.name.to_string(),
                    kind,
                }),
                Exclusion::OneSided => None,
            })
            .collect()
    }
}
