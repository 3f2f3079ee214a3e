//! Field-level validation rules for fieldbridge records.
//!
//! Rules are grouped by declared type name and evaluated in registration
//! order against a converted record, stopping at the first failure:
//! - [`ValidationRule`]: a named field predicate with an error message
//! - [`ValidationRegistry`]: copy-on-write rule lists keyed by type name
//! - [`RuleRegistration`]: the registration capability, kept separate from
//!   conversion so converters that cannot validate need not pretend to

mod registry;
mod rule;

pub use registry::{RuleRegistration, ValidationRegistry};
pub use rule::ValidationRule;

/// A rule's predicate returned false.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {type_name}.{field_name}: {message}")]
pub struct ValidationFailure {
    pub type_name: String,
    pub field_name: String,
    pub message: String,
}
