use crate::rule::ValidationRule;
use crate::ValidationFailure;
use fieldbridge_types::{Record, Value};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

/// Registration half of the validation capability.
pub trait RuleRegistration {
    /// Appends `rules` to the ordered rule list of `type_name`.
    fn register_validation_rules(&self, type_name: &str, rules: Vec<ValidationRule>);
}

/// Ordered validation rules keyed by declared type name.
///
/// Each type's list is an immutable `Arc<[ValidationRule]>` snapshot.
/// Registration builds a new list and swaps it in under the write lock, so
/// a concurrent [`validate`](Self::validate) sees either the old or the new
/// list in full, never a half-appended one.
#[derive(Debug, Default)]
pub struct ValidationRegistry {
    rules: RwLock<HashMap<String, Arc<[ValidationRule]>>>,
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ValidationRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Appends rules for `type_name`, keeping registration order.
    pub fn register(&self, type_name: &str, rules: impl IntoIterator<Item = ValidationRule>) {
        let mut map = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let mut next: Vec<ValidationRule> = map
            .get(type_name)
            .map(|current| current.to_vec())
            .unwrap_or_default();
        let before = next.len();
        next.extend(rules);
        debug!(
            type_name,
            added = next.len() - before,
            total = next.len(),
            "Validation rules registered"
        );
        map.insert(type_name.to_string(), next.into());
    }

    /// Snapshot of the rules currently registered for `type_name`.
    pub fn rules_for(&self, type_name: &str) -> Arc<[ValidationRule]> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    pub fn rule_count(&self, type_name: &str) -> usize {
        self.rules_for(type_name).len()
    }

    /// Drops every rule registered for `type_name`.
    pub fn clear(&self, type_name: &str) {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(type_name);
    }

    /// Evaluates the rules of `type_name` against `record` in registration
    /// order and returns the first failure.
    pub fn validate(&self, type_name: &str, record: &dyn Record) -> Result<(), ValidationFailure> {
        let rules = self.rules_for(type_name);
        for rule in rules.iter() {
            let value = record.get_by_name(rule.field_name()).unwrap_or(Value::Null);
            if !rule.check(&value) {
                return Err(ValidationFailure {
                    type_name: type_name.to_string(),
                    field_name: rule.field_name().to_string(),
                    message: rule.message().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl RuleRegistration for ValidationRegistry {
    fn register_validation_rules(&self, type_name: &str, rules: Vec<ValidationRule>) {
        self.register(type_name, rules);
    }
}
