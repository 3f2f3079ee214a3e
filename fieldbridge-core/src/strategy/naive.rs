use super::{ConversionStrategy, replay};
use crate::error::ConvertResult;
use crate::plan::PlanKey;
use crate::resolver;
use fieldbridge_types::Record;
use tracing::trace;

/// Re-resolves the plan on every call and copies fields by name.
///
/// Holds no state. This is the reference the other tiers are checked
/// against. Plans are not passed to `resolver::report`, since that would
/// repeat the unsupported-field warnings on every call; the cached tiers
/// log them once per pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveStrategy;

impl NaiveStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionStrategy for NaiveStrategy {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn run_plan(&self, key: PlanKey, src: &dyn Record, dst: &mut dyn Record) -> ConvertResult<()> {
        let plan = resolver::resolve(key)?;
        trace!(pair = %key, fields = plan.len(), "Resolved plan for single call");
        replay(&plan, src, dst, self)
    }
}
