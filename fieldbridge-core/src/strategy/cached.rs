use super::{ConversionStrategy, replay};
use crate::cache::ConversionCache;
use crate::error::ConvertResult;
use crate::plan::{ConversionPlan, PlanKey};
use crate::resolver;
use fieldbridge_types::Record;
use std::sync::Arc;

/// Resolves each [`PlanKey`] once and replays the cached plan through the
/// name-based accessors.
#[derive(Debug, Clone)]
pub struct CachedStrategy {
    cache: Arc<ConversionCache<ConversionPlan>>,
}

impl CachedStrategy {
    /// Uses the process-wide plan cache.
    pub fn new() -> Self {
        Self::with_cache(ConversionCache::<ConversionPlan>::global())
    }

    /// Uses an explicit cache, isolated from the process-wide one.
    pub fn with_cache(cache: Arc<ConversionCache<ConversionPlan>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ConversionCache<ConversionPlan>> {
        &self.cache
    }

    /// Returns the plan for `key`, building it on first use.
    ///
    /// Concurrent first callers share one build; a build failure is
    /// returned to every later caller without re-resolving.
    pub fn plan(&self, key: PlanKey) -> ConvertResult<Arc<ConversionPlan>> {
        self.cache.get_or_build(key, || {
            let plan = resolver::resolve(key)?;
            resolver::report(&plan);
            Ok(plan)
        })
    }
}

impl Default for CachedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStrategy for CachedStrategy {
    fn name(&self) -> &'static str {
        "cached"
    }

    fn run_plan(&self, key: PlanKey, src: &dyn Record, dst: &mut dyn Record) -> ConvertResult<()> {
        let plan = self.plan(key)?;
        replay(&plan, src, dst, self)
    }
}
