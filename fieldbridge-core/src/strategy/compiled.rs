use super::{CachedStrategy, ConversionStrategy, missing_field, transform, write_error};
use crate::cache::ConversionCache;
use crate::error::ConvertResult;
use crate::plan::{ConversionPlan, FieldMapping, PlanKey};
use fieldbridge_types::Record;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

type FieldCopier = Box<
    dyn Fn(&dyn Record, &mut dyn Record, &dyn ConversionStrategy) -> ConvertResult<()>
        + Send
        + Sync,
>;

/// A cached plan plus one copy closure per mapping, bound to the source and
/// target field indexes.
pub struct CompiledPlan {
    plan: Arc<ConversionPlan>,
    copiers: Vec<FieldCopier>,
}

impl CompiledPlan {
    pub fn compile(plan: Arc<ConversionPlan>) -> Self {
        let copiers = plan.mappings().iter().map(compile_field).collect();
        Self { plan, copiers }
    }

    /// The plan these closures were compiled from.
    pub fn plan(&self) -> &Arc<ConversionPlan> {
        &self.plan
    }

    pub fn len(&self) -> usize {
        self.copiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copiers.is_empty()
    }
}

impl fmt::Debug for CompiledPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPlan")
            .field("key", &self.plan.key())
            .field("copiers", &self.copiers.len())
            .finish()
    }
}

impl ConversionCache<CompiledPlan> {
    /// Process-wide compiled-plan cache.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ConversionCache<CompiledPlan>>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }
}

fn compile_field(mapping: &FieldMapping) -> FieldCopier {
    let mapping = mapping.clone();
    let (from, to) = (mapping.source_index, mapping.target_index);
    if mapping.compatibility.is_direct() {
        return Box::new(
            move |src: &dyn Record, dst: &mut dyn Record, _runner: &dyn ConversionStrategy| {
                let value = src
                    .get_field(from)
                    .ok_or_else(|| missing_field(&mapping, src))?;
                dst.set_field(to, value)
                    .map_err(|err| write_error(&mapping, err))
            },
        );
    }
    Box::new(
        move |src: &dyn Record, dst: &mut dyn Record, runner: &dyn ConversionStrategy| {
            let value = src
                .get_field(from)
                .ok_or_else(|| missing_field(&mapping, src))?;
            let value = transform(&mapping, value, runner)?;
            dst.set_field(to, value)
                .map_err(|err| write_error(&mapping, err))
        },
    )
}

/// Runs precompiled per-field closures over the plan owned by a
/// [`CachedStrategy`].
///
/// Field matching is never redone here: the compiled cache is filled from
/// the base strategy's plan, so both tiers share one mapping set.
#[derive(Debug, Clone)]
pub struct CompiledStrategy {
    base: Arc<CachedStrategy>,
    compiled: Arc<ConversionCache<CompiledPlan>>,
}

impl CompiledStrategy {
    /// Uses the process-wide plan and compiled caches.
    pub fn new() -> Self {
        Self {
            base: Arc::new(CachedStrategy::new()),
            compiled: ConversionCache::<CompiledPlan>::global(),
        }
    }

    /// Uses explicit caches, isolated from the process-wide ones.
    pub fn with_caches(
        plans: Arc<ConversionCache<ConversionPlan>>,
        compiled: Arc<ConversionCache<CompiledPlan>>,
    ) -> Self {
        Self {
            base: Arc::new(CachedStrategy::with_cache(plans)),
            compiled,
        }
    }

    pub fn base(&self) -> &CachedStrategy {
        &self.base
    }

    pub fn compiled_cache(&self) -> &Arc<ConversionCache<CompiledPlan>> {
        &self.compiled
    }

    /// Returns the compiled plan for `key`, compiling it on first use.
    pub fn compiled_plan(&self, key: PlanKey) -> ConvertResult<Arc<CompiledPlan>> {
        self.compiled.get_or_build(key, || {
            let plan = self.base.plan(key)?;
            let compiled = CompiledPlan::compile(plan);
            debug!(pair = %key, copiers = compiled.len(), "Compiled conversion plan");
            Ok(compiled)
        })
    }
}

impl Default for CompiledStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStrategy for CompiledStrategy {
    fn name(&self) -> &'static str {
        "compiled"
    }

    fn run_plan(&self, key: PlanKey, src: &dyn Record, dst: &mut dyn Record) -> ConvertResult<()> {
        let compiled = self.compiled_plan(key)?;
        for copy in &compiled.copiers {
            copy(src, &mut *dst, self)?;
        }
        Ok(())
    }
}
