//! The `Converter` facade.

use crate::config::{CallOptions, ConverterConfig, PerformanceLevel};
use crate::error::{ConvertError, ConvertResult};
use crate::mask::mask_sensitive;
use crate::plan::{ConversionPlan, Direction, PlanKey};
use crate::resolver;
use crate::strategy::{CachedStrategy, CompiledStrategy, ConversionStrategy, NaiveStrategy};
use fieldbridge_types::{DescribedRecord, Record, TypeDescriptor};
use fieldbridge_validation::{RuleRegistration, ValidationRegistry, ValidationRule};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// Builds the strategy for `level`, backed by the process-wide caches.
pub fn strategy_for(level: PerformanceLevel) -> Box<dyn ConversionStrategy> {
    match level {
        PerformanceLevel::Basic => Box::new(NaiveStrategy::new()),
        PerformanceLevel::Optimized => Box::new(CachedStrategy::new()),
        PerformanceLevel::UltraFast => Box::new(CompiledStrategy::new()),
    }
}

/// Converts between wire message `W` and domain model `M`.
///
/// The strategy is picked once from [`ConverterConfig::performance_level`]
/// and never changes. Each call copies fields with that strategy, then
/// masks sensitive fields (if enabled), then runs the validation rules
/// registered for the destination type (if the direction is in scope).
///
/// Conversion is not atomic: when a field fails, fields copied before it
/// remain in the destination.
pub struct Converter<W, M> {
    config: ConverterConfig,
    strategy: Box<dyn ConversionStrategy>,
    registry: Arc<ValidationRegistry>,
    _types: PhantomData<fn() -> (W, M)>,
}

impl<W: DescribedRecord, M: DescribedRecord> Converter<W, M> {
    /// Creates a converter that validates against the process-wide registry.
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_registry(config, ValidationRegistry::global())
    }

    pub fn basic() -> Self {
        Self::new(ConverterConfig::new(PerformanceLevel::Basic))
    }

    pub fn optimized() -> Self {
        Self::new(ConverterConfig::new(PerformanceLevel::Optimized))
    }

    pub fn ultra_fast() -> Self {
        Self::new(ConverterConfig::new(PerformanceLevel::UltraFast))
    }

    /// Creates a converter that validates against `registry`.
    pub fn with_registry(config: ConverterConfig, registry: Arc<ValidationRegistry>) -> Self {
        let strategy = strategy_for(config.performance_level);
        info!(
            wire = W::type_descriptor().name(),
            model = M::type_descriptor().name(),
            level = %config.performance_level,
            strategy = strategy.name(),
            mask = config.mask_sensitive_fields,
            "Converter created"
        );
        Self {
            config,
            strategy,
            registry,
            _types: PhantomData,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        self.config.performance_level
    }

    /// Name of the bound strategy (`naive`, `cached` or `compiled`).
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn registry(&self) -> &Arc<ValidationRegistry> {
        &self.registry
    }

    pub fn convert_to_model(&self, wire: &W, model: &mut M) -> ConvertResult<()> {
        self.convert_to_model_with(wire, model, CallOptions::default())
    }

    pub fn convert_to_model_with(
        &self,
        wire: &W,
        model: &mut M,
        options: CallOptions,
    ) -> ConvertResult<()> {
        self.run(
            Some(wire as &dyn Record),
            Some(model as &mut dyn Record),
            Direction::ToModel,
            options,
        )
    }

    pub fn convert_to_wire(&self, model: &M, wire: &mut W) -> ConvertResult<()> {
        self.convert_to_wire_with(model, wire, CallOptions::default())
    }

    pub fn convert_to_wire_with(
        &self,
        model: &M,
        wire: &mut W,
        options: CallOptions,
    ) -> ConvertResult<()> {
        self.run(
            Some(model as &dyn Record),
            Some(wire as &mut dyn Record),
            Direction::ToWire,
            options,
        )
    }

    /// Converts each wire message into a fresh model, in order.
    ///
    /// Stops at the first failing element; the error carries its index.
    pub fn convert_to_model_list(&self, wires: &[W]) -> ConvertResult<Vec<M>> {
        self.convert_to_model_list_with(wires, CallOptions::default())
    }

    pub fn convert_to_model_list_with(
        &self,
        wires: &[W],
        options: CallOptions,
    ) -> ConvertResult<Vec<M>> {
        self.convert_list(wires, Direction::ToModel, options)
    }

    /// Converts each model into a fresh wire message, in order.
    pub fn convert_to_wire_list(&self, models: &[M]) -> ConvertResult<Vec<W>> {
        self.convert_to_wire_list_with(models, CallOptions::default())
    }

    pub fn convert_to_wire_list_with(
        &self,
        models: &[M],
        options: CallOptions,
    ) -> ConvertResult<Vec<W>> {
        self.convert_list(models, Direction::ToWire, options)
    }

    /// Dynamic entry point. Returns [`ConvertError::NilInput`] when either
    /// record is absent.
    pub fn convert(
        &self,
        src: Option<&dyn Record>,
        dst: Option<&mut dyn Record>,
        direction: Direction,
        options: CallOptions,
    ) -> ConvertResult<()> {
        self.run(src, dst, direction, options)
    }

    pub fn describe_model_type(&self) -> &'static TypeDescriptor {
        M::type_descriptor()
    }

    pub fn describe_wire_type(&self) -> &'static TypeDescriptor {
        W::type_descriptor()
    }

    /// The field plan used for `direction`. Identical for every strategy.
    pub fn plan(&self, direction: Direction) -> ConvertResult<ConversionPlan> {
        let key = match direction {
            Direction::ToModel => {
                PlanKey::new(W::type_descriptor(), M::type_descriptor(), direction)
            }
            Direction::ToWire => {
                PlanKey::new(M::type_descriptor(), W::type_descriptor(), direction)
            }
        };
        resolver::resolve(key)
    }

    fn convert_list<S, D>(
        &self,
        sources: &[S],
        direction: Direction,
        options: CallOptions,
    ) -> ConvertResult<Vec<D>>
    where
        S: DescribedRecord,
        D: DescribedRecord,
    {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let mut target = D::default();
                self.run(
                    Some(source as &dyn Record),
                    Some(&mut target as &mut dyn Record),
                    direction,
                    options,
                )
                .map_err(|err| ConvertError::ListElement {
                    index,
                    source: Box::new(err),
                })?;
                Ok(target)
            })
            .collect()
    }

    fn run(
        &self,
        src: Option<&dyn Record>,
        dst: Option<&mut dyn Record>,
        direction: Direction,
        options: CallOptions,
    ) -> ConvertResult<()> {
        let src = src.ok_or(ConvertError::NilInput { side: "source" })?;
        let dst = dst.ok_or(ConvertError::NilInput {
            side: "destination",
        })?;
        let converted = self.strategy.convert(Some(src), Some(&mut *dst), direction);

        // Fields written before a failed copy stay in `dst`, so they are masked too.
        if options.mask.unwrap_or(self.config.mask_sensitive_fields) {
            let masked = mask_sensitive(&mut *dst);
            converted?;
            masked?;
        } else {
            converted?;
        }
        let validate = options
            .validate
            .unwrap_or_else(|| self.config.validate.covers(direction));
        if validate {
            self.registry.validate(dst.descriptor().name(), &*dst)?;
        }
        Ok(())
    }
}

impl<W: DescribedRecord, M: DescribedRecord> Default for Converter<W, M> {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl<W, M> RuleRegistration for Converter<W, M> {
    fn register_validation_rules(&self, type_name: &str, rules: Vec<ValidationRule>) {
        self.registry.register(type_name, rules);
    }
}

impl<W, M> fmt::Debug for Converter<W, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}
