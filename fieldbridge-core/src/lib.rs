//! Field-name-matching conversion between wire messages and domain models.
//!
//! Two independently declared record types are paired by exact field name.
//! The resolver classifies each matched pair once (direct, widening,
//! checked narrowing, optional wrap/unwrap, time codec, nested record,
//! list) and the result is replayed by one of three strategies:
//! - [`NaiveStrategy`] resolves on every call
//! - [`CachedStrategy`] resolves once per type pair and direction
//! - [`CompiledStrategy`] also precompiles one copy closure per field
//!
//! [`Converter`] binds one strategy and adds masking and validation.
//!
//! ```
//! use fieldbridge_core::{record, Converter};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct UserMessage as "UserMessage" {
//!         pub id: i32,
//!         pub name: String,
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct User as "User" {
//!         pub id: i64,
//!         pub name: String,
//!     }
//! }
//!
//! let converter = Converter::<UserMessage, User>::optimized();
//! let mut user = User::default();
//! converter
//!     .convert_to_model(&UserMessage { id: 7, name: "ada".into() }, &mut user)
//!     .unwrap();
//! assert_eq!(user, User { id: 7, name: "ada".into() });
//! ```

pub mod cache;
pub mod config;
pub mod converter;
pub mod error;
pub mod mask;
pub mod plan;
pub mod resolver;
pub mod strategy;

pub use cache::{CacheStats, ConversionCache, PlanState};
pub use config::{CallOptions, ConverterConfig, PerformanceLevel, ValidationScope};
pub use converter::{Converter, strategy_for};
pub use error::{ConvertError, ConvertResult};
pub use mask::{REDACTED, mask_sensitive};
pub use plan::{
    Compatibility, ConversionPlan, Direction, ExcludedField, Exclusion, FieldMapping, PlanKey,
    Presence, ScalarConversion, Side, TypePair,
};
pub use strategy::{CachedStrategy, CompiledPlan, CompiledStrategy, ConversionStrategy, NaiveStrategy};

pub use fieldbridge_types::{
    Callback, DescribedRecord, FieldDescriptor, FieldKind, Record, ScalarKind, TypeDescriptor,
    UnsupportedKind, Value, WireTimestamp, record,
};
pub use fieldbridge_validation::{
    RuleRegistration, ValidationFailure, ValidationRegistry, ValidationRule,
};
