//! Converter configuration.

use crate::error::{ConvertError, ConvertResult};
use crate::plan::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy tier, chosen once per converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    /// Re-resolves fields on every call.
    #[default]
    Basic,
    /// Caches the field plan per type pair.
    Optimized,
    /// Caches the plan and precompiles per-field copy closures.
    UltraFast,
}

impl PerformanceLevel {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Optimized, Self::UltraFast];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Optimized => "optimized",
            Self::UltraFast => "ultra_fast",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceLevel {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "basic" => Ok(Self::Basic),
            "optimized" => Ok(Self::Optimized),
            "ultra_fast" | "ultrafast" => Ok(Self::UltraFast),
            other => Err(ConvertError::Config(format!(
                "unknown performance level '{other}'"
            ))),
        }
    }
}

/// Directions in which registered validation rules run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationScope {
    None,
    ToModel,
    ToWire,
    #[default]
    Both,
}

impl ValidationScope {
    pub const fn covers(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Self::Both, _)
                | (Self::ToModel, Direction::ToModel)
                | (Self::ToWire, Direction::ToWire)
        )
    }
}

/// Construction options for a [`Converter`](crate::Converter).
///
/// ```toml
/// performance_level = "ultra_fast"
/// mask_sensitive_fields = true
/// validate = "to_model"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConverterConfig {
    pub performance_level: PerformanceLevel,
    pub mask_sensitive_fields: bool,
    pub validate: ValidationScope,
}

impl ConverterConfig {
    pub fn new(performance_level: PerformanceLevel) -> Self {
        Self {
            performance_level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_masking(mut self, enabled: bool) -> Self {
        self.mask_sensitive_fields = enabled;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, scope: ValidationScope) -> Self {
        self.validate = scope;
        self
    }

    /// Parses a TOML fragment. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> ConvertResult<Self> {
        toml::from_str(source).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> ConvertResult<String> {
        toml::to_string(self).map_err(|e| ConvertError::Config(e.to_string()))
    }
}

/// Per-call overrides of the converter's masking and validation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// `Some(false)` skips validation, `Some(true)` forces it in either
    /// direction. `None` follows the configured [`ValidationScope`].
    pub validate: Option<bool>,
    /// `None` follows `mask_sensitive_fields`.
    pub mask: Option<bool>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = Some(enabled);
        self
    }

    #[must_use]
    pub fn mask(mut self, enabled: bool) -> Self {
        self.mask = Some(enabled);
        self
    }
}
