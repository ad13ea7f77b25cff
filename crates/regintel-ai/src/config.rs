//! Scoring parameters for the keyword classifier.

use std::path::Path;

use regintel_core::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Confidence increments, cap, and fallback labels used by [`crate::Classifier`].
///
/// Every field has a default, so a JSON file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
    /// Added per matching device-type term.
    pub device_weight: f32,
    /// Added per matched therapeutic-area or compliance label.
    pub category_weight: f32,
    /// Added once when a risk tier matches.
    pub risk_weight: f32,
    /// Upper bound on accumulated confidence.
    pub max_confidence: f32,
    /// Confidence assigned when no category matched.
    pub fallback_confidence: f32,
    pub default_category: String,
    pub default_device_type: String,
    /// Risk level when no risk keyword matched.
    pub default_risk: RiskLevel,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            device_weight: 0.1,
            category_weight: 0.1,
            risk_weight: 0.2,
            max_confidence: 1.0,
            fallback_confidence: 0.5,
            default_category: "General MedTech".to_string(),
            default_device_type: "Medical Device".to_string(),
            default_risk: RiskLevel::Medium,
        }
    }
}

impl ClassifierConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check weights lie in `[0, 1]` and default labels are non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("deviceWeight", self.device_weight),
            ("categoryWeight", self.category_weight),
            ("riskWeight", self.risk_weight),
            ("maxConfidence", self.max_confidence),
            ("fallbackConfidence", self.fallback_confidence),
        ];
        for (field, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.fallback_confidence > self.max_confidence {
            return Err(ConfigError::OutOfRange {
                field: "fallbackConfidence",
                value: self.fallback_confidence,
            });
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::EmptyValue("defaultCategory"));
        }
        if self.default_device_type.trim().is_empty() {
            return Err(ConfigError::EmptyValue("defaultDeviceType"));
        }
        Ok(())
    }
}
