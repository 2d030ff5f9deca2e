//! Compliance profiles
//!
//! Thresholds that turn aggregated compliance rates into recommendations,
//! plus trend settings. Profiles can be loaded from YAML.

use crate::trend::TrendBucket;
use serde::{Deserialize, Serialize};
use tempsafe_core::{EngineError, Result};

/// Named threshold set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceProfile {
    /// Profile name (e.g., "standard@1.0")
    pub name: String,

    /// A category below this rate (percent) gets a recommendation
    pub category_threshold: f64,

    /// Overall rate (percent) below which a system-level recommendation is added
    pub overall_threshold: f64,

    /// Width of trend buckets
    #[serde(default)]
    pub trend_bucket: TrendBucket,

    /// Rate difference (percentage points) between halves of the trend
    /// before it counts as improving or declining
    #[serde(default = "default_sensitivity")]
    pub trend_sensitivity: f64,
}

fn default_sensitivity() -> f64 {
    5.0
}

impl ComplianceProfile {
    /// Day-to-day operation
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            category_threshold: 85.0,
            overall_threshold: 95.0,
            trend_bucket: TrendBucket::Day,
            trend_sensitivity: 5.0,
        }
    }

    /// Sites under enforcement follow-up
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            category_threshold: 95.0,
            overall_threshold: 98.0,
            trend_bucket: TrendBucket::Day,
            trend_sensitivity: 2.0,
        }
    }

    /// Load profile from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let profile: Self =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Built-in profile by name (`standard`, `strict`, optionally with `@version`)
    pub fn for_name(name: &str) -> Result<Self> {
        let base = name.trim().split('@').next().unwrap_or_default();
        match base.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "strict" => Ok(Self::strict()),
            _ => Err(EngineError::InvalidProfile(format!(
                "unknown profile '{}', expected standard or strict",
                name
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("category_threshold", self.category_threshold),
            ("overall_threshold", self.overall_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EngineError::InvalidProfile(format!(
                    "{} must be between 0 and 100, got {}",
                    field, value
                )));
            }
        }
        if !self.trend_sensitivity.is_finite() || self.trend_sensitivity < 0.0 {
            return Err(EngineError::InvalidProfile(format!(
                "trend_sensitivity must be a non-negative number, got {}",
                self.trend_sensitivity
            )));
        }
        Ok(())
    }
}

impl Default for ComplianceProfile {
    fn default() -> Self {
        Self::standard()
    }
}
