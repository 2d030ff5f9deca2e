//! Verdict types for reading classification
//!
//! Provides Safe/Warning/Danger verdicts and the violations derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tempsafe_core::{Reading, ReadingCategory};

/// Safety verdict for a single reading, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe = 0,
    Warning = 1,
    Danger = 2,
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }

    /// Default badge text when a rule has no label of its own
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Warning => "WARNING",
            Verdict::Danger => "DANGER",
        }
    }

    /// Combine two verdicts, taking the more severe one
    pub fn combine(self, other: Verdict) -> Verdict {
        self.max(other)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Minor = 0,
    Major = 1,
    Critical = 2,
}

impl ViolationSeverity {
    /// Severity for a non-safe verdict; `None` for `Safe`
    pub fn for_verdict(category: ReadingCategory, verdict: Verdict) -> Option<Self> {
        match verdict {
            Verdict::Safe => None,
            Verdict::Warning => Some(ViolationSeverity::Minor),
            Verdict::Danger if category.affects_consumer_health() => {
                Some(ViolationSeverity::Critical)
            }
            Verdict::Danger => Some(ViolationSeverity::Major),
        }
    }
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViolationSeverity::Minor => write!(f, "minor"),
            ViolationSeverity::Major => write!(f, "major"),
            ViolationSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Verdict plus the display details a badge needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub verdict: Verdict,
    /// Rule-specific label, e.g. "FROZEN WARNING"
    pub label: String,
    /// Human description of the safe band
    pub expected_range: String,
}

/// A reading whose verdict is not `Safe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub reading: Reading,
    pub verdict: Verdict,
    pub category: ReadingCategory,
    pub label: String,
    pub expected_range: String,
    pub severity: ViolationSeverity,
}

impl Violation {
    /// Build a violation from a classification; `None` when the reading is safe
    pub fn from_classification(reading: &Reading, classification: Classification) -> Option<Self> {
        let severity = ViolationSeverity::for_verdict(reading.category, classification.verdict)?;

        Some(Self {
            reading: reading.clone(),
            verdict: classification.verdict,
            category: reading.category,
            label: classification.label,
            expected_range: classification.expected_range,
            severity,
        })
    }

    pub fn is_critical(&self) -> bool {
        self.severity == ViolationSeverity::Critical
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} at {}: {}°C (expected {})",
            self.severity,
            self.category,
            self.reading.location_id,
            self.reading.primary_value,
            self.expected_range
        )
    }
}
