//! Tempsafe Policy: thresholds, classification and violations
//!
//! This crate holds the single registry of temperature safety bands and
//! the pure functions that judge readings against it.
//!
//! # Architecture
//!
//! ```text
//! Reading → validate → ThresholdRegistry::get_rule → band table(s) → Verdict
//!                                                                     ↓
//!                                                   SAFE? ── no ──→ Violation
//!                                                                (minor/major/critical)
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use tempsafe_core::{Reading, ReadingCategory};
//! use tempsafe_policy::{classify, detect_violations, Verdict, ViolationSeverity};
//!
//! let fridge = Reading::new(ReadingCategory::Fridge, 9.0, Utc::now(), "kitchen", "sam");
//! assert_eq!(classify(&fridge).unwrap(), Verdict::Danger);
//!
//! let violations = detect_violations(&[fridge]).unwrap();
//! assert_eq!(violations[0].severity, ViolationSeverity::Major);
//! ```

pub mod classifier;
pub mod detector;
pub mod registry;
pub mod verdict;

// Core types
pub use verdict::{Classification, Verdict, Violation, ViolationSeverity};

// Registry
pub use registry::{
    get_rule, Band, BandTable, Bound, Checkpoint, Interval, RuleBands, ThresholdRegistry,
    ThresholdRule, Tiers, CANONICAL_VERSION,
};

// Classification
pub use classifier::{classify, classify_cooling_curve, classify_detailed, Classifier};

// Detection
pub use detector::{detect_violations, inspect, ViolationDetector};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempsafe_core::{GoodsType, Reading, ReadingCategory};

    #[test]
    fn test_full_workflow() {
        let at = Utc.with_ymd_and_hms(2024, 8, 1, 11, 0, 0).unwrap();
        let readings = vec![
            Reading::new(ReadingCategory::FoodHot, 58.0, at, "line", "kim"),
            Reading::delivery(GoodsType::Frozen, -10.0, at, "dock", "kim"),
            Reading::cooling_curve(19.0, 4.0, at, "prep", "kim"),
            Reading::new(ReadingCategory::ProbeCalibrationBoiling, 102.0, at, "prep", "kim"),
        ];

        let violations = detect_violations(&readings).unwrap();
        assert_eq!(violations.len(), 3);

        let critical = violations.iter().filter(|v| v.is_critical()).count();
        assert_eq!(critical, 2);

        let probe = violations
            .iter()
            .find(|v| v.category == ReadingCategory::ProbeCalibrationBoiling)
            .unwrap();
        assert_eq!(probe.severity, ViolationSeverity::Major);
        assert_eq!(probe.label, "OUT OF RANGE");
    }
}
