//! Violation detection over reading collections

use crate::classifier::Classifier;
use crate::verdict::Violation;
use tempsafe_core::{Reading, Result};

/// Extracts non-safe readings as violations
#[derive(Debug, Clone, Copy)]
pub struct ViolationDetector<'a> {
    classifier: Classifier<'a>,
}

impl Default for ViolationDetector<'static> {
    fn default() -> Self {
        Self::new(Classifier::canonical())
    }
}

impl<'a> ViolationDetector<'a> {
    pub fn new(classifier: Classifier<'a>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier<'a> {
        &self.classifier
    }

    /// Classify one reading; `Ok(None)` when it is safe
    pub fn inspect(&self, reading: &Reading) -> Result<Option<Violation>> {
        let classification = self.classifier.classify_detailed(reading)?;
        Ok(Violation::from_classification(reading, classification))
    }

    /// All violations in `readings`. Fails on the first invalid reading;
    /// output order is unspecified.
    pub fn detect(&self, readings: &[Reading]) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for reading in readings {
            if let Some(violation) = self.inspect(reading)? {
                violations.push(violation);
            }
        }
        Ok(violations)
    }
}

/// Detect violations against the canonical registry
pub fn detect_violations(readings: &[Reading]) -> Result<Vec<Violation>> {
    ViolationDetector::default().detect(readings)
}

/// Inspect a single reading against the canonical registry
pub fn inspect(reading: &Reading) -> Result<Option<Violation>> {
    ViolationDetector::default().inspect(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{Verdict, ViolationSeverity};
    use chrono::{TimeZone, Utc};
    use tempsafe_core::{EngineError, ReadingCategory};

    fn reading(category: ReadingCategory, value: f64) -> Reading {
        let at = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();
        Reading::new(category, value, at, "bar", "lee")
    }

    #[test]
    fn test_detect_only_non_safe() {
        let readings = vec![
            reading(ReadingCategory::Fridge, 3.0),
            reading(ReadingCategory::Fridge, 6.0),
            reading(ReadingCategory::FoodCold, 12.0),
            reading(ReadingCategory::Freezer, -20.0),
        ];

        let violations = detect_violations(&readings).unwrap();
        assert_eq!(violations.len(), 2);

        let fridge = violations.iter().find(|v| v.category == ReadingCategory::Fridge).unwrap();
        assert_eq!(fridge.verdict, Verdict::Warning);
        assert_eq!(fridge.severity, ViolationSeverity::Minor);

        let cold = violations.iter().find(|v| v.category == ReadingCategory::FoodCold).unwrap();
        assert_eq!(cold.severity, ViolationSeverity::Critical);
    }

    #[test]
    fn test_detect_fails_on_invalid_reading() {
        let readings = vec![
            reading(ReadingCategory::Fridge, 9.0),
            reading(ReadingCategory::Fridge, f64::NAN),
        ];
        assert!(matches!(
            detect_violations(&readings),
            Err(EngineError::InvalidReading(_))
        ));
    }

    #[test]
    fn test_input_is_untouched() {
        let readings = vec![reading(ReadingCategory::FoodHot, 50.0)];
        let before = readings.clone();
        let _ = detect_violations(&readings).unwrap();
        assert_eq!(readings, before);
    }

    #[test]
    fn test_inspect_safe_reading() {
        assert!(inspect(&reading(ReadingCategory::FoodHot, 70.0)).unwrap().is_none());
    }
}
