//! Reading classifier
//!
//! Turns a reading into a verdict using the rule registered for its
//! category. Malformed input always fails; nothing defaults to `Safe`.

use crate::registry::{BandTable, RuleBands, ThresholdRegistry, ThresholdRule};
use crate::verdict::{Classification, Verdict};
use tempsafe_core::{EngineError, GoodsType, Reading, ReadingCategory, Result};

/// Classifier bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    registry: &'a ThresholdRegistry,
}

impl Classifier<'static> {
    /// Classifier over the canonical registry
    pub fn canonical() -> Self {
        Self::new(ThresholdRegistry::canonical())
    }
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::canonical()
    }
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a ThresholdRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a ThresholdRegistry {
        self.registry
    }

    pub fn classify(&self, reading: &Reading) -> Result<Verdict> {
        self.classify_detailed(reading).map(|c| c.verdict)
    }

    /// Cooling curves need both checkpoints; any other category is rejected here
    pub fn classify_cooling_curve(&self, reading: &Reading) -> Result<Verdict> {
        if reading.category != ReadingCategory::CoolingCurve {
            return Err(EngineError::InvalidReading(format!(
                "expected a CoolingCurve reading, got {}",
                reading.category
            )));
        }
        self.classify(reading)
    }

    /// Verdict together with the rule's label and expected range
    pub fn classify_detailed(&self, reading: &Reading) -> Result<Classification> {
        reading.validate()?;
        let rule = self.registry.get_rule(reading.category)?;
        let verdict = evaluate_rule(rule, reading)?;

        Ok(Classification {
            verdict,
            label: rule.label(verdict).to_string(),
            expected_range: rule.expected_range(reading.goods_type),
        })
    }
}

fn evaluate_rule(rule: &ThresholdRule, reading: &Reading) -> Result<Verdict> {
    match &rule.bands {
        RuleBands::Single { table } => evaluate_table(rule, table, reading.primary_value),
        RuleBands::ByGoodsType { frozen, chilled } => {
            let table = match reading.goods_type {
                Some(GoodsType::Frozen) => frozen,
                Some(GoodsType::Chilled) => chilled,
                None => {
                    return Err(EngineError::InvalidReading(format!(
                        "{} rule needs a goods type",
                        rule.category
                    )));
                }
            };
            evaluate_table(rule, table, reading.primary_value)
        }
        RuleBands::TwoStage { first, second } => {
            let later = reading.secondary_value.ok_or_else(|| {
                EngineError::InvalidReading(format!(
                    "{} rule needs a value at {}",
                    rule.category, second.name
                ))
            })?;
            let early = evaluate_table(rule, &first.table, reading.primary_value)?;
            let late = evaluate_table(rule, &second.table, later)?;
            Ok(early.combine(late))
        }
    }
}

fn evaluate_table(rule: &ThresholdRule, table: &BandTable, value: f64) -> Result<Verdict> {
    if !value.is_finite() {
        return Err(EngineError::InvalidReading(format!(
            "{} value is not finite ({})",
            rule.category, value
        )));
    }
    table.evaluate(value).ok_or_else(|| {
        EngineError::InvalidRegistry(format!(
            "{}: no band covers {}°C",
            rule.category, value
        ))
    })
}

/// Classify against the canonical registry
pub fn classify(reading: &Reading) -> Result<Verdict> {
    Classifier::canonical().classify(reading)
}

/// Classify a cooling curve against the canonical registry
pub fn classify_cooling_curve(reading: &Reading) -> Result<Verdict> {
    Classifier::canonical().classify_cooling_curve(reading)
}

/// Classify with label and expected range against the canonical registry
pub fn classify_detailed(reading: &Reading) -> Result<Classification> {
    Classifier::canonical().classify_detailed(reading)
}
