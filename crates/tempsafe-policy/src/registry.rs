//! Threshold registry
//!
//! One rule per reading category. Each rule holds one or more band tables;
//! a band table is an ascending list of disjoint intervals covering the whole
//! real line, each mapped to a verdict. Boundaries are closed on the safer
//! side and open on the worse side.

use crate::verdict::Verdict;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tempsafe_core::{EngineError, GoodsType, ReadingCategory, Result};

/// Version tag of the built-in registry
pub const CANONICAL_VERSION: &str = "canonical@1.0";

static CANONICAL: Lazy<ThresholdRegistry> = Lazy::new(|| ThresholdRegistry {
    version: CANONICAL_VERSION.to_string(),
    rules: canonical_rules(),
});

/// One end of an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn value(&self) -> Option<f64> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(*v),
        }
    }
}

/// A contiguous range of temperatures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, x: f64) -> bool {
        let above_lower = match self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(a) => x >= a,
            Bound::Exclusive(a) => x > a,
        };
        let below_upper = match self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(b) => x <= b,
            Bound::Exclusive(b) => x < b,
        };
        above_lower && below_upper
    }

    /// Human description, e.g. "≤ 5.0°C" or "0.0°C to 4.0°C"
    pub fn describe(&self) -> String {
        match (self.lower, self.upper) {
            (Bound::Unbounded, Bound::Unbounded) => "any temperature".to_string(),
            (Bound::Unbounded, Bound::Inclusive(b)) => format!("≤ {:.1}°C", b),
            (Bound::Unbounded, Bound::Exclusive(b)) => format!("< {:.1}°C", b),
            (Bound::Inclusive(a), Bound::Unbounded) => format!("≥ {:.1}°C", a),
            (Bound::Exclusive(a), Bound::Unbounded) => format!("> {:.1}°C", a),
            (Bound::Inclusive(a), Bound::Inclusive(b)) => format!("{:.1}°C to {:.1}°C", a, b),
            (lower, upper) => {
                let open = if matches!(lower, Bound::Inclusive(_)) { '[' } else { '(' };
                let close = if matches!(upper, Bound::Inclusive(_)) { ']' } else { ')' };
                format!(
                    "{}{:.1}°C, {:.1}°C{}",
                    open,
                    lower.value().unwrap_or(f64::NEG_INFINITY),
                    upper.value().unwrap_or(f64::INFINITY),
                    close
                )
            }
        }
    }

    fn check_well_formed(&self) -> std::result::Result<(), String> {
        for v in [self.lower.value(), self.upper.value()].into_iter().flatten() {
            if !v.is_finite() {
                return Err(format!("non-finite bound {}", v));
            }
        }
        if let (Some(a), Some(b)) = (self.lower.value(), self.upper.value()) {
            let both_inclusive = matches!(
                (self.lower, self.upper),
                (Bound::Inclusive(_), Bound::Inclusive(_))
            );
            if a > b || (a == b && !both_inclusive) {
                return Err(format!("empty interval {}", self.describe()));
            }
        }
        Ok(())
    }
}

/// An interval mapped to a verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub interval: Interval,
    pub verdict: Verdict,
}

impl Band {
    pub fn new(lower: Bound, upper: Bound, verdict: Verdict) -> Self {
        Self {
            interval: Interval::new(lower, upper),
            verdict,
        }
    }
}

/// Ordered bands, first match wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<Band>,
}

impl BandTable {
    pub fn new(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    /// Verdict of the first band containing `x`
    pub fn evaluate(&self, x: f64) -> Option<Verdict> {
        self.bands
            .iter()
            .find(|b| b.interval.contains(x))
            .map(|b| b.verdict)
    }

    /// Number of bands containing `x`; exactly 1 for a valid table and finite `x`
    pub fn match_count(&self, x: f64) -> usize {
        self.bands.iter().filter(|b| b.interval.contains(x)).count()
    }

    /// Description of the Safe band(s)
    pub fn safe_range(&self) -> String {
        let safe: Vec<String> = self
            .bands
            .iter()
            .filter(|b| b.verdict.is_safe())
            .map(|b| b.interval.describe())
            .collect();

        if safe.is_empty() {
            "no safe range".to_string()
        } else {
            safe.join(" or ")
        }
    }

    pub fn has_verdict(&self, verdict: Verdict) -> bool {
        self.bands.iter().any(|b| b.verdict == verdict)
    }

    /// Bands must run from -∞ to +∞ in ascending order, each meeting the next
    /// at a shared bound that is closed on exactly one side.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let (first, last) = match (self.bands.first(), self.bands.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err("band table is empty".to_string()),
        };

        if first.interval.lower != Bound::Unbounded {
            return Err(format!("gap below {}", first.interval.describe()));
        }
        if last.interval.upper != Bound::Unbounded {
            return Err(format!("gap above {}", last.interval.describe()));
        }

        for band in &self.bands {
            band.interval.check_well_formed()?;
        }

        for pair in self.bands.windows(2) {
            let (upper, lower) = (pair[0].interval.upper, pair[1].interval.lower);
            match (upper, lower) {
                (Bound::Inclusive(a), Bound::Exclusive(b))
                | (Bound::Exclusive(a), Bound::Inclusive(b))
                    if a == b => {}
                (Bound::Inclusive(a), Bound::Inclusive(b)) if a == b => {
                    return Err(format!("bands overlap at {:.1}°C", a));
                }
                (Bound::Exclusive(a), Bound::Exclusive(b)) if a == b => {
                    return Err(format!("{:.1}°C belongs to no band", a));
                }
                _ => {
                    return Err(format!(
                        "{} is not followed contiguously by {}",
                        pair[0].interval.describe(),
                        pair[1].interval.describe()
                    ));
                }
            }
        }

        Ok(())
    }
}

/// A named stage of a multi-checkpoint rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub table: BandTable,
}

/// Band layout of a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RuleBands {
    /// One value, one table
    Single { table: BandTable },
    /// Table chosen by the reading's goods type
    ByGoodsType { frozen: BandTable, chilled: BandTable },
    /// Two values; the verdict is the worse of the two checkpoints
    TwoStage { first: Checkpoint, second: Checkpoint },
}

/// Which verdicts a rule may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiers {
    /// Safe / Warning / Danger
    Three,
    /// Safe / Danger only (probe calibration)
    Binary,
}

/// Safety rule for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub category: ReadingCategory,
    pub tiers: Tiers,
    pub bands: RuleBands,
    pub labels: BTreeMap<Verdict, String>,
}

impl ThresholdRule {
    pub fn new(category: ReadingCategory, tiers: Tiers, bands: RuleBands) -> Self {
        Self {
            category,
            tiers,
            bands,
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, verdict: Verdict, label: impl Into<String>) -> Self {
        self.labels.insert(verdict, label.into());
        self
    }

    /// Badge text for a verdict under this rule
    pub fn label(&self, verdict: Verdict) -> &str {
        self.labels
            .get(&verdict)
            .map(String::as_str)
            .unwrap_or_else(|| verdict.as_str())
    }

    /// Every band table the rule holds
    pub fn tables(&self) -> Vec<&BandTable> {
        match &self.bands {
            RuleBands::Single { table } => vec![table],
            RuleBands::ByGoodsType { frozen, chilled } => vec![frozen, chilled],
            RuleBands::TwoStage { first, second } => vec![&first.table, &second.table],
        }
    }

    /// Description of what a compliant reading looks like
    pub fn expected_range(&self, goods_type: Option<GoodsType>) -> String {
        match (&self.bands, goods_type) {
            (RuleBands::Single { table }, _) => table.safe_range(),
            (RuleBands::ByGoodsType { frozen, .. }, Some(GoodsType::Frozen)) => {
                format!("frozen goods {}", frozen.safe_range())
            }
            (RuleBands::ByGoodsType { chilled, .. }, Some(GoodsType::Chilled)) => {
                format!("chilled goods {}", chilled.safe_range())
            }
            (RuleBands::ByGoodsType { frozen, chilled }, None) => format!(
                "frozen goods {}; chilled goods {}",
                frozen.safe_range(),
                chilled.safe_range()
            ),
            (RuleBands::TwoStage { first, second }, _) => format!(
                "{} at {} and {} at {}",
                first.table.safe_range(),
                first.name,
                second.table.safe_range(),
                second.name
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| EngineError::InvalidRegistry(format!("{}: {}", self.category, msg));

        for table in self.tables() {
            table.validate().map_err(fail)?;
            if self.tiers == Tiers::Binary && table.has_verdict(Verdict::Warning) {
                return Err(fail("binary rule must not have a Warning band".to_string()));
            }
        }
        Ok(())
    }
}

/// Versioned set of rules, at most one per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRegistry {
    pub version: String,
    pub rules: Vec<ThresholdRule>,
}

impl ThresholdRegistry {
    /// The built-in registry every call site shares
    pub fn canonical() -> &'static ThresholdRegistry {
        &CANONICAL
    }

    /// Build a registry from explicit rules, validating every band table
    pub fn from_rules(version: impl Into<String>, rules: Vec<ThresholdRule>) -> Result<Self> {
        let registry = Self {
            version: version.into(),
            rules,
        };
        registry.validate()?;
        Ok(registry)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.category) {
                return Err(EngineError::InvalidRegistry(format!(
                    "duplicate rule for {}",
                    rule.category
                )));
            }
            rule.validate()?;
        }
        Ok(())
    }

    pub fn get_rule(&self, category: ReadingCategory) -> Result<&ThresholdRule> {
        self.rules
            .iter()
            .find(|r| r.category == category)
            .ok_or_else(|| EngineError::UnknownCategory(category.to_string()))
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Look up a rule in the canonical registry
pub fn get_rule(category: ReadingCategory) -> Result<&'static ThresholdRule> {
    ThresholdRegistry::canonical().get_rule(category)
}

fn three_tier(safe_max: f64, warning_max: f64) -> BandTable {
    BandTable::new(vec![
        Band::new(Bound::Unbounded, Bound::Inclusive(safe_max), Verdict::Safe),
        Band::new(Bound::Exclusive(safe_max), Bound::Inclusive(warning_max), Verdict::Warning),
        Band::new(Bound::Exclusive(warning_max), Bound::Unbounded, Verdict::Danger),
    ])
}

fn calibration_window(min: f64, max: f64) -> BandTable {
    BandTable::new(vec![
        Band::new(Bound::Unbounded, Bound::Exclusive(min), Verdict::Danger),
        Band::new(Bound::Inclusive(min), Bound::Inclusive(max), Verdict::Safe),
        Band::new(Bound::Exclusive(max), Bound::Unbounded, Verdict::Danger),
    ])
}

fn canonical_rules() -> Vec<ThresholdRule> {
    let food_hot = BandTable::new(vec![
        Band::new(Bound::Unbounded, Bound::Exclusive(60.0), Verdict::Danger),
        Band::new(Bound::Inclusive(60.0), Bound::Exclusive(63.0), Verdict::Warning),
        Band::new(Bound::Inclusive(63.0), Bound::Unbounded, Verdict::Safe),
    ]);

    // Below zero risks freezing chilled stock, so it warns rather than passes
    let fridge = BandTable::new(vec![
        Band::new(Bound::Unbounded, Bound::Exclusive(0.0), Verdict::Warning),
        Band::new(Bound::Inclusive(0.0), Bound::Inclusive(4.0), Verdict::Safe),
        Band::new(Bound::Exclusive(4.0), Bound::Inclusive(8.0), Verdict::Warning),
        Band::new(Bound::Exclusive(8.0), Bound::Unbounded, Verdict::Danger),
    ]);

    vec![
        ThresholdRule::new(
            ReadingCategory::FoodHot,
            Tiers::Three,
            RuleBands::Single { table: food_hot },
        ),
        ThresholdRule::new(
            ReadingCategory::FoodCold,
            Tiers::Three,
            RuleBands::Single { table: three_tier(5.0, 8.0) },
        ),
        ThresholdRule::new(
            ReadingCategory::Fridge,
            Tiers::Three,
            RuleBands::Single { table: fridge },
        ),
        ThresholdRule::new(
            ReadingCategory::Freezer,
            Tiers::Three,
            RuleBands::Single { table: three_tier(-18.0, -15.0) },
        )
        .with_label(Verdict::Warning, "FROZEN WARNING"),
        ThresholdRule::new(
            ReadingCategory::Delivery,
            Tiers::Three,
            RuleBands::ByGoodsType {
                frozen: three_tier(-15.0, -12.0),
                chilled: three_tier(5.0, 8.0),
            },
        )
        .with_label(Verdict::Safe, "ACCEPT")
        .with_label(Verdict::Warning, "ACCEPT WITH CAUTION")
        .with_label(Verdict::Danger, "REJECT"),
        ThresholdRule::new(
            ReadingCategory::CoolingCurve,
            Tiers::Three,
            RuleBands::TwoStage {
                first: Checkpoint {
                    name: "90 minutes".to_string(),
                    table: three_tier(21.0, 25.0),
                },
                second: Checkpoint {
                    name: "2 hours".to_string(),
                    table: three_tier(5.0, 8.0),
                },
            },
        )
        .with_label(Verdict::Safe, "PASS")
        .with_label(Verdict::Danger, "FAIL"),
        ThresholdRule::new(
            ReadingCategory::ProbeCalibrationIce,
            Tiers::Binary,
            RuleBands::Single { table: calibration_window(-1.0, 1.0) },
        )
        .with_label(Verdict::Safe, "VALID")
        .with_label(Verdict::Danger, "OUT OF RANGE"),
        ThresholdRule::new(
            ReadingCategory::ProbeCalibrationBoiling,
            Tiers::Binary,
            RuleBands::Single { table: calibration_window(99.0, 101.0) },
        )
        .with_label(Verdict::Safe, "VALID")
        .with_label(Verdict::Danger, "OUT OF RANGE"),
    ]
}
