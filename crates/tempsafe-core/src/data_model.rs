//! Data Model: Reading, ReadingCategory, Period, LocationFilter
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of measurement a reading represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadingCategory {
    /// Hot-held food (bain-marie, hot cabinet)
    FoodHot,
    /// Cold-held food (display chiller, salad bar)
    FoodCold,
    Fridge,
    Freezer,
    /// Goods temperature at delivery; needs a [`GoodsType`]
    Delivery,
    /// Two checkpoints: 90 minutes and 2 hours after cooking
    CoolingCurve,
    /// Probe check in iced water
    ProbeCalibrationIce,
    /// Probe check in boiling water
    ProbeCalibrationBoiling,
}

impl ReadingCategory {
    pub const ALL: [ReadingCategory; 8] = [
        ReadingCategory::FoodHot,
        ReadingCategory::FoodCold,
        ReadingCategory::Fridge,
        ReadingCategory::Freezer,
        ReadingCategory::Delivery,
        ReadingCategory::CoolingCurve,
        ReadingCategory::ProbeCalibrationIce,
        ReadingCategory::ProbeCalibrationBoiling,
    ];

    /// Wire name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingCategory::FoodHot => "FoodHot",
            ReadingCategory::FoodCold => "FoodCold",
            ReadingCategory::Fridge => "Fridge",
            ReadingCategory::Freezer => "Freezer",
            ReadingCategory::Delivery => "Delivery",
            ReadingCategory::CoolingCurve => "CoolingCurve",
            ReadingCategory::ProbeCalibrationIce => "ProbeCalibrationIce",
            ReadingCategory::ProbeCalibrationBoiling => "ProbeCalibrationBoiling",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ReadingCategory::FoodHot => "Hot holding",
            ReadingCategory::FoodCold => "Cold holding",
            ReadingCategory::Fridge => "Fridge",
            ReadingCategory::Freezer => "Freezer",
            ReadingCategory::Delivery => "Delivery",
            ReadingCategory::CoolingCurve => "Cooling curve",
            ReadingCategory::ProbeCalibrationIce => "Probe calibration (ice)",
            ReadingCategory::ProbeCalibrationBoiling => "Probe calibration (boiling)",
        }
    }

    /// Categories whose readings describe food going to the consumer
    pub fn affects_consumer_health(&self) -> bool {
        matches!(
            self,
            ReadingCategory::FoodHot | ReadingCategory::FoodCold | ReadingCategory::Delivery
        )
    }

    pub fn is_probe_calibration(&self) -> bool {
        matches!(
            self,
            ReadingCategory::ProbeCalibrationIce | ReadingCategory::ProbeCalibrationBoiling
        )
    }
}

impl fmt::Display for ReadingCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReadingCategory {
    type Err = EngineError;

    /// Accepts `FoodHot`, `food_hot`, `food-hot` and so on, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect();

        ReadingCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| EngineError::UnknownCategory(s.to_string()))
    }
}

/// Goods-type discriminator for deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoodsType {
    Frozen,
    Chilled,
}

impl fmt::Display for GoodsType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GoodsType::Frozen => write!(f, "frozen"),
            GoodsType::Chilled => write!(f, "chilled"),
        }
    }
}

/// One logged measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub category: ReadingCategory,
    /// °C; for cooling curves, the 90-minute value
    pub primary_value: f64,
    /// Cooling curves only: the 2-hour value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
    /// Deliveries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_type: Option<GoodsType>,
    pub recorded_at: DateTime<Utc>,
    pub location_id: String,
    pub recorded_by: String,
}

impl Reading {
    /// Create a single-value reading
    pub fn new(
        category: ReadingCategory,
        value: f64,
        recorded_at: DateTime<Utc>,
        location_id: impl Into<String>,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self {
            category,
            primary_value: value,
            secondary_value: None,
            goods_type: None,
            recorded_at,
            location_id: location_id.into(),
            recorded_by: recorded_by.into(),
        }
    }

    /// Create a cooling-curve reading from its two checkpoints
    pub fn cooling_curve(
        at_90_minutes: f64,
        at_2_hours: f64,
        recorded_at: DateTime<Utc>,
        location_id: impl Into<String>,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self::new(
            ReadingCategory::CoolingCurve,
            at_90_minutes,
            recorded_at,
            location_id,
            recorded_by,
        )
        .with_secondary(at_2_hours)
    }

    /// Create a delivery reading
    pub fn delivery(
        goods_type: GoodsType,
        value: f64,
        recorded_at: DateTime<Utc>,
        location_id: impl Into<String>,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self::new(
            ReadingCategory::Delivery,
            value,
            recorded_at,
            location_id,
            recorded_by,
        )
        .with_goods_type(goods_type)
    }

    pub fn with_secondary(mut self, value: f64) -> Self {
        self.secondary_value = Some(value);
        self
    }

    pub fn with_goods_type(mut self, goods_type: GoodsType) -> Self {
        self.goods_type = Some(goods_type);
        self
    }

    /// Check the payload shape: finite values, and companion fields present
    /// exactly for the categories that use them.
    pub fn validate(&self) -> Result<()> {
        if !self.primary_value.is_finite() {
            return Err(EngineError::reading(format!(
                "{} primary value is not finite ({})",
                self.category, self.primary_value
            )));
        }

        match (self.category, self.secondary_value) {
            (ReadingCategory::CoolingCurve, None) => {
                return Err(EngineError::reading(
                    "CoolingCurve requires a 2-hour secondary value",
                ));
            }
            (ReadingCategory::CoolingCurve, Some(v)) if !v.is_finite() => {
                return Err(EngineError::reading(format!(
                    "CoolingCurve secondary value is not finite ({})",
                    v
                )));
            }
            (ReadingCategory::CoolingCurve, Some(_)) => {}
            (category, Some(_)) => {
                return Err(EngineError::reading(format!(
                    "{} does not take a secondary value",
                    category
                )));
            }
            (_, None) => {}
        }

        match (self.category, self.goods_type) {
            (ReadingCategory::Delivery, None) => Err(EngineError::reading(
                "Delivery requires a goods type (frozen or chilled)",
            )),
            (ReadingCategory::Delivery, Some(_)) => Ok(()),
            (category, Some(goods)) => Err(EngineError::reading(format!(
                "{} does not take a goods type (got {})",
                category, goods
            ))),
            (_, None) => Ok(()),
        }
    }
}

/// Inclusive reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let period = Self { start, end };
        period.validate()?;
        Ok(period)
    }

    /// Deserialized periods skip `new`, so callers re-check here
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(EngineError::InvalidPeriod {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Location restriction for a report. Serializes as the location id, or `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationFilter {
    #[default]
    All,
    Location(String),
}

impl LocationFilter {
    pub fn location(id: impl Into<String>) -> Self {
        LocationFilter::Location(id.into())
    }

    pub fn matches(&self, location_id: &str) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Location(id) => id == location_id,
        }
    }
}

impl From<String> for LocationFilter {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            LocationFilter::All
        } else {
            LocationFilter::Location(value)
        }
    }
}

impl From<LocationFilter> for String {
    fn from(value: LocationFilter) -> Self {
        match value {
            LocationFilter::All => "all".to_string(),
            LocationFilter::Location(id) => id,
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocationFilter::All => write!(f, "all"),
            LocationFilter::Location(id) => write!(f, "{}", id),
        }
    }
}
