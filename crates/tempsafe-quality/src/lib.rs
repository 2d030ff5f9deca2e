//! Tempsafe Quality: Compliance Reporting
//!
//! Aggregates classified readings into compliance reports for a period and
//! location, with per-category and per-location figures, a bucketed trend and
//! remediation recommendations driven by a [`ComplianceProfile`].
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tempsafe_core::{LocationFilter, Period, Reading, ReadingCategory};
//! use tempsafe_quality::aggregate;
//!
//! let at = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
//! let readings = vec![
//!     Reading::new(ReadingCategory::Fridge, 3.0, at, "kitchen", "sam"),
//!     Reading::new(ReadingCategory::Fridge, 9.5, at, "kitchen", "sam"),
//! ];
//! let period = Period::new(at, at).unwrap();
//!
//! let report = aggregate(&readings, &period, &LocationFilter::All).unwrap();
//! assert_eq!(report.compliance_rate, 50.0);
//! println!("{}", report.summary());
//! ```

pub mod compliance;
pub mod profile;
pub mod recommend;
pub mod trend;

pub use compliance::{
    aggregate, compliance_rate, CategoryCompliance, ComplianceAggregator, ComplianceReport,
    LocationCompliance,
};
pub use profile::ComplianceProfile;
pub use recommend::{generate_recommendations, remediation_for, Priority, Recommendation, RecommendationGenerator};
pub use trend::{TrendBucket, TrendDirection, TrendPoint};
