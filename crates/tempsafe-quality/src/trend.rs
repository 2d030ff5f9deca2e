//! Time-bucketed compliance trends

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBucket {
    #[default]
    Day,
    /// ISO week, starting Monday
    Week,
}

impl TrendBucket {
    /// First day of the bucket containing `ts` (UTC)
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> NaiveDate {
        let date = ts.date_naive();
        match self {
            TrendBucket::Day => date,
            TrendBucket::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
        }
    }
}

/// Trend direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Compliance within one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub bucket_start: NaiveDate,
    pub total: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
}

/// Compare the mean rate of the first half of the buckets with the second half
pub fn direction(points: &[TrendPoint], sensitivity: f64) -> TrendDirection {
    if points.len() < 2 {
        return TrendDirection::Stable;
    }

    let half = points.len() / 2;
    let mean = |slice: &[TrendPoint]| {
        slice.iter().map(|p| p.compliance_rate).sum::<f64>() / slice.len() as f64
    };
    let diff = mean(&points[half..]) - mean(&points[..half]);

    if diff > sensitivity {
        TrendDirection::Improving
    } else if diff < -sensitivity {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(day: u32, rate: f64) -> TrendPoint {
        TrendPoint {
            bucket_start: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            total: 10,
            compliant: (rate / 10.0) as usize,
            compliance_rate: rate,
        }
    }

    #[test]
    fn test_week_bucket_starts_monday() {
        // 2024-04-11 is a Thursday
        let ts = Utc.with_ymd_and_hms(2024, 4, 11, 22, 15, 0).unwrap();
        assert_eq!(TrendBucket::Day.bucket_start(ts), NaiveDate::from_ymd_opt(2024, 4, 11).unwrap());
        assert_eq!(TrendBucket::Week.bucket_start(ts), NaiveDate::from_ymd_opt(2024, 4, 8).unwrap());
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction(&[], 5.0), TrendDirection::Stable);
        assert_eq!(direction(&[point(1, 50.0)], 5.0), TrendDirection::Stable);

        let rising = vec![point(1, 70.0), point(2, 75.0), point(3, 90.0), point(4, 95.0)];
        assert_eq!(direction(&rising, 5.0), TrendDirection::Improving);

        let falling = vec![point(1, 100.0), point(2, 90.0), point(3, 80.0)];
        assert_eq!(direction(&falling, 5.0), TrendDirection::Declining);

        let flat = vec![point(1, 90.0), point(2, 92.0)];
        assert_eq!(direction(&flat, 5.0), TrendDirection::Stable);
    }
}
