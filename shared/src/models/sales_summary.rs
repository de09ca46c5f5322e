//! Sales Summary Model (売上サマリー)
//!
//! Presentation types produced by the summary aggregator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reporting period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised period name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period: {0} (expected day, week, month or year)")]
pub struct InvalidPeriod(pub String);

impl FromStr for ReportPeriod {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(InvalidPeriod(s.to_string())),
        }
    }
}

/// Aggregated sales metrics for one period, compared with the prior period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub period: ReportPeriod,
    /// Current window start (Unix millis, inclusive)
    pub start: i64,
    /// Current window end (Unix millis, exclusive)
    pub end: i64,

    pub total_sales: i64,
    /// Percent change vs previous period
    pub sales_trend: i64,
    pub sales_progress: f64,

    /// Distinct customers
    pub customer_count: i64,
    pub customer_trend: i64,
    pub customer_progress: f64,

    pub average_transaction: i64,
    pub avg_transaction_trend: i64,
    pub avg_transaction_progress: f64,

    pub new_customers: i64,
    pub new_customer_trend: i64,
    pub new_customer_progress: f64,

    /// Number of counted sales records
    pub total_transactions: i64,
    pub by_payment_method: BTreeMap<String, i64>,
    pub by_service: BTreeMap<String, i64>,
    pub by_staff: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_period() {
        assert_eq!("day".parse::<ReportPeriod>().unwrap(), ReportPeriod::Day);
        assert_eq!(" Week ".parse::<ReportPeriod>().unwrap(), ReportPeriod::Week);
        assert_eq!("MONTH".parse::<ReportPeriod>().unwrap(), ReportPeriod::Month);
        assert_eq!("year".parse::<ReportPeriod>().unwrap(), ReportPeriod::Year);
        let err = "quarter".parse::<ReportPeriod>().unwrap_err();
        assert_eq!(err, InvalidPeriod("quarter".into()));
    }

    #[test]
    fn period_wire_format() {
        assert_eq!(serde_json::to_string(&ReportPeriod::Week).unwrap(), "\"week\"");
        assert_eq!(ReportPeriod::Year.to_string(), "year");
    }
}
