use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JournalError;

/// 자산 곡선 집계 단위
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Granularity::Day),
            "week" | "weekly" | "w" => Ok(Granularity::Week),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            other => Err(JournalError::InvalidParameter(format!("Unknown granularity: {}", other))),
        }
    }
}

/// 기간 키와 그 기간 말 자산
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub period_key: String,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(period_key: impl Into<String>, equity: f64) -> Self {
        EquityPoint {
            period_key: period_key.into(),
            equity,
        }
    }
}
