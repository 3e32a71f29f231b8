use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JournalError;
use crate::utils::deserialize_timestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Planned,
    #[default]
    Pending,
    Active,
    Closed,
    Cancelled,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Planned => "planned",
            TradeStatus::Pending => "pending",
            TradeStatus::Active => "active",
            TradeStatus::Closed => "closed",
            TradeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(TradeStatus::Planned),
            "pending" => Ok(TradeStatus::Pending),
            "active" => Ok(TradeStatus::Active),
            "closed" => Ok(TradeStatus::Closed),
            "cancelled" | "canceled" => Ok(TradeStatus::Cancelled),
            other => Err(JournalError::InvalidParameter(format!("Unknown trade status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[default]
    Long,
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "long",
            TradeSide::Short => "short",
        }
    }

    /// 가져오기 파일의 방향 표기 해석 (short/sell 외에는 모두 long)
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "short" | "sell" => TradeSide::Short,
            _ => TradeSide::Long,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn new_trade_id() -> String {
    Uuid::new_v4().to_string()
}

/// 매매 일지의 거래 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    #[serde(default = "new_trade_id")]
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub stock_name: String,
    #[serde(default)]
    pub status: TradeStatus,
    #[serde(default)]
    pub side: TradeSide,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub entry_quantity: Option<f64>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub exit_quantity: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl: Option<f64>,
    #[serde(default)]
    pub realized_pnl: Option<f64>,
    #[serde(default)]
    pub net_pnl: Option<f64>,
    #[serde(default)]
    pub commission: Option<f64>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn new(symbol: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        TradeRecord {
            id: new_trade_id(),
            symbol: symbol.into(),
            stock_name: String::new(),
            status: TradeStatus::Pending,
            side: TradeSide::Long,
            entry_price: None,
            entry_quantity: None,
            exit_price: None,
            exit_quantity: None,
            unrealized_pnl: None,
            realized_pnl: None,
            net_pnl: None,
            commission: None,
            strategy: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_net_pnl(mut self, pnl: f64) -> Self {
        self.net_pnl = Some(pnl);
        self
    }

    pub fn with_realized_pnl(mut self, pnl: f64) -> Self {
        self.realized_pnl = Some(pnl);
        self
    }

    pub fn with_entry(mut self, side: TradeSide, price: f64, quantity: f64) -> Self {
        self.side = side;
        self.entry_price = Some(price);
        self.entry_quantity = Some(quantity);
        self
    }

    pub fn with_status(mut self, status: TradeStatus) -> Self {
        self.status = status;
        self
    }

    /// 손익 집계에 쓰이는 값
    ///
    /// 순손익을 우선하고, 없거나 0이거나 유한하지 않으면 실현손익, 그것도 없으면 0.
    pub fn pnl(&self) -> f64 {
        self.net_pnl
            .filter(|v| v.is_finite() && *v != 0.0)
            .or_else(|| self.realized_pnl.filter(|v| v.is_finite()))
            .unwrap_or(0.0)
    }

    /// 청산 손익이 기록된 거래인지
    pub fn has_pnl(&self) -> bool {
        self.net_pnl.is_some() || self.realized_pnl.is_some()
    }

    /// 중복 판별 키 (심볼 + 생성 시각)
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.symbol, self.created_at.timestamp_millis())
    }
}
