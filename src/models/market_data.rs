use serde::{Deserialize, Serialize};

/// 시세 제공자가 돌려주는 현재가 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub volume: f64,
    /// 밀리초 단위 유닉스 시각
    pub timestamp: i64,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64, timestamp: i64) -> Self {
        Quote {
            symbol: symbol.into(),
            price,
            change: 0.0,
            change_percent: 0.0,
            volume: 0.0,
            timestamp,
        }
    }
}
