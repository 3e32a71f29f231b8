use serde::{Deserialize, Serialize};

use crate::models::equity::Granularity;
use crate::models::trade::TradeRecord;
use crate::performance::equity_curve::build_equity_curve;
use crate::performance::risk::max_drawdown;

/// 목표 수익 / 최대 낙폭 알림 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub target_total_pnl: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    TargetReached { total_pnl: f64, target: f64 },
    DrawdownBreached { drawdown_pct: f64, limit: f64 },
}

impl Alert {
    pub fn message(&self) -> String {
        match self {
            Alert::TargetReached { total_pnl, target } => {
                format!("수익 목표 달성: {:.2} (목표 {:.2})", total_pnl, target)
            }
            Alert::DrawdownBreached { drawdown_pct, limit } => {
                format!("최대 낙폭 도달: {:.2}% (한도 {:.2}%)", drawdown_pct, limit)
            }
        }
    }

    fn same_kind(&self, other: &Alert) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// 현재 거래 목록 기준으로 조건이 충족된 알림 목록
///
/// 낙폭은 일 단위 자산 곡선으로 계산한다.
pub fn evaluate_alerts(trades: &[TradeRecord], config: &AlertConfig, initial_equity: f64) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(target) = config.target_total_pnl {
        let total_pnl: f64 = trades.iter().map(|t| t.pnl()).sum();
        if total_pnl >= target {
            alerts.push(Alert::TargetReached { total_pnl, target });
        }
    }

    if let Some(limit) = config.max_drawdown_pct {
        let curve = build_equity_curve(trades, initial_equity, Granularity::Day);
        let drawdown_pct = max_drawdown(&curve);
        if drawdown_pct >= limit {
            alerts.push(Alert::DrawdownBreached { drawdown_pct, limit });
        }
    }

    alerts
}

/// 알림을 조건이 새로 충족될 때 한 번만 내보내는 감시기
///
/// 조건이 해제되면 다시 발생할 수 있다.
#[derive(Debug, Default)]
pub struct AlertMonitor {
    config: AlertConfig,
    active: Vec<Alert>,
}

impl AlertMonitor {
    pub fn new(config: AlertConfig) -> Self {
        AlertMonitor {
            config,
            active: Vec::new(),
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AlertConfig) {
        self.config = config;
        self.active.clear();
    }

    /// 새로 발생한 알림만 반환
    pub fn check(&mut self, trades: &[TradeRecord], initial_equity: f64) -> Vec<Alert> {
        let current = evaluate_alerts(trades, &self.config, initial_equity);

        let fired: Vec<Alert> = current
            .iter()
            .filter(|alert| !self.active.iter().any(|prev| prev.same_kind(alert)))
            .cloned()
            .collect();

        self.active = current;
        fired
    }
}
