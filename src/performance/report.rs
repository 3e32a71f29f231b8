use serde::{Deserialize, Serialize};

use crate::models::equity::{EquityPoint, Granularity};
use crate::models::trade::TradeRecord;
use crate::performance::equity_curve::build_equity_curve;
use crate::performance::risk::{daily_returns, max_drawdown, sharpe, DEFAULT_PERIODS_PER_YEAR};
use crate::performance::statistics::TradeStatistics;

/// 성과 계산 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub initial_equity: f64,
    pub granularity: Granularity,
    pub periods_per_year: f64,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        PerformanceSettings {
            initial_equity: 100_000.0,
            granularity: Granularity::Day,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

/// 자산 곡선과 파생 지표 묶음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub settings: PerformanceSettings,
    pub equity_curve: Vec<EquityPoint>,
    pub returns: Vec<f64>,
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub statistics: TradeStatistics,
}

impl PerformanceReport {
    pub fn build(trades: &[TradeRecord], settings: &PerformanceSettings) -> Self {
        let equity_curve = build_equity_curve(trades, settings.initial_equity, settings.granularity);
        let returns = daily_returns(&equity_curve);

        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(settings.initial_equity);

        let total_return_pct = if settings.initial_equity > 0.0 {
            (final_equity - settings.initial_equity) / settings.initial_equity * 100.0
        } else {
            0.0
        };

        PerformanceReport {
            settings: settings.clone(),
            max_drawdown_pct: max_drawdown(&equity_curve),
            sharpe_ratio: sharpe(&returns, settings.periods_per_year),
            statistics: TradeStatistics::from_trades(trades),
            equity_curve,
            returns,
            final_equity,
            total_return_pct,
        }
    }

    /// 결과 요약 문자열 생성
    pub fn summary(&self) -> String {
        let period = match (self.equity_curve.first(), self.equity_curve.last()) {
            (Some(first), Some(last)) => format!("{} ~ {}", first.period_key, last.period_key),
            _ => "-".to_string(),
        };

        format!(
            "성과 요약 ({} 단위):\n\
             기간: {}\n\
             초기 자산: {:.2}\n\
             최종 자산: {:.2}\n\
             수익률: {:.2}%\n\
             최대 낙폭: {:.2}%\n\
             샤프 비율: {:.2}\n\
             거래 횟수: {} (청산 {})\n\
             승률: {:.2}%\n\
             평균 이익: {:.2} / 평균 손실: {:.2}\n\
             손익비: {:.2}\n\
             손익 팩터: {}\n\
             최장 연승: {} / 최장 연패: {}",
            self.settings.granularity,
            period,
            self.settings.initial_equity,
            self.final_equity,
            self.total_return_pct,
            self.max_drawdown_pct,
            self.sharpe_ratio,
            self.statistics.total_trades,
            self.statistics.closed_trades,
            self.statistics.win_rate,
            self.statistics.average_profit,
            self.statistics.average_loss,
            self.statistics.profit_loss_ratio,
            self.statistics
                .profit_factor
                .map(|pf| format!("{:.2}", pf))
                .unwrap_or_else(|| "-".to_string()),
            self.statistics.longest_win_streak,
            self.statistics.longest_loss_streak,
        )
    }
}
