use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::trade::TradeRecord;

/// 거래 성과 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub total_pnl: f64,
    /// 승률 (%)
    pub win_rate: f64,
    pub average_profit: f64,
    /// 평균 손실 (절댓값)
    pub average_loss: f64,
    pub profit_loss_ratio: f64,
    /// 총이익 / 총손실. 손실이 없으면 None
    pub profit_factor: Option<f64>,
    pub trading_days: usize,
    pub average_trades_per_day: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
}

impl TradeStatistics {
    /// 거래 목록에서 통계 계산
    ///
    /// 손익 관련 수치는 손익이 기록된(청산된) 거래만 대상으로 한다.
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut closed: Vec<&TradeRecord> = trades.iter().filter(|t| t.has_pnl()).collect();
        closed.sort_by_key(|t| t.created_at);

        let pnls: Vec<f64> = closed.iter().map(|t| t.pnl()).collect();
        let wins: Vec<f64> = pnls.iter().copied().filter(|p| *p > 0.0).collect();
        let losses: Vec<f64> = pnls.iter().copied().filter(|p| *p < 0.0).collect();

        let total_pnl: f64 = pnls.iter().sum();
        let gross_profit: f64 = wins.iter().sum();
        let gross_loss: f64 = losses.iter().map(|l| l.abs()).sum();

        let win_rate = if pnls.is_empty() {
            0.0
        } else {
            wins.len() as f64 / pnls.len() as f64 * 100.0
        };

        let average_profit = if wins.is_empty() { 0.0 } else { gross_profit / wins.len() as f64 };
        let average_loss = if losses.is_empty() { 0.0 } else { gross_loss / losses.len() as f64 };

        let profit_loss_ratio = if average_loss > 0.0 {
            average_profit / average_loss
        } else {
            0.0
        };

        let trading_days = trades
            .iter()
            .map(|t| t.created_at.date_naive())
            .collect::<HashSet<_>>()
            .len();

        let average_trades_per_day = if trading_days > 0 {
            trades.len() as f64 / trading_days as f64
        } else {
            0.0
        };

        let (longest_win_streak, longest_loss_streak) = streaks(&pnls);

        TradeStatistics {
            total_trades: trades.len(),
            closed_trades: pnls.len(),
            total_pnl,
            win_rate,
            average_profit,
            average_loss,
            profit_loss_ratio,
            profit_factor: profit_factor(gross_profit, gross_loss),
            trading_days,
            average_trades_per_day,
            longest_win_streak,
            longest_loss_streak,
        }
    }
}

fn profit_factor(gross_profit: f64, gross_loss: f64) -> Option<f64> {
    if gross_loss > 0.0 {
        Some(gross_profit / gross_loss)
    } else {
        None
    }
}

/// 최장 연승/연패. 손익 0은 패로 센다
fn streaks(pnls: &[f64]) -> (usize, usize) {
    let mut longest_win = 0;
    let mut longest_loss = 0;
    let mut current_win = 0;
    let mut current_loss = 0;

    for pnl in pnls {
        if *pnl > 0.0 {
            current_win += 1;
            current_loss = 0;
            longest_win = longest_win.max(current_win);
        } else {
            current_loss += 1;
            current_win = 0;
            longest_loss = longest_loss.max(current_loss);
        }
    }

    (longest_win, longest_loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_timestamp;

    fn trade(date: &str, pnl: Option<f64>) -> TradeRecord {
        let t = TradeRecord::new("MSFT", parse_timestamp(date).unwrap());
        match pnl {
            Some(p) => t.with_net_pnl(p),
            None => t,
        }
    }

    #[test]
    fn test_empty() {
        let stats = TradeStatistics::from_trades(&[]);
        assert_eq!(stats, TradeStatistics::default());
    }

    #[test]
    fn test_basic_statistics() {
        let trades = vec![
            trade("2024-01-01T10:00:00Z", Some(100.0)),
            trade("2024-01-01T14:00:00Z", Some(-50.0)),
            trade("2024-01-02", Some(200.0)),
            trade("2024-01-03", Some(-25.0)),
            trade("2024-01-03T12:00:00Z", None),
        ];

        let stats = TradeStatistics::from_trades(&trades);

        assert_eq!(stats.total_trades, 5);
        assert_eq!(stats.closed_trades, 4);
        assert_eq!(stats.total_pnl, 225.0);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.average_profit, 150.0);
        assert_eq!(stats.average_loss, 37.5);
        assert_eq!(stats.profit_loss_ratio, 4.0);
        assert_eq!(stats.profit_factor, Some(300.0 / 75.0));
        assert_eq!(stats.trading_days, 3);
        assert!((stats.average_trades_per_day - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_streaks_follow_chronological_order() {
        // 입력 순서와 무관하게 시간순으로 센다
        let trades = vec![
            trade("2024-01-05", Some(10.0)),
            trade("2024-01-01", Some(-1.0)),
            trade("2024-01-02", Some(0.0)),
            trade("2024-01-03", Some(-3.0)),
            trade("2024-01-04", Some(5.0)),
            trade("2024-01-06", Some(7.0)),
        ];

        let stats = TradeStatistics::from_trades(&trades);
        assert_eq!(stats.longest_loss_streak, 3);
        assert_eq!(stats.longest_win_streak, 3);
    }

    #[test]
    fn test_profit_factor_without_losses() {
        let only_wins = TradeStatistics::from_trades(&[trade("2024-01-01", Some(10.0))]);
        assert_eq!(only_wins.profit_factor, None);
        assert_eq!(only_wins.profit_loss_ratio, 0.0);

        let flat = TradeStatistics::from_trades(&[trade("2024-01-01", Some(0.0))]);
        assert_eq!(flat.profit_factor, None);
        assert_eq!(flat.win_rate, 0.0);
    }

    #[test]
    fn test_all_win_statistics_survive_json() {
        let stats = TradeStatistics::from_trades(&[
            trade("2024-01-01", Some(10.0)),
            trade("2024-01-02", Some(30.0)),
        ]);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"profit_factor\":null"));

        let parsed: TradeStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
