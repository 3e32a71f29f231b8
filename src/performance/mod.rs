//! 성과 지표 엔진
//!
//! 거래 목록 -> 기간별 자산 곡선 -> 낙폭/샤프 비율 등 파생 지표.
//! 모든 함수는 입력만으로 결과가 정해지는 순수 함수다.

pub mod alerts;
pub mod equity_curve;
pub mod period;
pub mod report;
pub mod risk;
pub mod statistics;

pub use alerts::{evaluate_alerts, Alert, AlertConfig, AlertMonitor};
pub use equity_curve::build_equity_curve;
pub use period::period_key;
pub use report::{PerformanceReport, PerformanceSettings};
pub use risk::{daily_returns, max_drawdown, sharpe, DEFAULT_PERIODS_PER_YEAR};
pub use statistics::TradeStatistics;
