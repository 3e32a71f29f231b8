//! 매매 일지 라이브러리
//!
//! 거래 기록 저장, 기간별 자산 곡선과 낙폭/샤프 비율 등 성과 지표 계산을 지원합니다.

pub mod api;
pub mod config;
pub mod error;
pub mod market_data;
pub mod models;
pub mod performance;
pub mod store;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::JournalError;
pub use crate::models::equity::{EquityPoint, Granularity};
pub use crate::models::market_data::Quote;
pub use crate::models::trade::{TradeRecord, TradeSide, TradeStatus};
pub use crate::performance::{
    build_equity_curve, daily_returns, max_drawdown, period_key, sharpe, PerformanceReport,
    PerformanceSettings, TradeStatistics,
};
pub use crate::store::TradeRepository;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, JournalError>;
