//! HTTP API
//!
//! 거래 CRUD, 성과 지표, 알림, 시세 조회

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::market_data::QuoteProvider;
use crate::performance::{AlertMonitor, PerformanceSettings};
use crate::store::TradeRepository;

pub use routes::{build_router, serve};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<RwLock<dyn TradeRepository>>,
    pub quotes: Arc<dyn QuoteProvider>,
    pub settings: PerformanceSettings,
    pub alerts: Arc<RwLock<AlertMonitor>>,
}
