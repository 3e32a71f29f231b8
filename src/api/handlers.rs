// 저널 API 핸들러

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::JournalError;
use crate::models::equity::{EquityPoint, Granularity};
use crate::models::market_data::Quote;
use crate::models::trade::TradeRecord;
use crate::performance::{
    build_equity_curve, evaluate_alerts, Alert, AlertConfig, PerformanceReport, PerformanceSettings,
};
use crate::utils::logging;

/// API 에러 응답 래퍼
#[derive(Debug)]
pub struct ApiError(pub JournalError);

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            JournalError::TradeNotFound(_) => StatusCode::NOT_FOUND,
            JournalError::InvalidParameter(_) | JournalError::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
            JournalError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            logging::log_error("API 요청 처리", &self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Debug, Default, Deserialize)]
pub struct TradeFilter {
    pub symbol: Option<String>,
}

/// 거래 목록 조회
pub async fn list_trades(
    State(state): State<AppState>,
    Query(filter): Query<TradeFilter>,
) -> ApiResult<Json<Vec<TradeRecord>>> {
    let repo = state.repository.read().await;
    let trades = match filter.symbol.as_deref() {
        Some(symbol) => repo.find_by_symbol(symbol).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(trades))
}

/// 거래 생성
pub async fn create_trade(
    State(state): State<AppState>,
    Json(trade): Json<TradeRecord>,
) -> ApiResult<(StatusCode, Json<TradeRecord>)> {
    if trade.symbol.trim().is_empty() {
        return Err(JournalError::InvalidParameter("symbol is required".to_string()).into());
    }

    let mut repo = state.repository.write().await;
    if repo.find_by_id(&trade.id).await?.is_some() {
        return Err(JournalError::InvalidParameter(format!("Trade already exists: {}", trade.id)).into());
    }

    repo.save(&trade).await?;
    log::info!("거래 생성: {} - 심볼: {}", trade.id, trade.symbol);

    Ok((StatusCode::CREATED, Json(trade)))
}

/// 단일 거래 조회
pub async fn get_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TradeRecord>> {
    let repo = state.repository.read().await;
    repo.find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| JournalError::TradeNotFound(id).into())
}

/// 거래 갱신 (경로의 ID가 본문보다 우선)
pub async fn update_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut trade): Json<TradeRecord>,
) -> ApiResult<Json<TradeRecord>> {
    trade.id = id;
    trade.updated_at = Utc::now();

    let mut repo = state.repository.write().await;
    repo.update(&trade).await?;
    log::info!("거래 갱신: {}", trade.id);

    Ok(Json(trade))
}

/// 거래 삭제
pub async fn delete_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut repo = state.repository.write().await;
    if repo.delete(&id).await? {
        log::info!("거래 삭제: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JournalError::TradeNotFound(id).into())
    }
}

/// 성과 계산 쿼리 (없는 값은 서버 설정 사용)
#[derive(Debug, Default, Deserialize)]
pub struct PerformanceQuery {
    pub granularity: Option<String>,
    pub initial_equity: Option<f64>,
    pub periods_per_year: Option<f64>,
}

impl PerformanceQuery {
    pub fn settings(&self, base: &PerformanceSettings) -> Result<PerformanceSettings, JournalError> {
        let mut settings = base.clone();

        if let Some(granularity) = self.granularity.as_deref() {
            settings.granularity = granularity.parse::<Granularity>()?;
        }
        if let Some(initial_equity) = self.initial_equity {
            if !initial_equity.is_finite() {
                return Err(JournalError::InvalidParameter("initial_equity must be finite".to_string()));
            }
            settings.initial_equity = initial_equity;
        }
        if let Some(periods) = self.periods_per_year {
            if periods.is_nan() || periods <= 0.0 {
                return Err(JournalError::InvalidParameter("periods_per_year must be positive".to_string()));
            }
            settings.periods_per_year = periods;
        }

        Ok(settings)
    }
}

/// 자산 곡선 조회
pub async fn equity_curve(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> ApiResult<Json<Vec<EquityPoint>>> {
    let settings = query.settings(&state.settings)?;
    let trades = state.repository.read().await.find_all().await?;

    Ok(Json(build_equity_curve(&trades, settings.initial_equity, settings.granularity)))
}

/// 성과 보고서 조회
pub async fn performance_report(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> ApiResult<Json<PerformanceReport>> {
    let settings = query.settings(&state.settings)?;
    let trades = state.repository.read().await.find_all().await?;

    Ok(Json(PerformanceReport::build(&trades, &settings)))
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    /// 현재 조건이 충족된 알림
    pub active: Vec<Alert>,
    /// 이번 조회에서 새로 발생한 알림
    pub fired: Vec<Alert>,
}

/// 알림 상태 조회
pub async fn alerts(State(state): State<AppState>) -> ApiResult<Json<AlertsResponse>> {
    let trades = state.repository.read().await.find_all().await?;
    let initial_equity = state.settings.initial_equity;

    let mut monitor = state.alerts.write().await;
    let active = evaluate_alerts(&trades, monitor.config(), initial_equity);
    let fired = monitor.check(&trades, initial_equity);

    for alert in &fired {
        logging::log_alert(&alert.message());
    }

    Ok(Json(AlertsResponse { active, fired }))
}

/// 알림 설정 조회
pub async fn alert_config(State(state): State<AppState>) -> Json<AlertConfig> {
    Json(state.alerts.read().await.config().clone())
}

/// 알림 설정 변경 (발생 상태 초기화)
pub async fn update_alert_config(
    State(state): State<AppState>,
    Json(config): Json<AlertConfig>,
) -> ApiResult<Json<AlertConfig>> {
    let limits = [config.target_total_pnl, config.max_drawdown_pct];
    if limits.iter().flatten().any(|v| !v.is_finite()) {
        return Err(JournalError::InvalidParameter("alert limits must be finite".to_string()).into());
    }

    state.alerts.write().await.set_config(config.clone());
    log::info!("알림 설정 변경: {:?}", config);

    Ok(Json(config))
}

/// 현재 시세 조회
pub async fn market_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Quote>> {
    let quote = state.quotes.quote(&symbol).await?;
    Ok(Json(quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::MockQuoteProvider;
    use crate::performance::AlertMonitor;
    use crate::store::InMemoryTradeRepository;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn state_with(provider: MockQuoteProvider) -> AppState {
        AppState {
            repository: Arc::new(RwLock::new(InMemoryTradeRepository::new())),
            quotes: Arc::new(provider),
            settings: PerformanceSettings::default(),
            alerts: Arc::new(RwLock::new(AlertMonitor::new(AlertConfig::default()))),
        }
    }

    #[test]
    fn test_query_overrides_settings() {
        let query = PerformanceQuery {
            granularity: Some("month".to_string()),
            initial_equity: Some(500.0),
            periods_per_year: None,
        };

        let settings = query.settings(&PerformanceSettings::default()).unwrap();
        assert_eq!(settings.granularity, Granularity::Month);
        assert_eq!(settings.initial_equity, 500.0);
        assert_eq!(settings.periods_per_year, 252.0);
    }

    #[test]
    fn test_query_rejects_bad_values() {
        let bad_granularity = PerformanceQuery {
            granularity: Some("hour".to_string()),
            ..PerformanceQuery::default()
        };
        assert!(bad_granularity.settings(&PerformanceSettings::default()).is_err());

        let bad_periods = PerformanceQuery {
            periods_per_year: Some(0.0),
            ..PerformanceQuery::default()
        };
        assert!(bad_periods.settings(&PerformanceSettings::default()).is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        let not_found = ApiError(JournalError::TradeNotFound("x".to_string())).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let provider = ApiError(JournalError::ProviderError("down".to_string())).into_response();
        assert_eq!(provider.status(), StatusCode::BAD_GATEWAY);

        let lock = ApiError(JournalError::LockError).into_response();
        assert_eq!(lock.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_alert_config_rejects_non_finite() {
        let state = state_with(MockQuoteProvider::new());
        let config = AlertConfig {
            target_total_pnl: Some(f64::NAN),
            max_drawdown_pct: None,
        };

        let err = update_alert_config(State(state.clone()), Json(config)).await.unwrap_err();
        assert!(matches!(err.0, JournalError::InvalidParameter(_)));
        assert_eq!(state.alerts.read().await.config(), &AlertConfig::default());
    }

    #[tokio::test]
    async fn test_market_quote_uses_provider() {
        let mut provider = MockQuoteProvider::new();
        provider
            .expect_quote()
            .times(1)
            .returning(|symbol| Ok(Quote::new(symbol, 99.5, 0)));

        let state = state_with(provider);
        let Json(quote) = market_quote(State(state), Path("AAPL".to_string())).await.unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 99.5);
    }

    #[tokio::test]
    async fn test_market_quote_provider_failure() {
        let mut provider = MockQuoteProvider::new();
        provider
            .expect_quote()
            .returning(|_| Err(JournalError::ProviderError("timeout".to_string())));

        let state = state_with(provider);
        let err = market_quote(State(state), Path("AAPL".to_string())).await.unwrap_err();

        assert!(matches!(err.0, JournalError::ProviderError(_)));
    }
}
