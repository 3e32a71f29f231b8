use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::api::AppState;
use crate::error::JournalError;

/// 저널 API 라우트 생성
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // 거래
        .route("/trades", get(handlers::list_trades).post(handlers::create_trade))
        .route(
            "/trades/:id",
            get(handlers::get_trade)
                .put(handlers::update_trade)
                .delete(handlers::delete_trade),
        )
        // 성과
        .route("/performance/equity", get(handlers::equity_curve))
        .route("/performance/report", get(handlers::performance_report))
        .route("/alerts", get(handlers::alerts))
        .route(
            "/alerts/config",
            get(handlers::alert_config).put(handlers::update_alert_config),
        )
        // 시세
        .route("/market/:symbol", get(handlers::market_quote))
        .with_state(state)
        .layer(cors)
}

/// API 서버 실행
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), JournalError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("서버 시작: http://{}/", addr);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
