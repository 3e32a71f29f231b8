//! API 통합 테스트
//!
//! 메모리 저장소와 고정 시세 제공자로 라우터 전체를 검증

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use tradelog::api::{build_router, AppState};
use tradelog::market_data::QuoteProvider;
use tradelog::performance::{AlertConfig, AlertMonitor, PerformanceReport, PerformanceSettings};
use tradelog::store::InMemoryTradeRepository;
use tradelog::{JournalError, Quote};

struct StaticQuoteProvider {
  price: f64,
}

#[async_trait]
impl QuoteProvider for StaticQuoteProvider {
  async fn quote(&self, symbol: &str) -> Result<Quote, JournalError> {
    if symbol == "FAIL" {
      return Err(JournalError::ProviderError("upstream unavailable".to_string()));
    }
    Ok(Quote::new(symbol, self.price, 1_704_067_200_000))
  }
}

fn app_with(alerts: AlertConfig) -> Router {
  let settings = PerformanceSettings {
    initial_equity: 1000.0,
    ..PerformanceSettings::default()
  };

  build_router(AppState {
    repository: Arc::new(RwLock::new(InMemoryTradeRepository::new())),
    quotes: Arc::new(StaticQuoteProvider { price: 123.0 }),
    settings,
    alerts: Arc::new(RwLock::new(AlertMonitor::new(alerts))),
  })
}

fn app() -> Router {
  app_with(AlertConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(body) => builder
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };

  (status, value)
}

async fn seed_three_days(app: &Router) {
  let trades = [
    ("t1", "2024-01-01T10:00:00Z", 100.0),
    ("t2", "2024-01-02T10:00:00Z", -50.0),
    ("t3", "2024-01-03T10:00:00Z", 200.0),
  ];

  for (id, created_at, pnl) in trades {
    let (status, _) = send(
      app,
      "POST",
      "/trades",
      Some(json!({ "id": id, "symbol": "005930", "created_at": created_at, "net_pnl": pnl })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }
}

#[tokio::test]
async fn test_health() {
  let app = app();
  let (status, body) = send(&app, "GET", "/health", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_trade_crud() {
  let app = app();

  let (status, created) = send(
    &app,
    "POST",
    "/trades",
    Some(json!({ "symbol": "AAPL", "created_at": "2024-01-05", "net_pnl": 12.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_str().unwrap().to_string();
  assert!(!id.is_empty());

  let (status, fetched) = send(&app, "GET", &format!("/trades/{}", id), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["symbol"], "AAPL");

  let (status, updated) = send(
    &app,
    "PUT",
    &format!("/trades/{}", id),
    Some(json!({ "symbol": "AAPL", "created_at": "2024-01-05", "net_pnl": 30.0, "status": "closed" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["id"], id.as_str());
  assert_eq!(updated["net_pnl"], 30.0);

  let (status, _) = send(&app, "DELETE", &format!("/trades/{}", id), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(&app, "GET", &format!("/trades/{}", id), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_duplicate_id_and_missing_symbol_rejected() {
  let app = app();
  let trade = json!({ "id": "dup", "symbol": "MSFT", "created_at": "2024-01-05" });

  let (status, _) = send(&app, "POST", "/trades", Some(trade.clone())).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(&app, "POST", "/trades", Some(trade)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    "POST",
    "/trades",
    Some(json!({ "symbol": "  ", "created_at": "2024-01-05" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_trades_filters_by_symbol() {
  let app = app();
  seed_three_days(&app).await;
  send(
    &app,
    "POST",
    "/trades",
    Some(json!({ "symbol": "AAPL", "created_at": "2024-01-04" })),
  )
  .await;

  let (_, all) = send(&app, "GET", "/trades", None).await;
  assert_eq!(all.as_array().unwrap().len(), 4);

  let (_, filtered) = send(&app, "GET", "/trades?symbol=AAPL", None).await;
  let filtered = filtered.as_array().unwrap();
  assert_eq!(filtered.len(), 1);
  assert_eq!(filtered[0]["symbol"], "AAPL");
}

#[tokio::test]
async fn test_daily_equity_curve() {
  let app = app();
  seed_three_days(&app).await;

  let (status, curve) = send(&app, "GET", "/performance/equity", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    curve,
    json!([
      { "period_key": "2024-01-01", "equity": 1100.0 },
      { "period_key": "2024-01-02", "equity": 1050.0 },
      { "period_key": "2024-01-03", "equity": 1250.0 },
    ])
  );
}

#[tokio::test]
async fn test_weekly_curve_splits_sunday_and_monday() {
  let app = app();
  for (created_at, pnl) in [("2024-01-07T12:00:00Z", 10.0), ("2024-01-08T12:00:00Z", 20.0)] {
    send(
      &app,
      "POST",
      "/trades",
      Some(json!({ "symbol": "BTC", "created_at": created_at, "net_pnl": pnl })),
    )
    .await;
  }

  let (status, curve) = send(&app, "GET", "/performance/equity?granularity=week", None).await;

  assert_eq!(status, StatusCode::OK);
  let keys: Vec<&str> = curve
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["period_key"].as_str().unwrap())
    .collect();
  assert_eq!(keys, vec!["2024-01-01", "2024-01-08"]);
}

#[tokio::test]
async fn test_performance_report() {
  let app = app();
  seed_three_days(&app).await;

  let (status, report) = send(&app, "GET", "/performance/report?initial_equity=1000", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["final_equity"], 1250.0);
  assert_eq!(report["equity_curve"].as_array().unwrap().len(), 3);
  assert_eq!(report["returns"].as_array().unwrap().len(), 2);
  assert_eq!(report["statistics"]["total_trades"], 3);

  let drawdown = report["max_drawdown_pct"].as_f64().unwrap();
  assert!((drawdown - (50.0 / 1100.0 * 100.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_all_win_report_body() {
  let app = app();
  for (created_at, pnl) in [("2024-01-01T10:00:00Z", 100.0), ("2024-01-02T10:00:00Z", 50.0)] {
    send(
      &app,
      "POST",
      "/trades",
      Some(json!({ "symbol": "005930", "created_at": created_at, "net_pnl": pnl })),
    )
    .await;
  }

  let (status, body) = send(&app, "GET", "/performance/report", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["statistics"]["profit_factor"], Value::Null);
  assert_eq!(body["statistics"]["win_rate"], 100.0);
  assert_eq!(body["max_drawdown_pct"], 0.0);

  let report: PerformanceReport = serde_json::from_value(body).unwrap();
  assert_eq!(report.final_equity, 1150.0);
  assert_eq!(report.statistics.profit_factor, None);
}

#[tokio::test]
async fn test_report_rejects_unknown_granularity() {
  let app = app();

  let (status, body) = send(&app, "GET", "/performance/report?granularity=hour", None).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("hour"));
}

#[tokio::test]
async fn test_empty_journal_report() {
  let app = app();

  let (status, report) = send(&app, "GET", "/performance/report", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["equity_curve"], json!([]));
  assert_eq!(report["max_drawdown_pct"], 0.0);
  assert_eq!(report["sharpe_ratio"], 0.0);
}

#[tokio::test]
async fn test_alerts_fire_once() {
  let app = app_with(AlertConfig {
    target_total_pnl: Some(200.0),
    max_drawdown_pct: None,
  });
  seed_three_days(&app).await;

  let (status, first) = send(&app, "GET", "/alerts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(first["active"].as_array().unwrap().len(), 1);
  assert_eq!(first["fired"][0]["kind"], "target_reached");

  let (_, second) = send(&app, "GET", "/alerts", None).await;
  assert_eq!(second["active"].as_array().unwrap().len(), 1);
  assert_eq!(second["fired"], json!([]));
}

#[tokio::test]
async fn test_alert_config_update_rearms_monitor() {
  let app = app();
  seed_three_days(&app).await;

  let (_, before) = send(&app, "GET", "/alerts", None).await;
  assert_eq!(before["active"], json!([]));

  let (status, config) = send(
    &app,
    "PUT",
    "/alerts/config",
    Some(json!({ "target_total_pnl": 200.0, "max_drawdown_pct": 4.0 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(config["target_total_pnl"], 200.0);

  let (_, current) = send(&app, "GET", "/alerts/config", None).await;
  assert_eq!(current["max_drawdown_pct"], 4.0);

  // 총손익 250 >= 200, 낙폭 약 4.55% >= 4%
  let (_, after) = send(&app, "GET", "/alerts", None).await;
  let kinds: Vec<&str> = after["fired"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["kind"].as_str().unwrap())
    .collect();
  assert_eq!(kinds, vec!["target_reached", "drawdown_breached"]);
}

#[tokio::test]
async fn test_market_quote() {
  let app = app();

  let (status, quote) = send(&app, "GET", "/market/005930", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(quote["symbol"], "005930");
  assert_eq!(quote["price"], 123.0);

  let (status, _) = send(&app, "GET", "/market/FAIL", None).await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);
}
