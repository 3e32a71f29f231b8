//! 구 키-값 저장소 이전
//!
//! 브라우저 로컬 저장소를 덤프한 JSON 파일(문자열 키 -> 문자열 값)에서
//! `trades` 항목을 읽어 현재 저장소로 옮긴다. 완료 플래그가 있으면 다시 실행하지 않는다.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::error::JournalError;
use crate::models::trade::{TradeRecord, TradeSide, TradeStatus};
use crate::store::TradeRepository;
use crate::utils::parse_timestamp;

pub const LEGACY_MIGRATION_FLAG: &str = "legacy_migration_complete";
const LEGACY_TRADES_KEY: &str = "trades";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub already_done: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTrade {
    id: Option<Value>,
    symbol: Option<String>,
    stock_name: Option<String>,
    status: Option<String>,
    plan_type: Option<String>,
    entry_price: Option<f64>,
    entry_quantity: Option<f64>,
    exit_price: Option<f64>,
    exit_quantity: Option<f64>,
    unrealized_pnl: Option<f64>,
    realized_pnl: Option<f64>,
    net_pnl: Option<f64>,
    commission: Option<f64>,
    strategy: Option<String>,
    entry_notes: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl LegacyTrade {
    fn into_record(self) -> Result<TradeRecord, JournalError> {
        let symbol = self
            .symbol
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| JournalError::InvalidParameter("legacy trade without symbol".to_string()))?;

        let created_at = match self.created_at.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => return Err(JournalError::InvalidTimestamp("missing createdAt".to_string())),
        };
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(|raw| parse_timestamp(raw).ok())
            .unwrap_or(created_at);

        // 중단 후 재시도해도 같은 행을 덮어쓰도록 ID는 항상 결정적으로 만든다
        let id = match self.id {
            Some(Value::Number(n)) => format!("legacy-{}", n),
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => format!("legacy-{}-{}", symbol, created_at.timestamp_millis()),
        };

        let mut record = TradeRecord::new(symbol, created_at).with_id(id);

        record.stock_name = self.stock_name.unwrap_or_default();
        record.status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<TradeStatus>().ok())
            .unwrap_or_default();
        record.side = self
            .plan_type
            .as_deref()
            .map(TradeSide::from_label)
            .unwrap_or_default();
        record.entry_price = self.entry_price;
        record.entry_quantity = self.entry_quantity;
        record.exit_price = self.exit_price;
        record.exit_quantity = self.exit_quantity;
        record.unrealized_pnl = self.unrealized_pnl;
        record.realized_pnl = self.realized_pnl;
        record.net_pnl = self.net_pnl;
        record.commission = self.commission;
        record.strategy = self.strategy;
        record.notes = self.entry_notes;
        record.updated_at = updated_at;

        Ok(record)
    }
}

/// 구 저장소의 `trades` 값을 JSON 배열로 풀기
///
/// 값은 보통 JSON 문자열로 직렬화된 배열이지만, 배열 그대로 있는 경우도 받는다.
fn legacy_trade_values(store: &HashMap<String, Value>) -> Result<Vec<Value>, JournalError> {
    match store.get(LEGACY_TRADES_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(serde_json::from_str::<Vec<Value>>(raw)?),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(JournalError::InvalidParameter(format!(
            "Unexpected legacy trades value: {}",
            other
        ))),
    }
}

/// 구 저장소에서 거래를 한 번만 이전
///
/// 파일이 없으면 이전할 것이 없으므로 바로 완료로 표시한다.
/// 해석할 수 없는 항목은 경고를 남기고 건너뛴다.
pub async fn migrate_legacy_store<R>(
    repo: &mut R,
    legacy_path: &Path,
) -> Result<MigrationOutcome, JournalError>
where
    R: TradeRepository + ?Sized,
{
    if repo.meta_value(LEGACY_MIGRATION_FLAG).await?.is_some() {
        log::debug!("구 저장소 이전 이미 완료됨");
        return Ok(MigrationOutcome {
            already_done: true,
            ..MigrationOutcome::default()
        });
    }

    let mut outcome = MigrationOutcome::default();

    if legacy_path.exists() {
        let contents = std::fs::read_to_string(legacy_path)?;
        let store: HashMap<String, Value> = serde_json::from_str(&contents)?;

        for value in legacy_trade_values(&store)? {
            let record = serde_json::from_value::<LegacyTrade>(value)
                .map_err(JournalError::from)
                .and_then(LegacyTrade::into_record);

            match record {
                Ok(trade) => {
                    repo.save(&trade).await?;
                    outcome.imported += 1;
                }
                Err(e) => {
                    log::warn!("구 저장소 항목 건너뜀: {}", e);
                    outcome.skipped += 1;
                }
            }
        }
    } else {
        log::info!("구 저장소 파일 없음: {}", legacy_path.display());
    }

    repo.set_meta_value(LEGACY_MIGRATION_FLAG, &Utc::now().to_rfc3339()).await?;

    log::info!(
        "구 저장소 이전 완료: 가져옴 {} / 건너뜀 {}",
        outcome.imported, outcome.skipped
    );

    Ok(outcome)
}
