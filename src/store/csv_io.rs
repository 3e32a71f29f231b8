use std::collections::{HashMap, HashSet};
use std::io;

use chrono::{DateTime, Utc};
use csv::StringRecord;
use serde::Serialize;

use crate::error::JournalError;
use crate::models::trade::{TradeRecord, TradeSide, TradeStatus};
use crate::utils::{format_timestamp, parse_timestamp};

const SYMBOL_COLUMNS: &[&str] = &["symbol", "Symbol", "SYMBOL"];
const NAME_COLUMNS: &[&str] = &["name", "stockName", "stock_name"];
const DATE_COLUMNS: &[&str] = &["date", "createdAt", "created_at", "time"];
const SIDE_COLUMNS: &[&str] = &["side", "action"];
const QUANTITY_COLUMNS: &[&str] = &["quantity", "qty", "shares", "entry_quantity", "entryQuantity"];
const PRICE_COLUMNS: &[&str] = &["price", "entryPrice", "entry_price", "planEntryPrice"];
const NET_PNL_COLUMNS: &[&str] = &["netPnl", "net_pnl"];
const REALIZED_PNL_COLUMNS: &[&str] = &["realizedPnl", "realized_pnl"];

/// CSV 가져오기 결과
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub added: Vec<TradeRecord>,
    pub duplicates: usize,
    pub skipped: usize,
}

struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        ColumnIndex { positions }
    }

    /// 별칭 중 값이 있는 첫 컬럼
    fn value<'r>(&self, record: &'r StringRecord, aliases: &[&str]) -> Option<&'r str> {
        aliases
            .iter()
            .filter_map(|alias| self.positions.get(*alias))
            .filter_map(|i| record.get(*i))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    fn number(&self, record: &StringRecord, aliases: &[&str]) -> Option<f64> {
        self.value(record, aliases)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// 헤더 기반 CSV에서 거래 가져오기
///
/// 심볼이나 양수 가격이 없는 행, 날짜를 해석할 수 없는 행은 건너뛴다.
/// `심볼|생성 시각`이 기존 거래나 앞선 행과 같으면 중복으로 센다.
/// 날짜가 비어 있으면 `now`를 쓴다.
pub fn import_csv<R: io::Read>(
    reader: R,
    existing: &[TradeRecord],
    now: DateTime<Utc>,
) -> Result<ImportOutcome, JournalError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::new(&headers);

    let mut seen: HashSet<String> = existing.iter().map(|t| t.dedup_key()).collect();
    let mut outcome = ImportOutcome::default();

    for result in rdr.records() {
        let record = result?;

        if record.len() != headers.len() {
            outcome.skipped += 1;
            continue;
        }

        let symbol = match columns.value(&record, SYMBOL_COLUMNS) {
            Some(s) => s.to_string(),
            None => {
                outcome.skipped += 1;
                continue;
            }
        };

        let price = match columns.number(&record, PRICE_COLUMNS).filter(|p| *p > 0.0) {
            Some(p) => p,
            None => {
                outcome.skipped += 1;
                continue;
            }
        };

        let created_at = match columns.value(&record, DATE_COLUMNS) {
            Some(raw) => match parse_timestamp(raw) {
                Ok(ts) => ts,
                Err(e) => {
                    log::warn!("CSV 행 건너뜀 ({}): {}", symbol, e);
                    outcome.skipped += 1;
                    continue;
                }
            },
            None => now,
        };

        let side = columns
            .value(&record, SIDE_COLUMNS)
            .map(TradeSide::from_label)
            .unwrap_or_default();
        let quantity = columns
            .number(&record, QUANTITY_COLUMNS)
            .filter(|q| *q != 0.0);

        let mut trade = TradeRecord::new(symbol, created_at).with_status(TradeStatus::Pending);
        trade.side = side;
        trade.entry_price = Some(price);
        trade.entry_quantity = quantity;
        trade.stock_name = columns.value(&record, NAME_COLUMNS).unwrap_or_default().to_string();
        trade.net_pnl = columns.number(&record, NET_PNL_COLUMNS);
        trade.realized_pnl = columns.number(&record, REALIZED_PNL_COLUMNS);
        trade.updated_at = now;

        if !seen.insert(trade.dedup_key()) {
            outcome.duplicates += 1;
            continue;
        }

        outcome.added.push(trade);
    }

    Ok(outcome)
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    symbol: &'a str,
    stock_name: &'a str,
    status: &'a str,
    side: &'a str,
    entry_price: Option<f64>,
    entry_quantity: Option<f64>,
    net_pnl: Option<f64>,
    realized_pnl: Option<f64>,
    created_at: String,
    updated_at: String,
}

/// 거래 목록을 CSV로 내보내기
pub fn export_csv<W: io::Write>(writer: W, trades: &[TradeRecord]) -> Result<usize, JournalError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for trade in trades {
        wtr.serialize(ExportRow {
            id: &trade.id,
            symbol: &trade.symbol,
            stock_name: &trade.stock_name,
            status: trade.status.as_str(),
            side: trade.side.as_str(),
            entry_price: trade.entry_price,
            entry_quantity: trade.entry_quantity,
            net_pnl: trade.net_pnl,
            realized_pnl: trade.realized_pnl,
            created_at: format_timestamp(&trade.created_at),
            updated_at: format_timestamp(&trade.updated_at),
        })?;
    }

    wtr.flush()?;
    Ok(trades.len())
}
