/**
* filename : sqlite
* author : HAMA
* date: 2025. 5. 14.
* description: SQLite 기반 거래 저장소 (버전 관리 스키마)
**/

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::JournalError;
use crate::models::trade::{TradeRecord, TradeSide, TradeStatus};
use crate::store::TradeRepository;
use crate::utils::{format_timestamp, parse_timestamp};

pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// 순서대로 적용되는 스키마 변경. 인덱스 + 1 이 적용 후 버전
const MIGRATIONS: &[&str] = &[
    // v1
    "CREATE TABLE trades (
        id TEXT PRIMARY KEY,
        symbol TEXT NOT NULL,
        stock_name TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL,
        side TEXT NOT NULL,
        entry_price REAL,
        entry_quantity REAL,
        exit_price REAL,
        exit_quantity REAL,
        unrealized_pnl REAL,
        realized_pnl REAL,
        net_pnl REAL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX idx_trades_created_at ON trades (created_at);
    CREATE INDEX idx_trades_symbol ON trades (symbol);",
    // v2
    "ALTER TABLE trades ADD COLUMN commission REAL;
    ALTER TABLE trades ADD COLUMN strategy TEXT;
    ALTER TABLE trades ADD COLUMN notes TEXT;",
];

const COLUMNS: &str = "id, symbol, stock_name, status, side, entry_price, entry_quantity, \
    exit_price, exit_quantity, unrealized_pnl, realized_pnl, net_pnl, commission, \
    strategy, notes, created_at, updated_at";

/// 현재 코드가 기대하는 스키마 버전
pub fn current_schema_version() -> usize {
    MIGRATIONS.len()
}

/// SQLite 기반 거래 저장소 구현
pub struct SqliteTradeRepository {
    conn: Mutex<Connection>,
}

impl SqliteTradeRepository {
    /// 파일 데이터베이스 열기 (없으면 생성 후 스키마 적용)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let conn = Connection::open(path.as_ref())?;
        log::info!("거래 데이터베이스 열기: {}", path.as_ref().display());
        Self::from_connection(conn)
    }

    /// 메모리 데이터베이스 (테스트용)
    pub fn in_memory() -> Result<Self, JournalError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, JournalError> {
        apply_migrations(&mut conn)?;
        Ok(SqliteTradeRepository {
            conn: Mutex::new(conn),
        })
    }

    /// 데이터베이스에 기록된 스키마 버전
    pub fn schema_version(&self) -> Result<usize, JournalError> {
        let conn = self.lock()?;
        read_schema_version(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, JournalError> {
        self.conn.lock().map_err(|_| JournalError::LockError)
    }
}

fn read_schema_version(conn: &Connection) -> Result<usize, JournalError> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = ?1",
            params![SCHEMA_VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| JournalError::InvalidParameter(format!("Corrupt schema version: {}", v))),
        None => Ok(0),
    }
}

/// 기록된 버전 이후의 스키마 변경을 하나의 트랜잭션으로 적용
fn apply_migrations(conn: &mut Connection) -> Result<usize, JournalError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    let current = read_schema_version(conn)?;
    let target = current_schema_version();

    if current > target {
        return Err(JournalError::InvalidParameter(format!(
            "Database schema version {} is newer than supported version {}",
            current, target
        )));
    }

    if current == target {
        log::debug!("스키마 최신 상태: v{}", current);
        return Ok(current);
    }

    let tx = conn.transaction()?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(current) {
        log::info!("스키마 마이그레이션 적용: v{}", index + 1);
        tx.execute_batch(sql)?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
        params![SCHEMA_VERSION_KEY, target.to_string()],
    )?;
    tx.commit()?;

    Ok(target)
}

fn conversion_error(index: usize, err: JournalError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn row_to_trade(row: &Row<'_>) -> rusqlite::Result<TradeRecord> {
    let status: String = row.get(3)?;
    let side: String = row.get(4)?;
    let created_at: String = row.get(15)?;
    let updated_at: String = row.get(16)?;

    Ok(TradeRecord {
        id: row.get(0)?,
        symbol: row.get(1)?,
        stock_name: row.get(2)?,
        status: status.parse::<TradeStatus>().map_err(|e| conversion_error(3, e))?,
        side: TradeSide::from_label(&side),
        entry_price: row.get(5)?,
        entry_quantity: row.get(6)?,
        exit_price: row.get(7)?,
        exit_quantity: row.get(8)?,
        unrealized_pnl: row.get(9)?,
        realized_pnl: row.get(10)?,
        net_pnl: row.get(11)?,
        commission: row.get(12)?,
        strategy: row.get(13)?,
        notes: row.get(14)?,
        created_at: parse_timestamp(&created_at).map_err(|e| conversion_error(15, e))?,
        updated_at: parse_timestamp(&updated_at).map_err(|e| conversion_error(16, e))?,
    })
}

fn query_trades(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<TradeRecord>, JournalError> {
    let sql = format!("SELECT {} FROM trades {} ORDER BY created_at, id", COLUMNS, filter);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, row_to_trade)?;

    let mut trades = Vec::new();
    for row in rows {
        trades.push(row?);
    }
    Ok(trades)
}

#[async_trait]
impl TradeRepository for SqliteTradeRepository {
    async fn save(&mut self, trade: &TradeRecord) -> Result<(), JournalError> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO trades ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                COLUMNS
            ),
            params![
                trade.id,
                trade.symbol,
                trade.stock_name,
                trade.status.as_str(),
                trade.side.as_str(),
                trade.entry_price,
                trade.entry_quantity,
                trade.exit_price,
                trade.exit_quantity,
                trade.unrealized_pnl,
                trade.realized_pnl,
                trade.net_pnl,
                trade.commission,
                trade.strategy,
                trade.notes,
                format_timestamp(&trade.created_at),
                format_timestamp(&trade.updated_at),
            ],
        )?;
        Ok(())
    }

    async fn update(&mut self, trade: &TradeRecord) -> Result<(), JournalError> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE trades SET symbol = ?2, stock_name = ?3, status = ?4, side = ?5, \
             entry_price = ?6, entry_quantity = ?7, exit_price = ?8, exit_quantity = ?9, \
             unrealized_pnl = ?10, realized_pnl = ?11, net_pnl = ?12, commission = ?13, \
             strategy = ?14, notes = ?15, created_at = ?16, updated_at = ?17 \
             WHERE id = ?1",
            params![
                trade.id,
                trade.symbol,
                trade.stock_name,
                trade.status.as_str(),
                trade.side.as_str(),
                trade.entry_price,
                trade.entry_quantity,
                trade.exit_price,
                trade.exit_quantity,
                trade.unrealized_pnl,
                trade.realized_pnl,
                trade.net_pnl,
                trade.commission,
                trade.strategy,
                trade.notes,
                format_timestamp(&trade.created_at),
                format_timestamp(&trade.updated_at),
            ],
        )?;

        if affected == 0 {
            return Err(JournalError::TradeNotFound(trade.id.clone()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TradeRecord>, JournalError> {
        let conn = self.lock()?;
        let trades = query_trades(&conn, "WHERE id = ?1", &[&id])?;
        Ok(trades.into_iter().next())
    }

    async fn find_by_symbol(&self, symbol: &str) -> Result<Vec<TradeRecord>, JournalError> {
        let conn = self.lock()?;
        query_trades(&conn, "WHERE symbol = ?1", &[&symbol])
    }

    async fn find_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        let conn = self.lock()?;
        query_trades(&conn, "", &[])
    }

    async fn delete(&mut self, id: &str) -> Result<bool, JournalError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM trades WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<usize, JournalError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn meta_value(&self, key: &str) -> Result<Option<String>, JournalError> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set_meta_value(&mut self, key: &str, value: &str) -> Result<(), JournalError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
