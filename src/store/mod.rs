//! 거래 저장소
//!
//! 저장소 인터페이스와 메모리/SQLite 구현, 구 저장소 이전, CSV 입출력

pub mod csv_io;
pub mod legacy;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::JournalError;
use crate::models::trade::TradeRecord;

pub use csv_io::{export_csv, import_csv, ImportOutcome};
pub use legacy::{migrate_legacy_store, LEGACY_MIGRATION_FLAG};
pub use memory::InMemoryTradeRepository;
pub use sqlite::SqliteTradeRepository;

/// 거래 저장소 인터페이스
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// 거래 저장 (같은 ID가 있으면 덮어씀)
    async fn save(&mut self, trade: &TradeRecord) -> Result<(), JournalError>;

    /// 기존 거래 갱신
    async fn update(&mut self, trade: &TradeRecord) -> Result<(), JournalError>;

    /// ID로 거래 찾기
    async fn find_by_id(&self, id: &str) -> Result<Option<TradeRecord>, JournalError>;

    /// 심볼별 거래 찾기
    async fn find_by_symbol(&self, symbol: &str) -> Result<Vec<TradeRecord>, JournalError>;

    /// 모든 거래 가져오기 (생성 시각 오름차순)
    async fn find_all(&self) -> Result<Vec<TradeRecord>, JournalError>;

    /// 거래 삭제. 삭제 여부 반환
    async fn delete(&mut self, id: &str) -> Result<bool, JournalError>;

    /// 저장된 거래 수
    async fn count(&self) -> Result<usize, JournalError>;

    /// 메타데이터 조회 (마이그레이션 플래그 등)
    async fn meta_value(&self, key: &str) -> Result<Option<String>, JournalError>;

    /// 메타데이터 기록
    async fn set_meta_value(&mut self, key: &str, value: &str) -> Result<(), JournalError>;
}
