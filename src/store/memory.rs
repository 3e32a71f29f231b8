use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::JournalError;
use crate::models::trade::TradeRecord;
use crate::store::TradeRepository;

/// 메모리 기반 거래 저장소 구현
#[derive(Debug, Default)]
pub struct InMemoryTradeRepository {
    trades: HashMap<String, TradeRecord>,  // id -> TradeRecord
    meta: HashMap<String, String>,
}

impl InMemoryTradeRepository {
    pub fn new() -> Self {
        InMemoryTradeRepository {
            trades: HashMap::new(),
            meta: HashMap::new(),
        }
    }

    fn sorted(mut trades: Vec<TradeRecord>) -> Vec<TradeRecord> {
        trades.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        trades
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn save(&mut self, trade: &TradeRecord) -> Result<(), JournalError> {
        self.trades.insert(trade.id.clone(), trade.clone());
        Ok(())
    }

    async fn update(&mut self, trade: &TradeRecord) -> Result<(), JournalError> {
        if !self.trades.contains_key(&trade.id) {
            return Err(JournalError::TradeNotFound(trade.id.clone()));
        }

        self.trades.insert(trade.id.clone(), trade.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TradeRecord>, JournalError> {
        Ok(self.trades.get(id).cloned())
    }

    async fn find_by_symbol(&self, symbol: &str) -> Result<Vec<TradeRecord>, JournalError> {
        let filtered: Vec<TradeRecord> = self.trades.values()
            .filter(|t| t.symbol == symbol)
            .cloned()
            .collect();

        Ok(Self::sorted(filtered))
    }

    async fn find_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        Ok(Self::sorted(self.trades.values().cloned().collect()))
    }

    async fn delete(&mut self, id: &str) -> Result<bool, JournalError> {
        Ok(self.trades.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, JournalError> {
        Ok(self.trades.len())
    }

    async fn meta_value(&self, key: &str) -> Result<Option<String>, JournalError> {
        Ok(self.meta.get(key).cloned())
    }

    async fn set_meta_value(&mut self, key: &str, value: &str) -> Result<(), JournalError> {
        self.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
