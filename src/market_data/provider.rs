use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

#[cfg(test)]
use mockall::automock;

use crate::error::JournalError;
use crate::models::market_data::Quote;
use crate::models::trade::{TradeRecord, TradeSide, TradeStatus};

/// 시세 제공자 인터페이스
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 심볼의 현재 시세 조회
    async fn quote(&self, symbol: &str) -> Result<Quote, JournalError>;
}

/// HTTP 시세 API 클라이언트
///
/// `GET {base_url}/quote/{symbol}` 가 `Quote` JSON을 돌려준다고 가정한다.
pub struct HttpQuoteProvider {
    client: Client,
    base_url: String,
}

impl HttpQuoteProvider {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, JournalError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(HttpQuoteProvider {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn quote(&self, symbol: &str) -> Result<Quote, JournalError> {
        if symbol.trim().is_empty() {
            return Err(JournalError::InvalidParameter("empty symbol".to_string()));
        }

        let url = format!("{}/quote/{}", self.base_url, symbol.trim());
        log::debug!("시세 요청: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(JournalError::ProviderError(format!(
                "Quote request for {} failed with status {}",
                symbol,
                response.status()
            )));
        }

        let quote = response.json::<Quote>().await?;
        Ok(quote)
    }
}

/// 진행 중인 거래의 평가손익 갱신
///
/// 심볼이 다르거나 진입 가격/수량이 없으면 변경하지 않고 false.
pub fn mark_to_market(trade: &mut TradeRecord, quote: &Quote) -> bool {
    if trade.status != TradeStatus::Active || trade.symbol != quote.symbol {
        return false;
    }

    let (entry, quantity) = match (trade.entry_price, trade.entry_quantity) {
        (Some(entry), Some(quantity)) => (entry, quantity),
        _ => return false,
    };

    let pnl = match trade.side {
        TradeSide::Long => (quote.price - entry) * quantity,
        TradeSide::Short => (entry - quote.price) * quantity,
    };

    trade.unrealized_pnl = Some(pnl);
    true
}
