//! 시세 데이터
//!
//! 외부 시세 API 클라이언트와 평가손익 계산

pub mod provider;

pub use provider::{mark_to_market, HttpQuoteProvider, QuoteProvider};

#[cfg(test)]
pub use provider::MockQuoteProvider;
