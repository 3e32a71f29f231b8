pub mod equity;
pub mod market_data;
pub mod trade;
