use std::collections::BTreeMap;

use crate::models::equity::{EquityPoint, Granularity};
use crate::models::trade::TradeRecord;
use crate::performance::period::period_key;

/// 거래 목록으로 기간별 자산 곡선 구성
///
/// 거래를 기간 키로 묶어 손익을 합산하고, 키 오름차순으로 누적한다.
/// 거래가 없는 기간은 채우지 않는다. 빈 입력이면 빈 곡선.
pub fn build_equity_curve(
    trades: &[TradeRecord],
    initial_equity: f64,
    granularity: Granularity,
) -> Vec<EquityPoint> {
    if trades.is_empty() {
        return Vec::new();
    }

    // BTreeMap 순회 순서가 곧 키 오름차순
    let mut period_pnl: BTreeMap<String, f64> = BTreeMap::new();

    for trade in trades {
        let key = period_key(&trade.created_at, granularity);
        *period_pnl.entry(key).or_default() += trade.pnl();
    }

    let mut equity = initial_equity;
    let mut curve = Vec::with_capacity(period_pnl.len());

    for (key, pnl) in period_pnl {
        equity += pnl;
        curve.push(EquityPoint::new(key, equity));
    }

    curve
}
