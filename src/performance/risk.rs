/**
* filename : risk
* author : HAMA
* date: 2025. 5. 11.
* description: 수익률 시계열, 최대 낙폭, 샤프 비율
**/

use crate::models::equity::EquityPoint;

/// 연간 거래일 수 (샤프 비율 연율화 기본값)
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// 연속한 자산 지점 사이의 수익률
///
/// 직전 자산이 0 이하인 구간은 0으로 채우지 않고 건너뛴다.
/// 따라서 길이가 `curve.len() - 1`보다 짧을 수 있다.
pub fn daily_returns(curve: &[EquityPoint]) -> Vec<f64> {
    curve
        .windows(2)
        .filter(|pair| pair[0].equity > 0.0)
        .map(|pair| (pair[1].equity - pair[0].equity) / pair[0].equity)
        .collect()
}

/// 최대 낙폭 (양수 퍼센트)
pub fn max_drawdown(curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }

        let drawdown = if peak > 0.0 {
            (point.equity - peak) / peak
        } else {
            0.0
        };

        worst = worst.min(drawdown);
    }

    worst.abs() * 100.0
}

/// 연율화 샤프 비율 (무위험 수익률 0, 모표준편차)
///
/// 수익률이 없거나 표준편차가 0이면 0.
pub fn sharpe(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    // 상수 시계열은 부동소수 오차와 무관하게 편차 0
    if returns.iter().all(|r| *r == returns[0]) {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean_return = returns.iter().sum::<f64>() / n;

    let variance = returns.iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>() / n;

    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }

    (mean_return / std_dev) * periods_per_year.sqrt()
}
