/**
* filename : period
* author : HAMA
* date: 2025. 5. 11.
* description: 자산 곡선 버킷용 기간 키 생성
**/

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::equity::Granularity;

/// 타임스탬프를 집계 단위의 기간 키로 변환
///
/// - day: UTC 날짜 `YYYY-MM-DD`
/// - week: 해당 주 월요일 `YYYY-MM-DD` (일요일은 전 주의 7번째 날)
/// - month: `YYYY-MM`
///
/// 세 형식 모두 0으로 채워져 있어 문자열 정렬이 시간 순서와 같다.
pub fn period_key(timestamp: &DateTime<Utc>, granularity: Granularity) -> String {
  let date = timestamp.date_naive();

  match granularity {
    Granularity::Day => date.format("%Y-%m-%d").to_string(),
    Granularity::Week => {
      let offset = date.weekday().num_days_from_monday() as i64;
      let monday = date - Duration::days(offset);
      monday.format("%Y-%m-%d").to_string()
    }
    Granularity::Month => date.format("%Y-%m").to_string(),
  }
}
