//! 시간 관련 유틸리티
//!
//! 타임스탬프 파싱, 포맷팅 함수 제공

pub mod logging;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::JournalError;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
];

/// ISO 8601 문자열을 DateTime<Utc>로 변환
///
/// 오프셋이 붙은 RFC 3339 형식, 오프셋 없는 날짜+시간, 날짜만 있는 형식을 받는다.
/// 오프셋이 없으면 UTC로 간주한다.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, JournalError> {
  let trimmed = value.trim();

  if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
    return Ok(dt.with_timezone(&Utc));
  }

  for format in NAIVE_DATETIME_FORMATS {
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
      return Ok(Utc.from_utc_datetime(&naive));
    }
  }

  if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
    if let Some(naive) = date.and_hms_opt(0, 0, 0) {
      return Ok(Utc.from_utc_datetime(&naive));
    }
  }

  Err(JournalError::InvalidTimestamp(value.to_string()))
}

/// DateTime<Utc>를 저장용 RFC 3339 문자열로 변환
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// serde용 유연한 타임스탬프 역직렬화
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  use serde::Deserialize;

  let raw = String::deserialize(deserializer)?;
  parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
