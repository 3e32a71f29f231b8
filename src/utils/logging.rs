//! 로깅 유틸리티
//!
//! 로그 초기화 및 저널 작업용 로그 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::JournalError;

/// 로그 레벨 문자열 파싱 (알 수 없는 값은 info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
///
/// RUST_LOG 환경변수가 있으면 설정 파일의 레벨보다 우선한다.
pub fn init(default_level: &str) -> Result<(), JournalError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| JournalError::ConfigError(format!("Failed to init logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 거래 가져오기 결과 로그
pub fn log_import_finished(source: &str, added: usize, duplicates: usize, skipped: usize) {
    log::info!(
        "거래 가져오기 완료: {} - 신규: {} - 중복: {} - 건너뜀: {}",
        source, added, duplicates, skipped
    );
}

/// 알림 발생 로그
pub fn log_alert(message: &str) {
    log::warn!("알림 발생: {}", message);
}

/// 오류 로그
pub fn log_error(context: &str, error: &JournalError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
