/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::models::equity::Granularity;
use crate::performance::{AlertConfig, PerformanceSettings};

pub const DEFAULT_CONFIG_FILE: &str = "tradelog.toml";
pub const ENV_PREFIX: &str = "TRADELOG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub performance: PerformanceSettings,
    pub alerts: AlertConfig,
    pub market_data: MarketDataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub legacy_store_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_path: PathBuf::from("tradelog.db"),
            legacy_store_path: PathBuf::from("legacy_store.json"),
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        MarketDataConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// 기본 위치의 설정 파일과 환경변수로 설정 로드
    pub fn load() -> Result<Self, JournalError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// 설정 로드: 기본값 -> 파일(없어도 됨) -> `TRADELOG__섹션__키` 환경변수
    pub fn load_from(path: &Path) -> Result<Self, JournalError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;

        Ok(cfg)
    }

    fn validate(&self) -> Result<(), JournalError> {
        if !self.performance.initial_equity.is_finite() {
            return Err(JournalError::ConfigError("performance.initial_equity must be finite".to_string()));
        }
        let periods = self.performance.periods_per_year;
        if periods.is_nan() || periods <= 0.0 {
            return Err(JournalError::ConfigError("performance.periods_per_year must be positive".to_string()));
        }
        if self.market_data.timeout_ms == 0 {
            return Err(JournalError::ConfigError("market_data.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn granularity(&self) -> Granularity {
        self.performance.granularity
    }
}
