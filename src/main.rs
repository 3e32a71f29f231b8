/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description: 매매 일지 실행 진입점
**/

use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;

use tradelog::api::{self, AppState};
use tradelog::config::Config;
use tradelog::market_data::HttpQuoteProvider;
use tradelog::models::equity::Granularity;
use tradelog::performance::{evaluate_alerts, AlertMonitor, PerformanceReport};
use tradelog::store::{export_csv, import_csv, migrate_legacy_store, SqliteTradeRepository};
use tradelog::utils::logging;
use tradelog::TradeRepository;

#[derive(Debug, Parser)]
#[command(name = "tradelog", version, about = "매매 일지와 성과 지표")]
struct Cli {
    /// 설정 파일 경로 (기본: tradelog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// HTTP API 서버 실행
    Serve,
    /// CSV 파일에서 거래 가져오기
    Import { path: PathBuf },
    /// 거래를 CSV 파일로 내보내기
    Export { path: PathBuf },
    /// 성과 요약 출력
    Report {
        #[arg(long)]
        granularity: Option<Granularity>,
        #[arg(long)]
        initial_equity: Option<f64>,
    },
    /// 구 저장소 이전만 실행
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // 설정 로드
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("매매 일지 시작 (v{})", tradelog::VERSION);

    // 저장소 열기 + 구 저장소 이전 (최초 1회)
    let mut repo = SqliteTradeRepository::open(&config.storage.database_path)?;
    let outcome = migrate_legacy_store(&mut repo, &config.storage.legacy_store_path).await?;

    match cli.command {
        Command::Serve => run_server(config, repo).await?,
        Command::Import { path } => run_import(&mut repo, path).await?,
        Command::Export { path } => {
            let trades = repo.find_all().await?;
            let written = export_csv(File::create(&path)?, &trades)?;
            println!("{}건 내보냄: {}", written, path.display());
        }
        Command::Report { granularity, initial_equity } => {
            let mut settings = config.performance.clone();
            if let Some(g) = granularity {
                settings.granularity = g;
            }
            if let Some(equity) = initial_equity {
                settings.initial_equity = equity;
            }

            let trades = repo.find_all().await?;
            let report = PerformanceReport::build(&trades, &settings);
            println!("{}", report.summary());

            for alert in evaluate_alerts(&trades, &config.alerts, settings.initial_equity) {
                println!("! {}", alert.message());
            }
        }
        Command::Migrate => {
            if outcome.already_done {
                println!("구 저장소 이전은 이미 완료되었습니다");
            } else {
                println!("가져옴: {} / 건너뜀: {}", outcome.imported, outcome.skipped);
            }
        }
    }

    Ok(())
}

async fn run_import(repo: &mut SqliteTradeRepository, path: PathBuf) -> Result<(), anyhow::Error> {
    let existing = repo.find_all().await?;
    let outcome = import_csv(File::open(&path)?, &existing, Utc::now())?;

    for trade in &outcome.added {
        repo.save(trade).await?;
    }

    logging::log_import_finished(
        &path.display().to_string(),
        outcome.added.len(),
        outcome.duplicates,
        outcome.skipped,
    );
    println!(
        "가져오기 완료: 신규 {}건, 중복 {}건, 건너뜀 {}건",
        outcome.added.len(),
        outcome.duplicates,
        outcome.skipped
    );

    Ok(())
}

async fn run_server(config: Config, repo: SqliteTradeRepository) -> Result<(), anyhow::Error> {
    let quotes = HttpQuoteProvider::new(
        config.market_data.base_url.clone(),
        config.market_data.timeout_ms,
    )?;
    log::info!("시세 제공자: {}", quotes.base_url());

    let state = AppState {
        repository: Arc::new(RwLock::new(repo)),
        quotes: Arc::new(quotes),
        settings: config.performance.clone(),
        alerts: Arc::new(RwLock::new(AlertMonitor::new(config.alerts.clone()))),
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    api::serve(state, addr).await?;

    Ok(())
}
