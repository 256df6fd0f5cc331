//! 가격 통계 예측 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 단일 카테고리 예측 (JSON 출력)
//! pricecast forecast -c "c5d.xlarge__Linux/UNIX__eu-west-1a"
//!
//! # 지원 카테고리 전체 예측
//! pricecast forecast --all
//!
//! # 지원 카테고리 목록
//! pricecast categories
//!
//! # 리샘플링 그리드 마지막 10행
//! pricecast resample -i data/price_history.tsv --tail 10
//!
//! # 래그 feature 확인
//! pricecast lags -i data/price_history.tsv -c "c5d.xlarge__Linux/UNIX__eu-west-1a"
//!
//! # 트리 아티팩트 점검
//! pricecast inspect-tree --id price_mean_tree
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pricecast_cli::commands::{categories, forecast, inspect_tree, lags, resample};
use pricecast_cli::context::load_config;
use pricecast_core::logging::init_logging;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pricecast")]
#[command(about = "Price statistic forecasting CLI - 결정 트리 기반 가격 평균/표준편차 예측", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml이 있으면 사용)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 카테고리 가격 예측 (JSON 출력)
    Forecast {
        /// 카테고리 키 (resource__description__zone)
        #[arg(short, long, conflicts_with = "all")]
        category: Option<String>,

        /// 지원 카테고리 전체 예측
        #[arg(long, default_value = "false")]
        all: bool,
    },

    /// 지원 카테고리 목록 보기
    Categories,

    /// 가격 이력 파일을 리샘플링해 그리드 출력
    Resample {
        /// 탭 구분 가격 이력 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 마지막 N행만 출력
        #[arg(long)]
        tail: Option<usize>,
    },

    /// 카테고리의 래그 feature 출력
    Lags {
        /// 탭 구분 가격 이력 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 카테고리 키
        #[arg(short, long)]
        category: String,

        /// 마지막 N행만 출력
        #[arg(long)]
        tail: Option<usize>,
    },

    /// 결정 트리 아티팩트 점검
    InspectTree {
        /// 트리 식별자 (예: price_mean_tree)
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Forecast { category, all } => {
            let target = match (category, all) {
                (Some(category), false) => forecast::ForecastTarget::Category(category),
                (None, true) => forecast::ForecastTarget::All,
                _ => bail!("Specify either --category <key> or --all"),
            };

            let outcomes = forecast::run_forecast(config, target).await?;
            let mut failures = 0;
            for (category, outcome) in outcomes {
                match outcome {
                    Ok(forecast) => println!("{}", serde_json::to_string_pretty(&forecast)?),
                    Err(message) => {
                        failures += 1;
                        println!(
                            "{}",
                            serde_json::json!({ "category": category, "error": message })
                        );
                    }
                }
            }
            if failures > 0 {
                error!(failures, "일부 예측 실패");
                bail!("{} forecast(s) failed", failures);
            }
        }

        Commands::Categories => {
            let rows = categories::list_categories(&config)?;
            categories::print_categories(&rows);
        }

        Commands::Resample { input, tail } => {
            let grid = resample::load_grid(&input, config.forecast.step_hours)?;
            info!(
                rows = grid.row_count(),
                columns = grid.columns().len(),
                "리샘플링 완료"
            );
            print!("{}", resample::render_grid(&grid, tail));
        }

        Commands::Lags {
            input,
            category,
            tail,
        } => {
            let grid = resample::load_grid(&input, config.forecast.step_hours)?;
            let report = lags::compute_lags(&grid, &category, config.forecast.num_lags)?;
            print!("{}", lags::render_lags(&report, tail));
            println!("\n직전 평균 ({}행): {:.4}", config.forecast.num_lags, report.rolling_mean);
        }

        Commands::InspectTree { id } => {
            let summary = inspect_tree::inspect_tree(&config, &id)?;
            inspect_tree::print_summary(&summary, config.forecast.num_lags);
        }
    }

    Ok(())
}
