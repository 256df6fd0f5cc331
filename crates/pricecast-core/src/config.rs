//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use crate::error::CoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 예측 파이프라인 설정
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// 결정 트리 아티팩트 설정
    #[serde(default)]
    pub trees: TreeConfig,
    /// 지원 카테고리 설정
    #[serde(default)]
    pub categories: CategoriesConfig,
    /// 가격 이력 소스 설정
    #[serde(default)]
    pub history: HistoryConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 에러 응답 설정
    #[serde(default)]
    pub errors: ErrorReportConfig,
}

/// 예측 파이프라인 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// 리샘플링 간격 (시간)
    pub step_hours: u32,
    /// 래그 feature 개수
    pub num_lags: usize,
    /// 예측 기간 (일)
    pub horizon_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            step_hours: 4,
            num_lags: 42,
            horizon_days: 7,
        }
    }
}

/// 결정 트리 아티팩트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    /// 트리 정의 파일 디렉토리
    pub directory: PathBuf,
    /// 평균 비율 트리 식별자
    pub mean: String,
    /// 표준편차 트리 식별자
    pub std_dev: String,
    /// 트리 정의 파일 확장자
    #[serde(default = "default_tree_extension")]
    pub extension: String,
}

fn default_tree_extension() -> String {
    "json".to_string()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data/trees"),
            mean: "price_mean_tree".to_string(),
            std_dev: "price_std_tree".to_string(),
            extension: default_tree_extension(),
        }
    }
}

/// 지원 카테고리 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoriesConfig {
    /// 한 줄에 하나씩 카테고리가 나열된 파일 경로
    pub path: PathBuf,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/supported_categories.txt"),
        }
    }
}

/// 가격 이력 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// 탭 구분 가격 이력 파일 경로
    pub source: PathBuf,
    /// 조회 1회당 타임아웃 (밀리초)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
    /// 조회 기준 시각 (없으면 현재 시각)
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

fn default_fetch_timeout() -> u64 {
    1000
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("data/price_history.tsv"),
            fetch_timeout_ms: default_fetch_timeout(),
            as_of: None,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 에러 응답 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorReportConfig {
    /// 내부 에러의 상세 내용을 사용자에게 노출할지 여부
    #[serde(default)]
    pub include_details: bool,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없거나 형식이 맞지 않으면 `CoreError::Config`.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("forecast.step_hours", 4)?
            .set_default("forecast.num_lags", 42)?
            .set_default("forecast.horizon_days", 7)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PRICECAST")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }
}
