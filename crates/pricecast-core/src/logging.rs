//! tracing을 사용한 로깅 인프라.
//!
//! `[logging]` 설정 섹션의 `format`에 따라 출력 형식을 고릅니다:
//! - **pretty**: 개발용 사람이 읽기 쉬운 형식
//! - **json**: 로그 집계용 JSON 형식
//! - **compact**: 간결한 한 줄 형식
//!
//! 로그는 stderr로 출력되므로 CLI의 stdout 결과와 섞이지 않습니다.

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(CoreError::Config(format!(
                "Unknown log format: {} (expected pretty, json or compact)",
                s
            ))),
        }
    }
}

impl LoggingConfig {
    /// `format` 필드를 파싱합니다. 알 수 없는 값은 에러입니다.
    pub fn log_format(&self) -> CoreResult<LogFormat> {
        self.format.parse()
    }

    /// `RUST_LOG`가 없을 때 쓰는 레벨 필터.
    fn env_filter(&self) -> CoreResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| CoreError::Config(format!("Invalid log level '{}': {}", self.level, e)))
    }
}

/// `[logging]` 설정으로 로깅 시스템을 초기화합니다.
///
/// 형식이나 레벨이 잘못되었거나 이미 초기화되었으면 `CoreError::Config`.
pub fn init_logging(config: &LoggingConfig) -> CoreResult<()> {
    let format = config.log_format()?;
    let env_filter = config.env_filter()?;

    let base = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let fmt_layer = match format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CoreError::Config(format!("Logging already initialized: {}", e)))?;

    tracing::info!(format = ?format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 카테고리 필드가 포함된 span을 생성하는 매크로.
#[macro_export]
macro_rules! forecast_span {
    ($name:expr, $category:expr) => {
        tracing::info_span!($name, category = %$category)
    };
}
