//! 핵심 도메인 에러 타입.
//!
//! 이 모듈은 도메인 타입 생성 및 설정 단계에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 카테고리 키 형식 오류
    #[error("Invalid category key: {0}")]
    InvalidCategory(String),

    /// 설정 로드/검증 에러
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
