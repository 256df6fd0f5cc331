//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 파일 입출력 오류
    #[error("IO error: {0}")]
    Io(String),

    /// 리소스를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DataError::NotFound(err.to_string()),
            _ => DataError::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Serialization(err.to_string())
    }
}

/// 경로 정보를 포함한 입출력 오류 변환.
pub(crate) fn io_error(path: &std::path::Path, err: std::io::Error) -> DataError {
    match err.kind() {
        std::io::ErrorKind::NotFound => DataError::NotFound(path.display().to_string()),
        _ => DataError::Io(format!("{}: {}", path.display(), err)),
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
