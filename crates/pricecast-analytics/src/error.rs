//! 예측 엔진 에러 타입.

use pricecast_data::DataError;
use thiserror::Error;

/// 예측 파이프라인에서 발생할 수 있는 에러.
///
/// 모든 에러는 호출자에게 그대로 전달되며, 엔진은 재시도나
/// 부분 결과 복구를 하지 않습니다.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// 래그 윈도우에 필요한 리샘플링 행 부족
    #[error("Insufficient data: need at least {required} resampled rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// 리샘플링 그리드에 없는 카테고리
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// 트리 정의의 지원하지 않는 비교 연산자
    #[error("Unsupported comparison operator: {0}")]
    UnsupportedOperator(String),

    /// 잘못된 트리 정의
    #[error("Invalid tree definition: {0}")]
    InvalidTree(String),

    /// 외부 가격 이력 조회 실패 (타임아웃 포함)
    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    /// 레지스트리에 없는 카테고리
    #[error("Unsupported category: {0}")]
    UnsupportedCategory(String),

    /// 유효하지 않은 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 예측 작업을 위한 Result 타입.
pub type ForecastResult<T> = Result<T, ForecastError>;

impl ForecastError {
    /// 요청 내용 때문에 발생한 에러인지 확인 (사용자에게 그대로 보여줄 수 있음).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::UnsupportedCategory(_) | ForecastError::InvalidInput(_)
        )
    }

    /// 외부 협력자 때문에 발생한 에러인지 확인.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ForecastError::UpstreamFetch(_))
    }

    /// 트리 아티팩트 문제로 로드 시점에 발생한 치명적 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ForecastError::UnsupportedOperator(_) | ForecastError::InvalidTree(_)
        )
    }
}

impl From<DataError> for ForecastError {
    fn from(err: DataError) -> Self {
        ForecastError::UpstreamFetch(err.to_string())
    }
}
