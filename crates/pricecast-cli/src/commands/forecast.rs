//! 카테고리 가격 예측.

use crate::context::ForecastContext;
use anyhow::Result;
use pricecast_analytics::{ForecastError, Forecaster};
use pricecast_core::{AppConfig, Forecast};
use tracing::{error, info};

/// 예측 대상.
#[derive(Debug, Clone)]
pub enum ForecastTarget {
    /// 단일 카테고리
    Category(String),
    /// 지원 목록 전체
    All,
}

/// 예측 결과 한 건 (카테고리와 결과 또는 사용자용 에러 메시지).
pub type ForecastOutcome = (String, std::result::Result<Forecast, String>);

/// 예측 실행.
///
/// 파이프라인 에러는 카테고리별 결과에 담기고, 서비스 구성 실패만
/// `Err`로 반환됩니다.
pub async fn run_forecast(config: AppConfig, target: ForecastTarget) -> Result<Vec<ForecastOutcome>> {
    let include_details = config.errors.include_details;
    let context = ForecastContext::new(config)?;
    let service = context.forecaster()?;

    let categories = match target {
        ForecastTarget::Category(category) => vec![category],
        ForecastTarget::All => service.supported_categories(),
    };
    info!(count = categories.len(), "예측 요청");

    let results =
        futures::future::join_all(categories.iter().map(|c| service.forecast(c))).await;

    Ok(categories
        .into_iter()
        .zip(results)
        .map(|(category, result)| {
            let outcome = result.map_err(|e| {
                error!(category = %category, error = %e, "예측 실패");
                describe_error(&e, include_details)
            });
            (category, outcome)
        })
        .collect())
}

/// 사용자에게 보여줄 에러 메시지.
///
/// 요청 자체의 문제는 항상 그대로 보여주고, 그 밖의 에러는
/// `include_details`가 켜져 있을 때만 상세 내용을 포함합니다.
pub fn describe_error(err: &ForecastError, include_details: bool) -> String {
    if err.is_client_error() || include_details {
        return err.to_string();
    }
    if err.is_upstream() {
        "Price history is temporarily unavailable".to_string()
    } else if err.is_fatal() {
        "Forecast model is unavailable".to_string()
    } else {
        "Not enough price history to forecast this category".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_always_detailed() {
        let err = ForecastError::UnsupportedCategory("x__y__z".to_string());
        assert_eq!(describe_error(&err, false), "Unsupported category: x__y__z");
    }

    #[test]
    fn test_internal_errors_hidden_by_default() {
        let err = ForecastError::UpstreamFetch("connection reset".to_string());
        assert_eq!(
            describe_error(&err, false),
            "Price history is temporarily unavailable"
        );
        assert!(describe_error(&err, true).contains("connection reset"));

        let err = ForecastError::InvalidTree("bad".to_string());
        assert_eq!(describe_error(&err, false), "Forecast model is unavailable");

        let err = ForecastError::UnsupportedOperator(">".to_string());
        assert_eq!(describe_error(&err, false), "Forecast model is unavailable");

        let err = ForecastError::InsufficientData {
            required: 43,
            actual: 12,
        };
        assert_eq!(
            describe_error(&err, false),
            "Not enough price history to forecast this category"
        );
    }
}
