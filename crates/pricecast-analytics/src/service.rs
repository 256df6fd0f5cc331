//! 예측 서비스 facade.
//!
//! 지원 카테고리 확인과 파이프라인 호출을 하나의 인터페이스로 묶습니다.
//! 실제 트리 기반 구현과 배선 테스트용 고정 구현을 제공합니다.

use crate::error::{ForecastError, ForecastResult};
use crate::pipeline::ForecastPipeline;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pricecast_core::Forecast;
use pricecast_data::SupportedCategories;
use std::sync::Arc;
use tracing::warn;

/// 가격 예측 서비스 trait.
#[async_trait]
pub trait Forecaster: Send + Sync {
    /// 카테고리의 예측 생성.
    async fn forecast(&self, category: &str) -> ForecastResult<Forecast>;

    /// 예측 가능한 카테고리인지 확인.
    fn is_supported(&self, category: &str) -> bool;

    /// 예측 가능한 카테고리 목록.
    fn supported_categories(&self) -> Vec<String>;
}

/// 결정 트리 파이프라인 기반 예측 서비스.
#[derive(Debug)]
pub struct TreeForecaster {
    pipeline: ForecastPipeline,
    registry: Arc<SupportedCategories>,
}

impl TreeForecaster {
    pub fn new(pipeline: ForecastPipeline, registry: Arc<SupportedCategories>) -> Self {
        Self { pipeline, registry }
    }

    pub fn pipeline(&self) -> &ForecastPipeline {
        &self.pipeline
    }
}

#[async_trait]
impl Forecaster for TreeForecaster {
    async fn forecast(&self, category: &str) -> ForecastResult<Forecast> {
        if !self.registry.contains(category) {
            warn!(category, "지원하지 않는 카테고리 예측 요청");
            return Err(ForecastError::UnsupportedCategory(category.to_string()));
        }
        self.pipeline.forecast(category).await
    }

    fn is_supported(&self, category: &str) -> bool {
        self.registry.contains(category)
    }

    fn supported_categories(&self) -> Vec<String> {
        self.registry.list().to_vec()
    }
}

/// 항상 같은 값을 반환하는 예측 서비스 (배선 테스트용).
#[derive(Debug, Clone, Default)]
pub struct FixedForecaster;

impl FixedForecaster {
    /// 고정 카테고리 이름.
    pub const CATEGORY: &'static str = "dummy__category";
    const VALUE: f64 = 9.9;
    const HORIZON_DAYS: u32 = 7;

    pub fn new() -> Self {
        Self
    }

    fn fixed_forecast() -> Forecast {
        let generated_at = Utc
            .with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Forecast::new(
            Self::VALUE,
            Self::VALUE,
            generated_at,
            Self::HORIZON_DAYS,
            Self::CATEGORY,
        )
    }
}

#[async_trait]
impl Forecaster for FixedForecaster {
    async fn forecast(&self, _category: &str) -> ForecastResult<Forecast> {
        Ok(Self::fixed_forecast())
    }

    fn is_supported(&self, category: &str) -> bool {
        category == Self::CATEGORY
    }

    fn supported_categories(&self) -> Vec<String> {
        vec![Self::CATEGORY.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::tree::{DecisionTree, TreeNode};
    use chrono::Duration;
    use pricecast_core::{CategoryKey, Observation};
    use pricecast_data::StaticHistory;

    const CATEGORY: &str = "a__Linux__z1";

    fn forecaster() -> TreeForecaster {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 30, 0).unwrap();
        let key = CategoryKey::new("a", "Linux", "z1");
        let observations: Vec<Observation> = (0..6)
            .map(|k| Observation::new(start + Duration::hours(4 * k), 2.0, key.clone()))
            .collect();

        let pipeline = ForecastPipeline::new(
            Arc::new(StaticHistory::new(observations)),
            Arc::new(DecisionTree::new("mean", TreeNode::Leaf(1.0))),
            Arc::new(DecisionTree::new("std", TreeNode::Leaf(0.1))),
            PipelineConfig {
                num_lags: 2,
                ..PipelineConfig::default()
            },
        )
        .unwrap();
        let registry = Arc::new(SupportedCategories::new([CATEGORY.to_string()]));
        TreeForecaster::new(pipeline, registry)
    }

    #[tokio::test]
    async fn test_tree_forecaster_supported() {
        let service = forecaster();
        let forecast = service.forecast(CATEGORY).await.unwrap();

        assert_eq!(forecast.mean, 2.0);
        assert_eq!(forecast.std_deviation, 0.1);
        assert!(service.is_supported(CATEGORY));
        assert_eq!(service.supported_categories(), vec![CATEGORY.to_string()]);
    }

    #[tokio::test]
    async fn test_tree_forecaster_rejects_unsupported() {
        let service = forecaster();
        let err = service.forecast("b__Linux__z1").await.unwrap_err();

        assert!(matches!(err, ForecastError::UnsupportedCategory(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_fixed_forecaster() {
        let service: Arc<dyn Forecaster> = Arc::new(FixedForecaster::new());
        let forecast = service.forecast("anything").await.unwrap();

        assert_eq!(forecast.mean, 9.9);
        assert_eq!(forecast.std_deviation, 9.9);
        assert_eq!(forecast.horizon_days, 7);
        assert_eq!(forecast.category, "dummy__category");
        assert_eq!(
            forecast.generated_at,
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(service.is_supported("dummy__category"));
    }
}
