//! 예측 파이프라인.
//!
//! 가격 이력 조회 → 리샘플링 → 래그 feature → 직전 평균 → 트리 평가를
//! 순서대로 조합합니다. 요청마다 자체 그리드 상태를 만들고, 공유하는 것은
//! 불변 트리와 이력 조회기뿐입니다.
//!
//! 각 단계의 에러는 그대로 호출자에게 전달됩니다 (재시도 없음).

use crate::error::{ForecastError, ForecastResult};
use crate::lags::LagFeatureBuilder;
use crate::resample::Resampler;
use crate::rolling::rolling_mean;
use crate::tree::DecisionTree;
use chrono::{DateTime, Utc};
use pricecast_core::{forecast_span, Forecast, ForecastConfig, Observation};
use pricecast_data::HistoryFetcher;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// 파이프라인 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// 리샘플링 간격 (시간)
    pub step_hours: u32,
    /// 래그 feature 개수 (= 직전 평균 윈도우)
    pub num_lags: usize,
    /// 예측 기간 (일)
    pub horizon_days: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_hours: 4,
            num_lags: 42,
            horizon_days: 7,
        }
    }
}

impl From<&ForecastConfig> for PipelineConfig {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            step_hours: config.step_hours,
            num_lags: config.num_lags,
            horizon_days: config.horizon_days,
        }
    }
}

impl PipelineConfig {
    /// 이력 조회 일수 (`horizon_days + 1`).
    pub fn fetch_days(&self) -> u32 {
        self.horizon_days + 1
    }
}

/// 카테고리별 가격 예측 파이프라인.
pub struct ForecastPipeline {
    fetcher: Arc<dyn HistoryFetcher>,
    mean_tree: Arc<DecisionTree>,
    std_tree: Arc<DecisionTree>,
    config: PipelineConfig,
}

impl ForecastPipeline {
    /// 새 파이프라인 생성.
    ///
    /// 두 트리가 참조하는 feature 인덱스가 `num_lags` 범위 안인지 한 번
    /// 확인합니다. 평가 시점에는 다시 검사하지 않습니다.
    pub fn new(
        fetcher: Arc<dyn HistoryFetcher>,
        mean_tree: Arc<DecisionTree>,
        std_tree: Arc<DecisionTree>,
        config: PipelineConfig,
    ) -> ForecastResult<Self> {
        if config.step_hours == 0 || config.num_lags == 0 {
            return Err(ForecastError::InvalidInput(format!(
                "step_hours and num_lags must be positive (got {} and {})",
                config.step_hours, config.num_lags
            )));
        }

        for tree in [&mean_tree, &std_tree] {
            let required = tree.required_features();
            if required > config.num_lags {
                return Err(ForecastError::InvalidTree(format!(
                    "tree '{}' reads feature index {} but only {} lag features are built",
                    tree.identifier(),
                    required - 1,
                    config.num_lags
                )));
            }
        }

        Ok(Self {
            fetcher,
            mean_tree,
            std_tree,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn mean_tree(&self) -> &DecisionTree {
        &self.mean_tree
    }

    pub fn std_tree(&self) -> &DecisionTree {
        &self.std_tree
    }

    /// 이력을 조회해 카테고리의 예측을 생성.
    pub async fn forecast(&self, category: &str) -> ForecastResult<Forecast> {
        let span = forecast_span!("forecast", category);
        self.fetch_and_forecast(category).instrument(span).await
    }

    async fn fetch_and_forecast(&self, category: &str) -> ForecastResult<Forecast> {
        let days = self.config.fetch_days();
        let observations = self.fetcher.fetch_history(category, days).await?;
        debug!(days, observations = observations.len(), "가격 이력 조회 완료");

        self.forecast_observations(category, &observations)
    }

    /// 이미 조회된 관측값으로 예측 (생성 시각은 현재).
    pub fn forecast_observations(
        &self,
        category: &str,
        observations: &[Observation],
    ) -> ForecastResult<Forecast> {
        self.forecast_at(category, observations, Utc::now())
    }

    /// 생성 시각을 지정해 예측.
    pub fn forecast_at(
        &self,
        category: &str,
        observations: &[Observation],
        generated_at: DateTime<Utc>,
    ) -> ForecastResult<Forecast> {
        let lags = LagFeatureBuilder::new(self.config.num_lags);
        if observations.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: lags.min_rows(),
                actual: 0,
            });
        }

        let grid = Resampler::new(self.config.step_hours).resample(observations)?;
        let features = lags.build_latest(&grid, category)?;
        let prior_mean = rolling_mean(&grid, category, self.config.num_lags)?;

        let mean_ratio = self.mean_tree.evaluate(&features.values);
        let std_deviation = self.std_tree.evaluate(&features.values);
        let mean = mean_ratio * prior_mean;

        info!(
            category,
            rows = grid.row_count(),
            feature_time = %features.timestamp,
            prior_mean,
            mean_ratio,
            mean,
            std_deviation,
            "예측 완료"
        );

        Ok(Forecast::new(
            mean,
            std_deviation,
            generated_at,
            self.config.horizon_days,
            category,
        ))
    }
}

impl std::fmt::Debug for ForecastPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastPipeline")
            .field("mean_tree", &self.mean_tree.identifier())
            .field("std_tree", &self.std_tree.identifier())
            .field("config", &self.config)
            .finish()
    }
}
