//! 가격 통계 예측 엔진.
//!
//! 불규칙한 시점에 기록된 가격 관측값을 고정 길이 feature vector로 바꾸고,
//! 사전 학습된 결정 트리로 향후 가격의 평균과 표준편차를 예측합니다.
//!
//! # 아키텍처
//!
//! ```text
//! HistoryFetcher (외부)
//!        │  Vec<Observation>
//!        ▼
//! ┌─────────────────┐
//! │    Resampler    │ ← 균일 시간 그리드 + forward-fill
//! └────────┬────────┘
//!          │ ResampledGrid
//!     ┌────┴──────────────┐
//!     ▼                   ▼
//! ┌──────────────┐  ┌──────────────┐
//! │ Lag Features │  │ Rolling Mean │
//! └──────┬───────┘  └──────┬───────┘
//!        │ 마지막 행         │ 직전 평균
//!        ▼                  │
//! ┌──────────────────┐      │
//! │ mean / std trees │      │
//! └──────┬───────────┘      │
//!        └────────┬─────────┘
//!                 ▼
//!              Forecast
//! ```
//!
//! # 예제
//!
//! ```ignore
//! use pricecast_analytics::{ForecastPipeline, PipelineConfig, TreeCache};
//!
//! let cache = TreeCache::new(Arc::new(FileTreeSource::new("data/trees")));
//! let pipeline = ForecastPipeline::new(
//!     fetcher,
//!     cache.get("price_mean_tree")?,
//!     cache.get("price_std_tree")?,
//!     PipelineConfig::default(),
//! )?;
//! let forecast = pipeline.forecast("c5d.xlarge__Linux/UNIX__eu-west-1a").await?;
//! ```

pub mod error;
pub mod lags;
pub mod pipeline;
pub mod resample;
pub mod rolling;
pub mod service;
pub mod tree;

pub use error::{ForecastError, ForecastResult};
pub use lags::{build_lags, lag_feature_name, lag_rows_to_delimited, LagFeatureBuilder, LagFeatureRow};
pub use pipeline::{ForecastPipeline, PipelineConfig};
pub use resample::{resample, GridFormat, GridRow, ResampledGrid, Resampler};
pub use rolling::rolling_mean;
pub use service::{FixedForecaster, Forecaster, TreeForecaster};
pub use tree::{DecisionTree, TreeCache, TreeNode};
