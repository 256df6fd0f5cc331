//! 설정에서 예측 서비스를 구성합니다.

use anyhow::{Context, Result};
use pricecast_analytics::{ForecastPipeline, PipelineConfig, TreeCache, TreeForecaster};
use pricecast_core::AppConfig;
use pricecast_data::{FileTreeSource, SerializedFetcher, SupportedCategories, TsvHistorySource};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 설정 파일을 로드합니다.
///
/// 경로가 주어지면 반드시 읽어야 하고, 없으면 `config/default.toml`이
/// 있을 때만 읽습니다. 둘 다 아니면 기본값을 사용합니다.
pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path)),
        None if Path::new("config/default.toml").exists() => {
            AppConfig::load_default().context("Failed to load config/default.toml")
        }
        None => Ok(AppConfig::default()),
    }
}

/// 예측 요청에 필요한 구성 요소 묶음.
pub struct ForecastContext {
    pub config: AppConfig,
    pub trees: Arc<TreeCache>,
    pub registry: Arc<SupportedCategories>,
}

impl ForecastContext {
    /// 설정에서 트리 캐시와 지원 카테고리 레지스트리를 준비.
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = FileTreeSource::new(&config.trees.directory)
            .with_extension(config.trees.extension.clone());
        let trees = Arc::new(TreeCache::new(Arc::new(source)));

        let registry = SupportedCategories::load(&config.categories.path).with_context(|| {
            format!(
                "Failed to load supported categories from {}",
                config.categories.path.display()
            )
        })?;

        Ok(Self {
            config,
            trees,
            registry: Arc::new(registry),
        })
    }

    /// 파이프라인과 서비스 구성.
    ///
    /// 트리는 캐시를 통해 한 번만 로드됩니다.
    pub fn forecaster(&self) -> Result<TreeForecaster> {
        let history = &self.config.history;
        let mut source = TsvHistorySource::from_file(&history.source).with_context(|| {
            format!("Failed to load price history from {}", history.source.display())
        })?;
        if let Some(as_of) = history.as_of {
            source = source.with_as_of(as_of);
        }
        let fetcher = SerializedFetcher::with_timeout_ms(source, history.fetch_timeout_ms);

        let mean_tree = self.trees.get(&self.config.trees.mean)?;
        let std_tree = self.trees.get(&self.config.trees.std_dev)?;
        let pipeline = ForecastPipeline::new(
            Arc::new(fetcher),
            mean_tree,
            std_tree,
            PipelineConfig::from(&self.config.forecast),
        )?;

        info!(
            mean_tree = %self.config.trees.mean,
            std_tree = %self.config.trees.std_dev,
            categories = self.registry.len(),
            "예측 서비스 준비 완료"
        );
        Ok(TreeForecaster::new(pipeline, Arc::clone(&self.registry)))
    }
}
