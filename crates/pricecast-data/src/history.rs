//! 가격 이력 조회.
//!
//! 예측 파이프라인은 [`HistoryFetcher`] trait을 통해서만 이력을 가져옵니다.
//!
//! - [`TsvHistorySource`]: 탭 구분 파일에서 읽은 이력
//! - [`StaticHistory`]: 고정된 관측값 목록 (테스트, 재현용)
//! - [`SerializedFetcher`]: 임의의 fetcher를 단일 슬롯 세마포어와
//!   시도당 타임아웃으로 감싸는 래퍼
//!
//! 카테고리 키가 `"__"`로 구분된 3개 부분이 아니면 에러 대신
//! 빈 목록을 반환합니다.

use crate::error::{io_error, DataError, Result};
use crate::tsv::parse_observations;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pricecast_core::{CategoryKey, Observation};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// 가격 이력 조회 trait.
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// 주어진 카테고리의 최근 `days`일 관측값 조회.
    async fn fetch_history(&self, category: &str, days: u32) -> Result<Vec<Observation>>;
}

/// 탭 구분 파일 기반 이력 소스.
///
/// 파일 전체를 메모리에 올려 두고, 요청된 카테고리와 기간에 맞는
/// 관측값만 반환합니다.
#[derive(Debug, Clone)]
pub struct TsvHistorySource {
    observations: Vec<Observation>,
    /// 조회 기준 시각 (없으면 현재 시각)
    as_of: Option<DateTime<Utc>>,
}

impl TsvHistorySource {
    /// 관측값 목록으로 생성.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            as_of: None,
        }
    }

    /// 탭 구분 텍스트에서 생성.
    pub fn from_text(text: &str) -> Result<Self> {
        Ok(Self::new(parse_observations(text)?))
    }

    /// 탭 구분 파일에서 생성.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let source = Self::from_text(&text)?;

        info!(
            path = %path.display(),
            count = source.observations.len(),
            "가격 이력 파일 로드 완료"
        );
        Ok(source)
    }

    /// 조회 기준 시각 설정.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// 보유한 관측값 수.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// 관측값이 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[async_trait]
impl HistoryFetcher for TsvHistorySource {
    async fn fetch_history(&self, category: &str, days: u32) -> Result<Vec<Observation>> {
        let Some(key) = CategoryKey::parse(category) else {
            warn!(category = category, "잘못된 카테고리 키, 빈 이력 반환");
            return Ok(Vec::new());
        };

        let end = self.as_of.unwrap_or_else(Utc::now);
        let start = end - Duration::days(i64::from(days));

        let rows: Vec<Observation> = self
            .observations
            .iter()
            .filter(|o| o.category == key && o.timestamp >= start && o.timestamp <= end)
            .cloned()
            .collect();

        debug!(
            category = category,
            days = days,
            count = rows.len(),
            "이력 조회 완료"
        );
        Ok(rows)
    }
}

/// 고정된 관측값을 그대로 반환하는 이력 소스.
///
/// 카테고리 필터링을 하지 않으므로 다중 카테고리 그리드를 재현할 때
/// 사용합니다. 조회 횟수를 기록합니다.
#[derive(Debug, Default)]
pub struct StaticHistory {
    observations: Vec<Observation>,
    fetch_count: AtomicUsize,
}

impl StaticHistory {
    /// 새 고정 이력 생성.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// 지금까지의 조회 횟수.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryFetcher for StaticHistory {
    async fn fetch_history(&self, category: &str, _days: u32) -> Result<Vec<Observation>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if CategoryKey::parse(category).is_none() {
            return Ok(Vec::new());
        }
        Ok(self.observations.clone())
    }
}

/// 한 번에 하나의 조회만 허용하는 fetcher 래퍼.
///
/// 내부 fetcher 호출은 단일 슬롯 세마포어로 직렬화되며, 각 시도는
/// `timeout` 안에 끝나야 합니다. 재시도하지 않습니다.
pub struct SerializedFetcher<F> {
    inner: F,
    permit: Semaphore,
    timeout: StdDuration,
}

impl<F: HistoryFetcher> SerializedFetcher<F> {
    /// 새 직렬화 래퍼 생성.
    pub fn new(inner: F, timeout: StdDuration) -> Self {
        Self {
            inner,
            permit: Semaphore::new(1),
            timeout,
        }
    }

    /// 밀리초 단위 타임아웃으로 생성.
    pub fn with_timeout_ms(inner: F, timeout_ms: u64) -> Self {
        Self::new(inner, StdDuration::from_millis(timeout_ms))
    }

    /// 내부 fetcher 참조.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// 시도당 타임아웃.
    pub fn timeout(&self) -> StdDuration {
        self.timeout
    }
}

#[async_trait]
impl<F: HistoryFetcher> HistoryFetcher for SerializedFetcher<F> {
    #[instrument(skip(self))]
    async fn fetch_history(&self, category: &str, days: u32) -> Result<Vec<Observation>> {
        if CategoryKey::parse(category).is_none() {
            return Ok(Vec::new());
        }

        let _permit = self
            .permit
            .acquire()
            .await
            .map_err(|e| DataError::Fetch(format!("fetch slot closed: {}", e)))?;

        match tokio::time::timeout(self.timeout, self.inner.fetch_history(category, days)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    category = category,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "이력 조회 타임아웃"
                );
                Err(DataError::Timeout(format!(
                    "history fetch for {} exceeded {}ms",
                    category,
                    self.timeout.as_millis()
                )))
            }
        }
    }
}
