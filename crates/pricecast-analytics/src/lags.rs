//! 비율 기반 래그 feature 생성.
//!
//! 리샘플링 그리드의 한 컬럼에서 연속된 두 값의 비율을 구해
//! 길이 `num_lags`의 feature vector를 만듭니다. 비율은 가격 수준과
//! 무관하므로 트리 입력으로 정상성(stationarity)을 가집니다.
//!
//! 행 `i`의 feature는 다음과 같습니다:
//!
//! ```text
//! feature[j] = v[i - L + j + 1] / v[i - L + j]    (j = 0..L)
//! ```
//!
//! `feature[L - 1]`이 가장 최근 두 값의 비율입니다.

use crate::error::{ForecastError, ForecastResult};
use crate::resample::{GridFormat, ResampledGrid};
use chrono::{DateTime, Utc};
use tracing::debug;

/// 래그 feature 이름 접두사.
const LAG_PREFIX: &str = "lag_";

/// 그리드 위치 하나의 feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LagFeatureRow {
    /// 그리드 행 시각
    pub timestamp: DateTime<Utc>,
    /// 길이 `num_lags`의 비율 feature
    pub values: Vec<f64>,
}

impl LagFeatureRow {
    /// feature 개수.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 래그 feature 빌더.
#[derive(Debug, Clone, Copy)]
pub struct LagFeatureBuilder {
    num_lags: usize,
}

impl LagFeatureBuilder {
    pub fn new(num_lags: usize) -> Self {
        Self { num_lags }
    }

    pub fn num_lags(&self) -> usize {
        self.num_lags
    }

    /// 필요한 최소 그리드 행 수 (`num_lags + 1`).
    pub fn min_rows(&self) -> usize {
        self.num_lags + 1
    }

    /// 대상 컬럼의 모든 유효 위치에 대해 feature 행을 생성.
    ///
    /// 행이 `num_lags`개 이하이면 `InsufficientData`, 컬럼이 없으면
    /// `UnknownCategory`를 반환합니다. 반환 길이는 `rows - num_lags`입니다.
    pub fn build(
        &self,
        grid: &ResampledGrid,
        target: &str,
    ) -> ForecastResult<Vec<LagFeatureRow>> {
        if self.num_lags == 0 {
            return Err(ForecastError::InvalidInput(
                "num_lags must be positive".to_string(),
            ));
        }

        let rows = grid.row_count();
        if rows < self.min_rows() {
            return Err(ForecastError::InsufficientData {
                required: self.min_rows(),
                actual: rows,
            });
        }

        let col = grid.require_column(target)?;
        let values: Vec<f64> = grid.column_values(col).collect();
        let lags = self.num_lags;

        let features: Vec<LagFeatureRow> = (lags..rows)
            .map(|i| LagFeatureRow {
                timestamp: grid.rows()[i].timestamp,
                values: values[i - lags..=i]
                    .windows(2)
                    .map(|w| w[1] / w[0])
                    .collect(),
            })
            .collect();

        debug!(
            category = target,
            num_lags = lags,
            rows = features.len(),
            "래그 feature 생성 완료"
        );

        Ok(features)
    }

    /// 가장 최근 위치의 feature 행만 반환.
    pub fn build_latest(
        &self,
        grid: &ResampledGrid,
        target: &str,
    ) -> ForecastResult<LagFeatureRow> {
        let mut rows = self.build(grid, target)?;
        rows.pop().ok_or(ForecastError::InsufficientData {
            required: self.min_rows(),
            actual: grid.row_count(),
        })
    }
}

/// `LagFeatureBuilder::new(num_lags).build(grid, target)`의 축약.
pub fn build_lags(
    grid: &ResampledGrid,
    target: &str,
    num_lags: usize,
) -> ForecastResult<Vec<LagFeatureRow>> {
    LagFeatureBuilder::new(num_lags).build(grid, target)
}

/// `j`번째 feature의 이름 (`lag_00`, `lag_01`, ...).
pub fn lag_feature_name(index: usize) -> String {
    format!("{}{:02}", LAG_PREFIX, index)
}

/// `lag_NN` 형식의 이름을 feature 인덱스로 변환.
pub(crate) fn parse_lag_feature_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(LAG_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// feature 행들을 구분자 텍스트로 변환 (헤더는 `lag_NN`).
pub fn lag_rows_to_delimited(rows: &[LagFeatureRow], format: &GridFormat) -> String {
    let width = rows.first().map(LagFeatureRow::len).unwrap_or(0);
    let columns: Vec<String> = (0..width).map(lag_feature_name).collect();
    let format = format.clone().with_column_template("{}");
    format.render(
        &columns,
        rows.iter().map(|r| (r.timestamp, r.values.as_slice())),
    )
}
