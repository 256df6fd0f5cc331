//! 래그 feature 계산 (디버그 출력).

use anyhow::Result;
use pricecast_analytics::{
    lag_rows_to_delimited, rolling_mean, GridFormat, LagFeatureBuilder, LagFeatureRow,
    ResampledGrid,
};

/// 래그 feature 계산 결과.
#[derive(Debug, Clone)]
pub struct LagReport {
    pub rows: Vec<LagFeatureRow>,
    /// 마지막 `num_lags`개 행의 평균
    pub rolling_mean: f64,
}

/// 그리드에서 카테고리의 래그 feature와 직전 평균을 계산.
pub fn compute_lags(grid: &ResampledGrid, category: &str, num_lags: usize) -> Result<LagReport> {
    let rows = LagFeatureBuilder::new(num_lags).build(grid, category)?;
    let rolling_mean = rolling_mean(grid, category, num_lags)?;
    Ok(LagReport { rows, rolling_mean })
}

/// 결과를 구분자 텍스트로 변환 (`tail`이 있으면 마지막 N행만).
pub fn render_lags(report: &LagReport, tail: Option<usize>) -> String {
    let start = tail
        .map(|n| report.rows.len().saturating_sub(n))
        .unwrap_or(0);
    lag_rows_to_delimited(&report.rows[start..], &GridFormat::default())
}
