//! 직전 가격 평균 (단순 이동 평균).

use crate::error::{ForecastError, ForecastResult};
use crate::resample::ResampledGrid;

/// 그리드 마지막 `window`개 행의 원시 가격 평균.
///
/// 어떤 래그 feature 행을 평가하든 항상 가장 최근 행들을 사용합니다.
/// 행이 `window`개보다 적으면 `InsufficientData`를 반환합니다.
pub fn rolling_mean(grid: &ResampledGrid, category: &str, window: usize) -> ForecastResult<f64> {
    if window == 0 {
        return Err(ForecastError::InvalidInput(
            "rolling window must be positive".to_string(),
        ));
    }

    let col = grid.require_column(category)?;
    let rows = grid.row_count();
    if rows < window {
        return Err(ForecastError::InsufficientData {
            required: window,
            actual: rows,
        });
    }

    let sum: f64 = grid.column_values(col).skip(rows - window).sum();
    Ok(sum / window as f64)
}
