//! 두 카테고리, 6일치 합성 이력에 대한 end-to-end 예측 회귀 테스트.
//!
//! 기대값은 손으로 계산한 값입니다:
//!
//! - 그리드: 1월 1일 12:00부터 4시간 간격 33행, r번째 행의 A 값 = A[r + 2]
//! - 마지막 래그 행 (L = 4): [1.1, 1.0, 0.9, 1.1 / 0.99]
//! - 직전 평균: (1.1 + 1.1 + 0.99 + 1.1) / 4 = 1.0725
//! - 평균 트리: lag_03 > 1.05, lag_00 > 1.05 → 1.08
//! - 표준편차 트리: lag_01 == 1.0 (경계) → pass → 0.05

use chrono::{Duration, TimeZone, Utc};
use pricecast_analytics::{
    ForecastError, ForecastPipeline, PipelineConfig, Resampler, TreeCache,
};
use pricecast_core::{CategoryKey, Observation};
use pricecast_data::{HistoryFetcher, InMemoryTreeSource, StaticHistory};
use serde_json::json;
use std::sync::Arc;

const CATEGORY_A: &str = "a__x__z1";
const CATEGORY_B: &str = "b__x__z1";
const TOLERANCE: f64 = 1e-9;

fn a_prices() -> Vec<f64> {
    let mut prices = vec![1.0; 31];
    prices.extend([1.1, 1.1, 0.99, 1.1, 1.1]);
    prices
}

fn history() -> Vec<Observation> {
    let day0 = Utc.with_ymd_and_hms(2022, 1, 1, 0, 30, 0).unwrap();
    let a = CategoryKey::new("a", "x", "z1");
    let b = CategoryKey::new("b", "x", "z1");

    let mut obs: Vec<Observation> = a_prices()
        .into_iter()
        .enumerate()
        .map(|(k, p)| Observation::new(day0 + Duration::hours(4 * k as i64), p, a.clone()))
        .collect();
    obs.push(Observation::new(
        Utc.with_ymd_and_hms(2022, 1, 1, 8, 15, 0).unwrap(),
        5.0,
        b,
    ));
    obs
}

fn trees() -> TreeCache {
    let source = InMemoryTreeSource::new()
        .with_definition(
            "price_mean_tree",
            json!({
                "field": "lag_03",
                "operator": "<=",
                "value": 1.05,
                "pass": 0.95,
                "fail": {
                    "TreeNode": {
                        "field": "lag_00",
                        "operator": "<=",
                        "value": 1.05,
                        "pass": 1.02,
                        "fail": 1.08
                    }
                }
            }),
        )
        .with_definition(
            "price_std_tree",
            json!({
                "cells": {
                    "tree": {
                        "init": {
                            "field": "lag_01",
                            "operator": "<=",
                            "value": 1.0,
                            "pass": {"double": 0.05},
                            "fail": {"double": 0.2}
                        }
                    }
                }
            }),
        );
    TreeCache::new(Arc::new(source))
}

fn pipeline(num_lags: usize) -> ForecastPipeline {
    let cache = trees();
    let fetcher: Arc<dyn HistoryFetcher> = Arc::new(StaticHistory::new(history()));
    ForecastPipeline::new(
        fetcher,
        cache.get("price_mean_tree").unwrap(),
        cache.get("price_std_tree").unwrap(),
        PipelineConfig {
            step_hours: 4,
            num_lags,
            horizon_days: 7,
        },
    )
    .unwrap()
}

#[test]
fn grid_shape_matches_hand_computation() {
    let grid = Resampler::new(4).resample(&history()).unwrap();
    let prices = a_prices();
    let col = grid.require_column(CATEGORY_A).unwrap();

    assert_eq!(grid.columns(), &[CATEGORY_A.to_string(), CATEGORY_B.to_string()]);
    assert_eq!(grid.row_count(), 33);
    assert_eq!(
        grid.rows()[0].timestamp,
        Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap()
    );
    for (r, value) in grid.column_values(col).enumerate() {
        assert_eq!(value, prices[r + 2]);
    }
}

#[tokio::test]
async fn golden_forecast() {
    let forecast = pipeline(4).forecast(CATEGORY_A).await.unwrap();

    let expected_mean = 1.08 * ((1.1 + 1.1 + 0.99 + 1.1) / 4.0);
    assert!((forecast.mean - expected_mean).abs() < TOLERANCE);
    assert!((forecast.mean - 1.1583).abs() < TOLERANCE);
    assert!((forecast.std_deviation - 0.05).abs() < TOLERANCE);
    assert_eq!(forecast.horizon_days, 7);
    assert_eq!(forecast.category, CATEGORY_A);
}

#[tokio::test]
async fn constant_column_forecast() {
    // B는 항상 5.0이므로 모든 비율이 1.0
    let forecast = pipeline(4).forecast(CATEGORY_B).await.unwrap();

    assert!((forecast.mean - 0.95 * 5.0).abs() < TOLERANCE);
    assert!((forecast.std_deviation - 0.05).abs() < TOLERANCE);
}

#[tokio::test]
async fn forecast_is_deterministic() {
    let p = pipeline(4);
    let first = p.forecast(CATEGORY_A).await.unwrap();
    let second = p.forecast(CATEGORY_A).await.unwrap();

    assert_eq!(first.mean, second.mean);
    assert_eq!(first.std_deviation, second.std_deviation);
}

#[tokio::test]
async fn unknown_category_in_grid() {
    let err = pipeline(4).forecast("c__x__z1").await.unwrap_err();
    assert!(matches!(err, ForecastError::UnknownCategory(ref c) if c == "c__x__z1"));
}

#[tokio::test]
async fn lag_window_longer_than_grid() {
    let err = pipeline(40).forecast(CATEGORY_A).await.unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientData {
            required: 41,
            actual: 33
        }
    ));
}

#[tokio::test]
async fn malformed_category_key_yields_no_data() {
    let err = pipeline(4).forecast("not-a-key").await.unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientData {
            required: 5,
            actual: 0
        }
    ));
}

#[tokio::test]
async fn concurrent_requests_share_trees() {
    let p = pipeline(4);
    let requests = [CATEGORY_A, CATEGORY_B, CATEGORY_A, CATEGORY_B];
    let results = futures::future::join_all(requests.iter().map(|c| p.forecast(c))).await;

    let means: Vec<f64> = results.into_iter().map(|r| r.unwrap().mean).collect();
    assert_eq!(means[0], means[2]);
    assert_eq!(means[1], means[3]);
    assert!((means[1] - 4.75).abs() < TOLERANCE);
}
