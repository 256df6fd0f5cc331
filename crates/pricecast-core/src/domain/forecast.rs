//! 예측 결과 값 객체.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 하나의 카테고리에 대한 가격 통계 예측.
///
/// 생성 이후 변경되지 않는 순수 출력 값이며, 호출자가 원하는
/// 형식으로 직렬화합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// 예측 평균 가격
    pub mean: f64,
    /// 예측 표준편차
    pub std_deviation: f64,
    /// 예측 생성 시각
    pub generated_at: DateTime<Utc>,
    /// 예측 기간 (일)
    pub horizon_days: u32,
    /// 예측 대상 카테고리
    pub category: String,
}

impl Forecast {
    /// 새 예측을 생성합니다.
    pub fn new(
        mean: f64,
        std_deviation: f64,
        generated_at: DateTime<Utc>,
        horizon_days: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            mean,
            std_deviation,
            generated_at,
            horizon_days,
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_forecast_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let forecast = Forecast::new(1.5, 0.2, at, 7, "a__b__c");
        let json = serde_json::to_value(&forecast).unwrap();

        assert_eq!(json["mean"], 1.5);
        assert_eq!(json["stdDeviation"], 0.2);
        assert_eq!(json["horizonDays"], 7);
        assert_eq!(json["category"], "a__b__c");
        assert_eq!(json["generatedAt"], "2021-01-01T00:00:00Z");
    }
}
