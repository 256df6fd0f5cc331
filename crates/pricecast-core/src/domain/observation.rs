//! 가격 관측값.
//!
//! 외부 수집기(가격 이력 피드)가 생성하며, 예측 파이프라인은
//! 타임스탬프 오름차순으로만 소비합니다.

use crate::types::CategoryKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 불규칙한 시점에 기록된 단일 가격 관측값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// 관측 시각 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 관측 가격
    pub price: f64,
    /// 카테고리 키
    pub category: CategoryKey,
}

impl Observation {
    /// 새 관측값을 생성합니다.
    pub fn new(timestamp: DateTime<Utc>, price: f64, category: CategoryKey) -> Self {
        Self {
            timestamp,
            price,
            category,
        }
    }

    /// 그리드 컬럼 식별자로 쓰이는 정규 카테고리 문자열.
    pub fn category_name(&self) -> String {
        self.category.canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_name() {
        let ts = Utc.with_ymd_and_hms(2022, 6, 1, 10, 30, 0).unwrap();
        let obs = Observation::new(ts, 0.25, CategoryKey::new("m5.large", "Linux/UNIX", "eu-west-1a"));
        assert_eq!(obs.category_name(), "m5.large__Linux/UNIX__eu-west-1a");
    }
}
