//! 카테고리 키 정의.
//!
//! 카테고리 키는 하나의 가격 시계열을 식별하는 3-튜플입니다:
//! - 리소스 유형 (예: `c5d.xlarge`)
//! - 설명 (예: `Linux/UNIX`)
//! - 존 (예: `eu-west-1a`)
//!
//! 정규 문자열 형식은 세 부분을 `"__"`로 이어 붙인 것입니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 카테고리 키 구분자.
pub const CATEGORY_SEPARATOR: &str = "__";

/// 가격 시계열을 식별하는 카테고리 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryKey {
    /// 리소스 유형
    pub resource_type: String,
    /// 리소스 설명
    pub description: String,
    /// 가용 영역
    pub zone: String,
}

impl CategoryKey {
    /// 새 카테고리 키를 생성합니다.
    pub fn new(
        resource_type: impl Into<String>,
        description: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            description: description.into(),
            zone: zone.into(),
        }
    }

    /// 정규 문자열 형식(`type__description__zone`)을 반환합니다.
    pub fn canonical(&self) -> String {
        [
            self.resource_type.as_str(),
            self.description.as_str(),
            self.zone.as_str(),
        ]
        .join(CATEGORY_SEPARATOR)
    }

    /// 정규 문자열을 파싱합니다. 정확히 3개 부분이 아니면 `None`.
    pub fn parse(canonical: &str) -> Option<Self> {
        let parts: Vec<&str> = canonical.split(CATEGORY_SEPARATOR).collect();
        match parts.as_slice() {
            [resource_type, description, zone] => {
                Some(Self::new(*resource_type, *description, *zone))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.resource_type,
            self.description,
            self.zone,
            sep = CATEGORY_SEPARATOR
        )
    }
}

impl FromStr for CategoryKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}
