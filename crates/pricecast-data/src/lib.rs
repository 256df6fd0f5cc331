//! 예측 파이프라인의 외부 협력자.
//!
//! 이 crate는 다음을 제공합니다:
//! - 가격 이력 조회 (`HistoryFetcher`) 및 직렬화된 조회 래퍼
//! - 탭 구분 가격 피드 파서
//! - 지원 카테고리 레지스트리
//! - 결정 트리 아티팩트 소스

pub mod artifacts;
pub mod error;
pub mod history;
pub mod registry;
pub mod tsv;

pub use error::{DataError, Result};

pub use artifacts::{FileTreeSource, InMemoryTreeSource, TreeArtifactSource};
pub use history::{HistoryFetcher, SerializedFetcher, StaticHistory, TsvHistorySource};
pub use registry::SupportedCategories;
pub use tsv::parse_observations;
