//! CLI 명령어 구현 모듈.

pub mod categories;
pub mod forecast;
pub mod inspect_tree;
pub mod lags;
pub mod resample;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
