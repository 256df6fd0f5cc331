//! 가격 예측 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 설정 기반 예측 서비스 구성
//! - 카테고리 예측 및 지원 목록 조회
//! - 리샘플링/래그 feature 디버그 출력
//! - 결정 트리 아티팩트 점검

pub mod commands;
pub mod context;

pub use context::ForecastContext;
