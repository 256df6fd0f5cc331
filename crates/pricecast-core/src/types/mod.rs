//! 공통 타입 정의.

mod category;

pub use category::*;
