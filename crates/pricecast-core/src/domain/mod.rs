//! 가격 예측을 위한 도메인 모델.

mod forecast;
mod observation;

pub use forecast::*;
pub use observation::*;
