//! 지원 카테고리 레지스트리.
//!
//! 설정 파일에 한 줄에 하나씩 나열된 카테고리만 예측 대상이 됩니다.
//! 파이프라인 자체는 카테고리 지원 여부를 검사하지 않으며, 상위
//! 오케스트레이션 계층이 이 레지스트리로 호출을 거릅니다.

use crate::error::{io_error, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// 지원 카테고리 목록.
#[derive(Debug, Clone, Default)]
pub struct SupportedCategories {
    categories: Vec<String>,
    index: HashSet<String>,
}

impl SupportedCategories {
    /// 카테고리 목록으로 생성. 순서는 유지됩니다.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let index = categories.iter().cloned().collect();
        Self { categories, index }
    }

    /// 텍스트에서 생성. 세로 공백(줄바꿈 등)으로 구분된 토큰을 읽습니다.
    pub fn from_text(text: &str) -> Self {
        Self::new(
            text.split(is_vertical_whitespace)
                .filter(|token| !token.is_empty()),
        )
    }

    /// 파일에서 로드.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let registry = Self::from_text(&text);

        info!(
            path = %path.display(),
            count = registry.len(),
            "지원 카테고리 로드 완료"
        );
        Ok(registry)
    }

    /// 전체 카테고리 목록.
    pub fn list(&self) -> &[String] {
        &self.categories
    }

    /// 카테고리 지원 여부.
    pub fn contains(&self, category: &str) -> bool {
        self.index.contains(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn is_vertical_whitespace(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
