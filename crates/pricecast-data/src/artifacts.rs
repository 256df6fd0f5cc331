//! 결정 트리 아티팩트 소스.
//!
//! 트리 정의는 외부에서 학습되어 JSON 문서로 제공됩니다. 이 모듈은
//! 식별자로 정의를 찾아 `serde_json::Value`로 돌려주는 역할만 하며,
//! 구조 해석은 분석 crate의 트리 로더가 담당합니다.

use crate::error::{io_error, DataError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// 트리 정의 소스 trait.
pub trait TreeArtifactSource: Send + Sync {
    /// 식별자에 해당하는 트리 정의 로드.
    fn load_definition(&self, identifier: &str) -> Result<Value>;
}

/// 디렉토리 기반 트리 정의 소스.
///
/// `<directory>/<identifier>.<extension>` 파일을 JSON으로 읽습니다.
#[derive(Debug, Clone)]
pub struct FileTreeSource {
    directory: PathBuf,
    extension: String,
}

impl FileTreeSource {
    /// 새 파일 소스 생성 (확장자 `json`).
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            extension: "json".to_string(),
        }
    }

    /// 파일 확장자 설정.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// 식별자에 해당하는 파일 경로.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", identifier, self.extension))
    }
}

impl TreeArtifactSource for FileTreeSource {
    fn load_definition(&self, identifier: &str) -> Result<Value> {
        let path = self.path_for(identifier);
        debug!(path = %path.display(), "트리 정의 파일 읽기");

        let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// 메모리 기반 트리 정의 소스.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTreeSource {
    definitions: HashMap<String, Value>,
}

impl InMemoryTreeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 정의 추가.
    pub fn with_definition(mut self, identifier: impl Into<String>, definition: Value) -> Self {
        self.definitions.insert(identifier.into(), definition);
        self
    }
}

impl TreeArtifactSource for InMemoryTreeSource {
    fn load_definition(&self, identifier: &str) -> Result<Value> {
        self.definitions
            .get(identifier)
            .cloned()
            .ok_or_else(|| DataError::NotFound(format!("tree definition: {}", identifier)))
    }
}
