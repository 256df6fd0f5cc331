//! 결정 트리 아티팩트 점검.

use anyhow::{Context, Result};
use pricecast_analytics::{lag_feature_name, TreeCache};
use pricecast_core::AppConfig;
use pricecast_data::FileTreeSource;
use std::sync::Arc;

/// 트리 요약 정보.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSummary {
    pub identifier: String,
    pub depth: usize,
    pub leaves: usize,
    pub required_features: usize,
    /// 설정된 `num_lags`로 평가 가능한지 여부
    pub compatible: bool,
}

/// 설정된 디렉토리에서 트리를 로드해 요약.
pub fn inspect_tree(config: &AppConfig, identifier: &str) -> Result<TreeSummary> {
    let source = FileTreeSource::new(&config.trees.directory)
        .with_extension(config.trees.extension.clone());
    let cache = TreeCache::new(Arc::new(source));
    let tree = cache
        .get(identifier)
        .with_context(|| format!("Failed to load tree '{}'", identifier))?;

    let required_features = tree.required_features();
    Ok(TreeSummary {
        identifier: tree.identifier().to_string(),
        depth: tree.depth(),
        leaves: tree.leaf_count(),
        required_features,
        compatible: required_features <= config.forecast.num_lags,
    })
}

/// 요약 출력.
pub fn print_summary(summary: &TreeSummary, num_lags: usize) {
    println!("트리: {}", summary.identifier);
    println!("  깊이: {}", summary.depth);
    println!("  리프 수: {}", summary.leaves);
    match summary.required_features {
        0 => println!("  참조 feature: 없음"),
        n => println!("  참조 feature: lag_00 ~ {}", lag_feature_name(n - 1)),
    }
    if summary.compatible {
        println!("  ✅ num_lags={}로 평가 가능", num_lags);
    } else {
        println!("  ❌ num_lags={}보다 많은 feature를 참조합니다", num_lags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_tree_file() {
        let dir = std::env::temp_dir().join(format!("pricecast_cli_trees_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("t.json"),
            r#"{"field": "lag_05", "operator": "<=", "value": 1.0, "pass": 0.5,
                "fail": {"field": 1, "operator": "<=", "value": 2.0, "pass": 0.7, "fail": 0.9}}"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.trees.directory = dir.clone();
        config.forecast.num_lags = 4;
        let summary = inspect_tree(&config, "t");
        let missing = inspect_tree(&config, "missing");
        std::fs::remove_dir_all(&dir).ok();

        let summary = summary.unwrap();
        assert_eq!(summary.depth, 2);
        assert_eq!(summary.leaves, 3);
        assert_eq!(summary.required_features, 6);
        assert!(!summary.compatible);
        assert!(missing.is_err());
    }
}
