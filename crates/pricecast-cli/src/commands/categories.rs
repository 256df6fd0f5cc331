//! 지원 카테고리 목록 조회.

use anyhow::{Context, Result};
use pricecast_core::{AppConfig, CategoryKey};
use pricecast_data::SupportedCategories;

/// 카테고리 조회 결과 한 줄.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub name: String,
    /// 형식이 맞지 않으면 `None`
    pub key: Option<CategoryKey>,
}

/// 레지스트리의 카테고리 목록 (파일 순서).
pub fn list_categories(config: &AppConfig) -> Result<Vec<CategoryRow>> {
    let path = &config.categories.path;
    let registry = SupportedCategories::load(path)
        .with_context(|| format!("Failed to load supported categories from {}", path.display()))?;

    Ok(registry
        .list()
        .iter()
        .map(|name| CategoryRow {
            name: name.clone(),
            key: CategoryKey::parse(name),
        })
        .collect())
}

/// 테이블 형식으로 출력.
pub fn print_categories(rows: &[CategoryRow]) {
    println!("{:<28} {:<20} {:<16}", "RESOURCE", "DESCRIPTION", "ZONE");
    println!("{}", "-".repeat(66));
    for row in rows {
        match &row.key {
            Some(key) => println!(
                "{:<28} {:<20} {:<16}",
                key.resource_type, key.description, key.zone
            ),
            None => println!("{:<28} (malformed key)", row.name),
        }
    }
    println!("\n총 {}개 카테고리", rows.len());
}
