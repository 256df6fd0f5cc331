//! 탭 구분 가격 피드 파서.
//!
//! 각 행은 다음 필드로 구성됩니다:
//!
//! ```text
//! omit <TAB> price <TAB> timestamp <TAB> resource_type <TAB> description <TAB> zone
//! ```
//!
//! 따옴표로 감싼 필드는 지원하지 않으며, 큰따옴표가 포함된 행은 거부됩니다.

use crate::error::{DataError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use pricecast_core::{CategoryKey, Observation};

const FIELD_COUNT: usize = 6;

/// 탭 구분 텍스트를 관측값 목록으로 변환합니다.
///
/// 빈 행은 건너뛰며, 입력 순서를 그대로 유지합니다.
pub fn parse_observations(text: &str) -> Result<Vec<Observation>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_row(idx + 1, line))
        .collect()
}

fn parse_row(line_no: usize, row: &str) -> Result<Observation> {
    if row.contains('"') {
        return Err(DataError::Parse(format!(
            "line {}: quoted strings not supported: {}",
            line_no, row
        )));
    }

    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < FIELD_COUNT {
        return Err(DataError::Parse(format!(
            "line {}: expected {} fields, got {}",
            line_no,
            FIELD_COUNT,
            fields.len()
        )));
    }

    let price = fields[1].trim().parse::<f64>().map_err(|e| {
        DataError::Parse(format!("line {}: invalid price '{}': {}", line_no, fields[1], e))
    })?;
    let timestamp = parse_timestamp(fields[2].trim()).ok_or_else(|| {
        DataError::Parse(format!("line {}: invalid timestamp '{}'", line_no, fields[2]))
    })?;

    Ok(Observation::new(
        timestamp,
        price,
        CategoryKey::new(fields[3], fields[4], fields[5]),
    ))
}

/// RFC 3339 또는 `YYYY-MM-DD HH:MM:SS+HH:MM` 형식을 UTC로 변환.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(text, "%Y-%m-%d %H:%M:%S%:z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
