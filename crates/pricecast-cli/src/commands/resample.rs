//! 가격 이력 파일 리샘플링 (디버그 출력).

use anyhow::{Context, Result};
use pricecast_analytics::{GridFormat, ResampledGrid, Resampler};
use pricecast_data::parse_observations;
use std::path::Path;

/// 탭 구분 이력 파일을 읽어 그리드로 변환.
pub fn load_grid(input: &Path, step_hours: u32) -> Result<ResampledGrid> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let observations = parse_observations(&text)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    let grid = Resampler::new(step_hours).resample(&observations)?;
    Ok(grid)
}

/// 그리드를 구분자 텍스트로 변환 (`tail`이 있으면 마지막 N행만).
pub fn render_grid(grid: &ResampledGrid, tail: Option<usize>) -> String {
    let view = match tail {
        Some(n) => grid.tail(n),
        None => grid.clone(),
    };
    view.to_delimited(&GridFormat::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = "\
0\t1.0\t2022-01-01T00:30:00Z\ta\tLinux\tz1
1\t2.0\t2022-01-01T04:30:00Z\ta\tLinux\tz1
2\t3.0\t2022-01-01T08:30:00Z\ta\tLinux\tz1
";

    #[test]
    fn test_load_and_render() {
        let path = std::env::temp_dir().join(format!(
            "pricecast_cli_resample_{}.tsv",
            std::process::id()
        ));
        std::fs::write(&path, HISTORY).unwrap();
        let grid = load_grid(&path, 4);
        std::fs::remove_file(&path).ok();
        let grid = grid.unwrap();

        assert_eq!(grid.row_count(), 2);
        assert_eq!(
            render_grid(&grid, Some(1)),
            "date\ta__Linux__z1__price\n2022-01-01 08:00:00\t2.0000\n"
        );
    }
}
