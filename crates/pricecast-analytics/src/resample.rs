//! 다중 카테고리 관측값의 시간 정렬.
//!
//! 불규칙한 관측값 스트림을 `step_hours` 간격의 균일한 그리드로 옮기고,
//! 각 컬럼의 마지막 관측값으로 빈 구간을 채웁니다 (forward-fill).
//!
//! # 규칙
//!
//! - 컬럼 순서는 입력에 나타난 카테고리 키를 사전순으로 정렬한 것
//! - 그리드 시작점은 첫 관측값이 속한 날의 00:00 UTC
//! - 모든 컬럼이 최소 한 번 관측되기 전의 행은 버림 (0으로 채우지 않음)
//! - 마지막 관측 시각을 넘는 행은 만들지 않음
//!
//! pandas의 다음 연산과 같은 결과를 냅니다:
//!
//! ```text
//! df.pivot(columns='category', values='price')
//!   .ffill()
//!   .resample('4h', origin=start_date)
//!   .ffill()
//!   .dropna(axis=0)
//! ```

use crate::error::{ForecastError, ForecastResult};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use pricecast_core::Observation;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// 그리드의 한 행.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    /// 행 시각
    pub timestamp: DateTime<Utc>,
    /// 컬럼 순서대로의 값
    pub values: Vec<f64>,
}

/// 균일 간격 시간 그리드.
///
/// `rows[n].timestamp == rows[0].timestamp + n * step`이 항상 성립합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledGrid {
    columns: Vec<String>,
    step: Duration,
    rows: Vec<GridRow>,
}

impl ResampledGrid {
    /// 컬럼 이름 목록 (사전순).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 컬럼 인덱스 조회.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 컬럼 인덱스 조회. 없으면 `UnknownCategory`.
    pub fn require_column(&self, name: &str) -> ForecastResult<usize> {
        self.column_index(name)
            .ok_or_else(|| ForecastError::UnknownCategory(name.to_string()))
    }

    /// 그리드 간격.
    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 한 컬럼의 값을 시간순으로 순회.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r.values[col])
    }

    /// `[start, stop)` 구간의 행만 담은 복사본. 범위는 행 수로 잘립니다.
    pub fn slice(&self, start: usize, stop: usize) -> ResampledGrid {
        let stop = stop.min(self.rows.len());
        let start = start.min(stop);
        ResampledGrid {
            columns: self.columns.clone(),
            step: self.step,
            rows: self.rows[start..stop].to_vec(),
        }
    }

    /// 마지막 `count`개 행만 담은 복사본.
    pub fn tail(&self, count: usize) -> ResampledGrid {
        let start = self.rows.len().saturating_sub(count);
        self.slice(start, self.rows.len())
    }

    /// 구분자 텍스트로 변환.
    pub fn to_delimited(&self, format: &GridFormat) -> String {
        let rows = self.rows.iter().map(|r| (r.timestamp, r.values.as_slice()));
        format.render(&self.columns, rows)
    }
}

/// 그리드 텍스트 출력 형식.
#[derive(Debug, Clone)]
pub struct GridFormat {
    /// 날짜 컬럼 헤더
    pub date_column: String,
    /// chrono 날짜 형식
    pub date_pattern: String,
    /// 컬럼 헤더 템플릿 (`{}` 자리에 컬럼 이름)
    pub column_template: String,
    /// 소수점 자릿수
    pub precision: usize,
    pub line_separator: String,
    pub field_separator: String,
}

impl Default for GridFormat {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            date_pattern: "%Y-%m-%d %H:%M:%S".to_string(),
            column_template: "{}__price".to_string(),
            precision: 4,
            line_separator: "\n".to_string(),
            field_separator: "\t".to_string(),
        }
    }
}

impl GridFormat {
    /// 컬럼 헤더 템플릿 설정.
    pub fn with_column_template(mut self, template: impl Into<String>) -> Self {
        self.column_template = template.into();
        self
    }

    /// 소수점 자릿수 설정.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// 헤더 행.
    pub fn header(&self, columns: &[String]) -> String {
        std::iter::once(self.date_column.clone())
            .chain(columns.iter().map(|c| self.column_template.replace("{}", c)))
            .collect::<Vec<_>>()
            .join(&self.field_separator)
    }

    pub(crate) fn render<'a>(
        &self,
        columns: &[String],
        rows: impl Iterator<Item = (DateTime<Utc>, &'a [f64])>,
    ) -> String {
        let mut out = self.header(columns);
        out.push_str(&self.line_separator);
        for (timestamp, values) in rows {
            out.push_str(&timestamp.format(&self.date_pattern).to_string());
            for value in values {
                out.push_str(&self.field_separator);
                out.push_str(&format!("{:.*}", self.precision, value));
            }
            out.push_str(&self.line_separator);
        }
        out
    }
}

/// 관측값을 균일 그리드로 리샘플링합니다.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    step_hours: u32,
}

impl Resampler {
    /// 새 리샘플러 생성.
    pub fn new(step_hours: u32) -> Self {
        Self { step_hours }
    }

    pub fn step_hours(&self) -> u32 {
        self.step_hours
    }

    /// 관측값 목록을 그리드로 변환.
    ///
    /// 입력은 정렬되어 있지 않아도 됩니다 (안정 정렬 후 처리).
    /// 빈 입력과 0시간 간격은 `InvalidInput`입니다.
    pub fn resample(&self, observations: &[Observation]) -> ForecastResult<ResampledGrid> {
        if self.step_hours == 0 {
            return Err(ForecastError::InvalidInput(
                "step_hours must be positive".to_string(),
            ));
        }

        let mut sorted: Vec<&Observation> = observations.iter().collect();
        sorted.sort_by_key(|o| o.timestamp);

        let Some(first) = sorted.first() else {
            return Err(ForecastError::InvalidInput(
                "cannot resample an empty observation list".to_string(),
            ));
        };

        let names: Vec<String> = sorted.iter().map(|o| o.category_name()).collect();
        let columns: Vec<String> = names
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column_of: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let step = Duration::hours(i64::from(self.step_hours));
        let grid_start = Utc.from_utc_datetime(
            &first.timestamp.date_naive().and_time(NaiveTime::default()),
        );

        let mut last_seen: Vec<Option<f64>> = vec![None; columns.len()];
        let mut cur = grid_start;
        let mut rows = Vec::new();

        for (obs, name) in sorted.iter().zip(&names) {
            while obs.timestamp > cur {
                // 모든 컬럼이 한 번 이상 관측된 이후에만 행을 만든다
                if let Some(values) = last_seen.iter().copied().collect::<Option<Vec<f64>>>() {
                    rows.push(GridRow {
                        timestamp: cur,
                        values,
                    });
                }
                cur += step;
            }
            last_seen[column_of[name.as_str()]] = Some(obs.price);
        }

        debug!(
            observations = observations.len(),
            columns = columns.len(),
            rows = rows.len(),
            start = %grid_start,
            "리샘플링 완료"
        );

        Ok(ResampledGrid {
            columns,
            step,
            rows,
        })
    }
}

/// `Resampler::new(step_hours).resample(observations)`의 축약.
pub fn resample(observations: &[Observation], step_hours: u32) -> ForecastResult<ResampledGrid> {
    Resampler::new(step_hours).resample(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::CategoryKey;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, day, hour, minute, 0).unwrap()
    }

    fn obs(ts: DateTime<Utc>, price: f64, resource: &str) -> Observation {
        Observation::new(ts, price, CategoryKey::new(resource, "Linux", "z1"))
    }

    #[test]
    fn test_single_column_forward_fill() {
        let input = vec![
            obs(at(1, 1, 0), 1.0, "a"),
            obs(at(1, 9, 0), 2.0, "a"),
            obs(at(1, 13, 30), 3.0, "a"),
        ];
        let grid = resample(&input, 4).unwrap();

        // 00:00은 아직 관측 전이라 제외, 04:00/08:00은 1.0, 12:00은 2.0
        let stamps: Vec<_> = grid.rows().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![at(1, 4, 0), at(1, 8, 0), at(1, 12, 0)]);
        let values: Vec<f64> = grid.column_values(0).collect();
        assert_eq!(values, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rows_dropped_until_every_column_seen() {
        let input = vec![
            obs(at(1, 0, 30), 1.0, "a"),
            obs(at(1, 4, 30), 1.5, "a"),
            obs(at(1, 8, 15), 5.0, "b"),
            obs(at(1, 8, 30), 2.0, "a"),
            obs(at(1, 12, 30), 2.5, "a"),
            obs(at(1, 16, 30), 3.0, "a"),
        ];
        let grid = resample(&input, 4).unwrap();

        assert_eq!(
            grid.columns(),
            &["a__Linux__z1".to_string(), "b__Linux__z1".to_string()]
        );
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.rows()[0].timestamp, at(1, 12, 0));
        assert_eq!(grid.rows()[0].values, vec![2.0, 5.0]);
        assert_eq!(grid.rows()[1].values, vec![2.5, 5.0]);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let sorted = vec![
            obs(at(1, 1, 0), 1.0, "a"),
            obs(at(1, 5, 0), 2.0, "a"),
            obs(at(1, 9, 0), 3.0, "a"),
        ];
        let mut shuffled = sorted.clone();
        shuffled.reverse();

        assert_eq!(resample(&sorted, 4).unwrap(), resample(&shuffled, 4).unwrap());
    }

    #[test]
    fn test_grid_starts_at_midnight_of_first_day() {
        let input = vec![obs(at(3, 22, 0), 1.0, "a"), obs(at(4, 3, 0), 2.0, "a")];
        let grid = resample(&input, 4).unwrap();

        // 3일 00:00부터 4시간 간격, 22:00 관측 이후 첫 행은 3일 24:00 (= 4일 00:00)
        assert_eq!(grid.rows()[0].timestamp, at(4, 0, 0));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_observation_exactly_on_grid_point() {
        // 그리드 지점과 같은 시각의 관측값은 그 지점의 값이 된다
        let input = vec![obs(at(1, 0, 0), 1.0, "a"), obs(at(1, 4, 0), 2.0, "a")];
        let grid = resample(&input, 4).unwrap();

        // 04:00 행은 이후 관측이 없으므로 만들어지지 않는다
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.rows()[0].timestamp, at(1, 0, 0));
        assert_eq!(grid.rows()[0].values, vec![1.0]);
    }

    #[test]
    fn test_empty_and_zero_step_rejected() {
        assert!(matches!(
            resample(&[], 4),
            Err(ForecastError::InvalidInput(_))
        ));
        let input = vec![obs(at(1, 1, 0), 1.0, "a")];
        assert!(matches!(
            resample(&input, 0),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_column() {
        let grid = resample(&[obs(at(1, 1, 0), 1.0, "a")], 4).unwrap();
        assert!(matches!(
            grid.require_column("zzz"),
            Err(ForecastError::UnknownCategory(name)) if name == "zzz"
        ));
    }

    #[test]
    fn test_to_delimited_and_slice() {
        let input = vec![
            obs(at(1, 1, 0), 1.0, "a"),
            obs(at(1, 5, 0), 2.0, "a"),
            obs(at(1, 9, 0), 3.25, "a"),
        ];
        let grid = resample(&input, 4).unwrap();
        let text = grid.tail(1).to_delimited(&GridFormat::default());

        assert_eq!(
            text,
            "date\ta__Linux__z1__price\n2022-01-01 08:00:00\t2.0000\n"
        );
        assert_eq!(grid.slice(5, 9).row_count(), 0);
    }
}
