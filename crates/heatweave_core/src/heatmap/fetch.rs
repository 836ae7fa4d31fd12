//! Contribution calendar fetch and parsing.
//!
//! # Responsibility
//! - Scrape per-day contribution levels from the public HTML calendar.
//! - Anchor the parsed days into a Sunday-first 7xW matrix.
//!
//! # Invariants
//! - Levels are clamped into 0..=4, matching the site's palette buckets.
//! - Matrix shaping is pure; only `fetch_levels` performs I/O.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("heatweave/", env!("CARGO_PKG_VERSION"));

// The calendar has shipped both <rect> and <td> day cells over time; both
// carry data-date and data-level attributes.
static DAY_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(?:rect|td)[^>]*data-date="([0-9-]+)"[^>]*data-level="([0-9]+)""#)
        .expect("day cell regex is valid")
});

pub type HeatmapResult<T> = Result<T, HeatmapError>;

#[derive(Debug)]
pub enum HeatmapError {
    /// Transport-level failure (DNS, TLS, timeout).
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response parsed to zero contribution days.
    NoData,
}

impl Display for HeatmapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "heatmap fetch failed: {err}"),
            Self::Status(code) => write!(f, "heatmap fetch returned status {code}"),
            Self::NoData => write!(f, "no contribution data found in response"),
        }
    }
}

impl Error for HeatmapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HeatmapError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Fetches per-day contribution levels for `username`.
pub fn fetch_levels(username: &str) -> HeatmapResult<BTreeMap<NaiveDate, u8>> {
    let url = format!("https://github.com/users/{username}/contributions");
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let response = client.get(url).header("Accept", "text/html").send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(HeatmapError::Status(status.as_u16()));
    }
    let body = response.text()?;
    let levels = parse_levels(&body);
    if levels.is_empty() {
        return Err(HeatmapError::NoData);
    }
    Ok(levels)
}

/// Extracts `date -> level` pairs from calendar HTML.
pub fn parse_levels(html: &str) -> BTreeMap<NaiveDate, u8> {
    let mut levels = BTreeMap::new();
    for capture in DAY_CELL.captures_iter(html) {
        let Ok(date) = capture[1].parse::<NaiveDate>() else {
            continue;
        };
        let Ok(level) = capture[2].parse::<u8>() else {
            continue;
        };
        levels.insert(date, level.min(4));
    }
    levels
}

/// Shapes parsed levels into a 7 x `weeks` matrix ending at the most
/// recent week, rows Sunday..Saturday.
///
/// Days absent from `levels` (future days, gaps) render as level 0.
pub fn build_matrix(levels: &BTreeMap<NaiveDate, u8>, weeks: usize) -> Vec<Vec<u8>> {
    let weeks = weeks.max(1);
    let mut matrix = vec![vec![0u8; weeks]; 7];
    let Some((&latest, _)) = levels.iter().next_back() else {
        return matrix;
    };
    let last_sunday = latest - Days::new(u64::from(latest.weekday().num_days_from_sunday()));
    let start_sunday = last_sunday - Days::new(7 * (weeks as u64 - 1));

    for col in 0..weeks {
        let week_start = start_sunday + Days::new(7 * col as u64);
        for row in 0..7 {
            let day = week_start + Days::new(row as u64);
            if let Some(&level) = levels.get(&day) {
                matrix[row][col] = level;
            }
        }
    }
    matrix
}

/// Fetches and shapes the preview matrix in one call.
pub fn fetch_matrix(username: &str, weeks: usize) -> HeatmapResult<Vec<Vec<u8>>> {
    let levels = fetch_levels(username)?;
    Ok(build_matrix(&levels, weeks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rect_and_td_cells() {
        let html = r#"
            <rect data-date="2024-01-07" data-level="3"></rect>
            <td class="day" data-date="2024-01-08" data-level="9"></td>
            <rect data-date="not-a-date" data-level="1"></rect>
        "#;
        let levels = parse_levels(html);
        assert_eq!(levels.len(), 2);
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(levels[&sunday], 3);
        // Levels clamp into the palette range.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(levels[&monday], 4);
    }

    #[test]
    fn matrix_is_sunday_anchored() {
        let mut levels = BTreeMap::new();
        // Wednesday 2024-01-10 in the week starting Sunday 2024-01-07.
        levels.insert(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), 2);
        let matrix = build_matrix(&levels, 2);
        assert_eq!(matrix.len(), 7);
        assert_eq!(matrix[0].len(), 2);
        assert_eq!(matrix[3][1], 2);
    }
}
