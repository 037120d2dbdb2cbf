use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::core::domain::Point;

/// Custom deserializer that accepts either string or integer for point IDs
fn deserialize_point_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => s.trim().parse::<i64>().map_err(D::Error::custom),
        StringOrInt::Int(i) => Ok(i),
    }
}

/// Raw JSON record: `[id, "date", [x, y]]`
#[derive(Debug, Deserialize)]
struct RawPoint(
    #[serde(deserialize_with = "deserialize_point_id")] i64,
    String,
    [f64; 2],
);

/// Formats tried, in order, for date-time strings.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date or date-time string and keep only the calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// and RFC 3339 with an offset. RFC 3339 values keep the date as written
/// in their own offset.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    anyhow::bail!("Unrecognized date format: '{}'", value)
}

/// Parse an indexed points JSON file into Point structures
pub fn parse_points_json(json_path: &Path) -> Result<Vec<Point>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_points_json_str(&json_content)
        .with_context(|| format!("Failed to parse points from {}", json_path.display()))
}

/// Parse indexed points JSON from a string
///
/// The document is an array of `[id, date, [x, y]]` records, as produced by
/// the point indexing export.
pub fn parse_points_json_str(json_str: &str) -> Result<Vec<Point>> {
    let mut deserializer = serde_json::Deserializer::from_str(json_str);
    let raw: Vec<RawPoint> = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        anyhow::anyhow!("JSON deserialization error at {}: {}", path, e.into_inner())
    })?;
    deserializer
        .end()
        .context("Trailing characters after points array")?;

    raw.into_iter()
        .enumerate()
        .map(|(idx, raw)| convert_raw_to_domain(raw, idx))
        .collect()
}

/// Convert raw JSON record to domain model
fn convert_raw_to_domain(raw: RawPoint, idx: usize) -> Result<Point> {
    let RawPoint(id, date, [x, y]) = raw;
    let date = parse_date(&date)
        .with_context(|| format!("Invalid date for point at index {} (id {})", idx, id))?;
    Ok(Point::new(id, date, x, y))
}
