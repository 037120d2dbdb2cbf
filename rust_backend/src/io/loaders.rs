use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::domain::{Point, PointStore};
use crate::parsing::json_parser;
use crate::preprocessing::validator::{PointValidator, ValidationResult};

/// Result of loading point data
#[derive(Debug)]
pub struct PointLoadResult {
    pub points: Vec<Point>,
    pub validation: ValidationResult,
    pub num_points: usize,
}

impl PointLoadResult {
    pub fn new(points: Vec<Point>) -> Self {
        let validation = PointValidator::validate(&points);
        let num_points = points.len();
        Self {
            points,
            validation,
            num_points,
        }
    }

    /// Move the points into a [`PointStore`], failing on validation errors.
    ///
    /// Reuses the validation computed at load time.
    pub fn into_store(self) -> Result<PointStore> {
        PointStore::from_validated(self.points, &self.validation).map_err(anyhow::Error::from)
    }
}

/// Unified interface for loading point events
pub struct PointLoader;

impl PointLoader {
    /// Load points from a file (format chosen by extension)
    pub fn load_from_file(path: &Path) -> Result<PointLoadResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "json" => Self::load_from_json(path),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Load points from an indexed points JSON file
    pub fn load_from_json(json_path: &Path) -> Result<PointLoadResult> {
        let points =
            json_parser::parse_points_json(json_path).context("Failed to parse JSON file")?;
        log::info!("Loaded {} points from {}", points.len(), json_path.display());

        Ok(PointLoadResult::new(points))
    }

    /// Load points from a JSON string
    pub fn load_from_json_str(json_str: &str) -> Result<PointLoadResult> {
        let points =
            json_parser::parse_points_json_str(json_str).context("Failed to parse JSON string")?;

        Ok(PointLoadResult::new(points))
    }

    /// Load a file straight into a validated [`PointStore`]
    pub fn load_store(path: &Path) -> Result<PointStore> {
        Self::load_from_file(path)?
            .into_store()
            .with_context(|| format!("Invalid point set in {}", path.display()))
    }
}

/// Exported record, serialized as `[id, "YYYY-MM-DD", [x, y]]`
#[derive(Serialize)]
struct ExportRecord(i64, String, [f64; 2]);

impl From<&Point> for ExportRecord {
    fn from(point: &Point) -> Self {
        ExportRecord(
            point.id,
            point.date.format("%Y-%m-%d").to_string(),
            [point.location.x, point.location.y],
        )
    }
}

/// Serialize points in the indexed points JSON format
pub fn points_to_json_string(points: &[Point]) -> Result<String> {
    let mut buffer = Vec::new();
    write_points_json(points, &mut buffer)?;
    String::from_utf8(buffer).context("Exported JSON is not valid UTF-8")
}

/// Write points in the indexed points JSON format to a file
pub fn export_points_json(points: &[Point], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_points_json(points, &mut writer)?;
    writer.flush().context("Failed to flush export file")?;

    log::info!("Exported {} points to {}", points.len(), path.display());
    Ok(())
}

fn write_points_json<W: Write>(points: &[Point], writer: W) -> Result<()> {
    let records: Vec<ExportRecord> = points.iter().map(ExportRecord::from).collect();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize points")
}
