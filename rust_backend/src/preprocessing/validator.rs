//! Point set validation with detailed error and warning reporting.
//!
//! This module checks an ingested point set before it enters the Knox
//! pipeline: enough points for the variance to exist, distinct ids and
//! finite coordinates. Suspicious but computable inputs (coincident points,
//! a single date, coordinates that look like longitude/latitude) only
//! produce warnings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::domain::{Point, PointStore};

/// Maximum number of individual issues of one kind listed before summarizing.
const MAX_LISTED: usize = 5;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false, while warnings are informational only.
///
/// # Examples
///
/// ```
/// use knox_rust::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Duplicate point id: 4".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
///
/// * `total_points` - Number of points validated
/// * `duplicate_ids` - Points whose id was already seen
/// * `invalid_coordinates` - Points with a NaN or infinite coordinate
/// * `coincident_locations` - Points sharing exact coordinates with an earlier point
/// * `distinct_dates` - Number of distinct calendar dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_points: usize,
    pub duplicate_ids: usize,
    pub invalid_coordinates: usize,
    pub coincident_locations: usize,
    pub distinct_dates: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for ingested point sets.
///
/// # Examples
///
/// ```
/// use knox_rust::preprocessing::validator::PointValidator;
/// use knox_rust::core::domain::Point;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2014, 3, 1).unwrap();
/// let points = vec![
///     Point::new(1, day, 500_000.0, 6_500_000.0),
///     Point::new(2, day, 500_100.0, 6_500_000.0),
///     Point::new(3, day, 500_200.0, 6_500_000.0),
/// ];
///
/// let result = PointValidator::validate(&points);
/// assert!(!result.is_valid); // fewer than 4 points
/// assert_eq!(result.stats.total_points, 3);
/// ```
pub struct PointValidator;

impl PointValidator {
    /// Validates a point set.
    ///
    /// Errors:
    /// - fewer than [`PointStore::MIN_POINTS`] points
    /// - duplicate ids
    /// - NaN or infinite coordinates
    ///
    /// Warnings:
    /// - points at identical coordinates
    /// - all points on the same date
    /// - every coordinate inside the longitude/latitude range
    pub fn validate(points: &[Point]) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_points = points.len();

        if points.len() < PointStore::MIN_POINTS {
            result.add_error(format!(
                "At least {} points are required, got {}",
                PointStore::MIN_POINTS,
                points.len()
            ));
        }

        result.stats.duplicate_ids = Self::check_duplicates(points, &mut result);
        result.stats.invalid_coordinates = Self::check_coordinates(points, &mut result);
        result.stats.coincident_locations = Self::check_coincident(points, &mut result);

        let dates: HashSet<_> = points.iter().map(|p| p.date).collect();
        result.stats.distinct_dates = dates.len();
        if points.len() > 1 && dates.len() == 1 {
            result.add_warning(
                "All points share the same date; every pair is close in time".to_string(),
            );
        }

        if Self::looks_geographic(points) {
            result.add_warning(
                "All coordinates fall within longitude/latitude bounds; distances assume a projected system"
                    .to_string(),
            );
        }

        result
    }

    fn check_duplicates(points: &[Point], result: &mut ValidationResult) -> usize {
        let mut seen = HashSet::new();
        let mut duplicates = 0;

        for point in points {
            if !seen.insert(point.id) {
                duplicates += 1;
                if duplicates <= MAX_LISTED {
                    result.add_error(format!("Duplicate point id: {}", point.id));
                }
            }
        }

        if duplicates > MAX_LISTED {
            result.add_error(format!(
                "Total duplicate ids: {} (showing first {})",
                duplicates, MAX_LISTED
            ));
        }

        duplicates
    }

    fn check_coordinates(points: &[Point], result: &mut ValidationResult) -> usize {
        let mut invalid = 0;

        for point in points.iter().filter(|p| !p.location.is_finite()) {
            invalid += 1;
            if invalid <= MAX_LISTED {
                result.add_error(format!(
                    "Point {} has a non-finite coordinate ({}, {})",
                    point.id, point.location.x, point.location.y
                ));
            }
        }

        if invalid > MAX_LISTED {
            result.add_error(format!(
                "Total points with non-finite coordinates: {} (showing first {})",
                invalid, MAX_LISTED
            ));
        }

        invalid
    }

    fn check_coincident(points: &[Point], result: &mut ValidationResult) -> usize {
        let mut seen = HashSet::new();
        let coincident = points
            .iter()
            .filter(|p| p.location.is_finite())
            .filter(|p| !seen.insert((p.location.x.to_bits(), p.location.y.to_bits())))
            .count();

        if coincident > 0 {
            result.add_warning(format!(
                "{} point(s) share exact coordinates with another point",
                coincident
            ));
        }

        coincident
    }

    fn looks_geographic(points: &[Point]) -> bool {
        !points.is_empty()
            && points.iter().all(|p| {
                p.location.x.abs() <= 180.0 && p.location.y.abs() <= 90.0
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(id: i64, x: f64, y: f64, day: u32) -> Point {
        Point::new(
            id,
            NaiveDate::from_ymd_opt(2014, 5, day).unwrap(),
            x,
            y,
        )
    }

    fn projected(n: i64) -> Vec<Point> {
        (0..n)
            .map(|i| point(i, 400_000.0 + i as f64 * 250.0, 6_200_000.0, 1 + i as u32))
            .collect()
    }

    #[test]
    fn test_valid_points() {
        let result = PointValidator::validate(&projected(6));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.total_points, 6);
        assert_eq!(result.stats.distinct_dates, 6);
    }

    #[test]
    fn test_too_few_points_is_first_error() {
        let mut points = projected(3);
        points[1].id = 0;
        let result = PointValidator::validate(&points);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("At least 4 points"));
    }

    #[test]
    fn test_duplicate_ids_summarized() {
        let mut points = projected(4);
        for i in 0..7 {
            points.push(point(0, 500_000.0 + i as f64, 6_300_000.0, 2));
        }
        let result = PointValidator::validate(&points);
        assert!(!result.is_valid);
        assert_eq!(result.stats.duplicate_ids, 7);
        // five listed plus one summary line
        assert_eq!(result.errors.len(), 6);
        assert!(result.errors[5].contains("Total duplicate ids: 7"));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let mut points = projected(4);
        points[2].location.y = f64::NEG_INFINITY;
        let result = PointValidator::validate(&points);
        assert!(!result.is_valid);
        assert_eq!(result.stats.invalid_coordinates, 1);
        assert!(result.errors[0].contains("Point 2"));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let points = vec![
            point(1, 10.5, 59.3, 1),
            point(2, 10.5, 59.3, 1),
            point(3, 10.6, 59.4, 1),
            point(4, 10.7, 59.5, 1),
        ];
        let result = PointValidator::validate(&points);
        assert!(result.is_valid);
        assert_eq!(result.stats.coincident_locations, 1);
        assert_eq!(result.stats.distinct_dates, 1);
        assert_eq!(result.warnings.len(), 3);
    }
}
