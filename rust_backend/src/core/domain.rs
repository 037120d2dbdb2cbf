//! Domain models for dated point events and the Knox test results.
//!
//! This module provides the core data structures that flow through the
//! pipeline: the ingested points, the ordered store that owns them for one
//! run, the match counts accumulated by the counter, and the final statistic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::error::{ErrorContext, KnoxError, KnoxResult};
use crate::preprocessing::validator::{PointValidator, ValidationResult};

/// Planar location in a projected coordinate system.
///
/// Coordinates are expected in a metric projection (e.g. UTM or a national
/// grid), so distances are plain Euclidean distances in the projection unit.
///
/// # Examples
///
/// ```
/// use knox_rust::core::domain::Location;
///
/// let a = Location::new(0.0, 0.0);
/// let b = Location::new(3.0, 4.0);
/// assert_eq!(a.distance_to(&b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance `sqrt((x1-x2)^2 + (y1-y2)^2)`.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A single geocoded, dated event.
///
/// Points are immutable once loaded; the pipeline only ever reads them.
///
/// # Examples
///
/// ```
/// use knox_rust::core::domain::Point;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
/// let point = Point::new(7, date, 512_000.0, 6_580_000.0);
///
/// assert_eq!(point.id, 7);
/// assert_eq!(point.location.x, 512_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    /// Calendar date of the event (its timestamp); time of day is not kept.
    #[serde(alias = "timestamp")]
    pub date: NaiveDate,
    pub location: Location,
}

impl Point {
    pub fn new(id: i64, date: NaiveDate, x: f64, y: f64) -> Self {
        Self {
            id,
            date,
            location: Location::new(x, y),
        }
    }

    /// Absolute difference between the two event dates in whole days.
    pub fn days_between(&self, other: &Point) -> i64 {
        (other.date - self.date).num_days().abs()
    }
}

/// Ordered, indexable collection of validated points for one analysis run.
///
/// Construction validates the points (at least [`PointStore::MIN_POINTS`]
/// points, distinct ids, finite coordinates) so that everything downstream
/// can rely on those invariants.
///
/// # Examples
///
/// ```
/// use knox_rust::core::domain::{Point, PointStore};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
/// let points = (0..4).map(|i| Point::new(i, day, i as f64, 0.0)).collect();
/// let store = PointStore::new(points).unwrap();
/// assert_eq!(store.len(), 4);
///
/// let too_few = vec![Point::new(1, day, 0.0, 0.0)];
/// assert!(PointStore::new(too_few).unwrap_err().is_input_error());
/// ```
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    /// Smallest point count for which the variance is defined; the moment
    /// formulas divide by `(n - 2)(n - 3)`.
    pub const MIN_POINTS: usize = 4;

    /// Validates `points` and takes ownership of them.
    pub fn new(points: Vec<Point>) -> KnoxResult<Self> {
        let validation = PointValidator::validate(&points);
        Self::from_validated(points, &validation)
    }

    /// Takes ownership of `points` using a validation already run on them.
    ///
    /// `validation` must come from [`PointValidator::validate`] on the same
    /// points; its warnings are logged and its first error is returned.
    pub fn from_validated(points: Vec<Point>, validation: &ValidationResult) -> KnoxResult<Self> {
        for warning in &validation.warnings {
            log::warn!("{}", warning);
        }
        if let Some(first) = validation.errors.first() {
            return Err(KnoxError::input_with_context(
                first.clone(),
                ErrorContext::new("build_point_store")
                    .with_details(format!("{} validation error(s)", validation.errors.len())),
            ));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl std::ops::Index<usize> for PointStore {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointStore {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// First- and second-order match counts.
///
/// * `ns` - pairs close in space
/// * `n2s` - pairs of spatially close pairs sharing one point
/// * `nt` - pairs close in time
/// * `n2t` - pairs of temporally close pairs sharing one point
/// * `x` - pairs close in both space and time
///
/// Counts straight out of the counter visit every unordered pair twice;
/// [`MatchCounts::normalized`] halves them.
///
/// # Examples
///
/// ```
/// use knox_rust::core::domain::MatchCounts;
///
/// let raw = MatchCounts { ns: 6, n2s: 6, nt: 2, n2t: 0, x: 2 };
/// let counts = raw.normalized();
/// assert_eq!(counts.ns, 3);
/// assert_eq!(counts.x, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub ns: u64,
    pub n2s: u64,
    pub nt: u64,
    pub n2t: u64,
    pub x: u64,
}

impl MatchCounts {
    /// Halves every count, undoing the double count of ordered-pair iteration.
    pub fn normalized(&self) -> MatchCounts {
        crate::algorithms::normalize::normalize(self)
    }

    /// Returns `true` if every count is even, which holds for any raw
    /// counter output.
    pub fn is_symmetric(&self) -> bool {
        [self.ns, self.n2s, self.nt, self.n2t, self.x]
            .iter()
            .all(|c| c % 2 == 0)
    }
}

impl Add for MatchCounts {
    type Output = MatchCounts;

    fn add(self, rhs: MatchCounts) -> MatchCounts {
        MatchCounts {
            ns: self.ns + rhs.ns,
            n2s: self.n2s + rhs.n2s,
            nt: self.nt + rhs.nt,
            n2t: self.n2t + rhs.n2t,
            x: self.x + rhs.x,
        }
    }
}

impl AddAssign for MatchCounts {
    fn add_assign(&mut self, rhs: MatchCounts) {
        *self = *self + rhs;
    }
}

/// Knox statistic for one run.
///
/// * `n_pairs` - number of unordered point pairs, `n(n-1)/2`
/// * `expected` - expected number of space-time pairs under independence
/// * `variance` - analytic variance of the space-time pair count
/// * `std_dev` - square root of `variance`
/// * `z_score` - `|X - E| / std_dev`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatistic {
    pub n_pairs: f64,
    pub expected: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub z_score: f64,
}

impl ClusterStatistic {
    /// Returns `true` if the Z-score exceeds `z_critical` (e.g. 1.96 for a
    /// two-sided 5% level).
    ///
    /// # Examples
    ///
    /// ```
    /// use knox_rust::core::domain::ClusterStatistic;
    ///
    /// let stat = ClusterStatistic {
    ///     n_pairs: 45.0,
    ///     expected: 2.0,
    ///     variance: 1.0,
    ///     std_dev: 1.0,
    ///     z_score: 3.0,
    /// };
    /// assert!(stat.is_significant(1.96));
    /// assert!(!stat.is_significant(3.5));
    /// ```
    pub fn is_significant(&self, z_critical: f64) -> bool {
        self.z_score > z_critical
    }
}
