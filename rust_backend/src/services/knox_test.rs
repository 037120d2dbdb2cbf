//! Knox space-time interaction test pipeline.
//!
//! Points flow through validation into a [`PointStore`], the
//! [`ClusterCounter`] accumulates raw ordered-pair counts, the counts are
//! normalized once, and the moments turn them into a [`ClusterStatistic`].

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::algorithms::counting::{ClusterCounter, ProgressCallback};
use crate::algorithms::moments::compute_statistics;
use crate::algorithms::normalize::normalize;
use crate::config::KnoxConfig;
use crate::core::domain::{ClusterStatistic, MatchCounts, Point, PointStore};
use crate::error::KnoxResult;

/// Everything a Knox run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnoxReport {
    /// Number of points.
    pub n: usize,
    /// Thresholds the run used.
    pub config: KnoxConfig,
    /// Counter output, every quantity doubled.
    pub raw_counts: MatchCounts,
    /// Counts per unordered pair.
    pub counts: MatchCounts,
    pub statistic: ClusterStatistic,
}

/// Run the Knox test with explicit thresholds.
///
/// # Arguments
/// * `points` - Ingested points; must hold at least 4 points with distinct ids
/// * `d_max` - Spatial threshold in projection units
/// * `t_max` - Temporal threshold in days
///
/// # Examples
///
/// ```
/// use knox_rust::core::domain::Point;
/// use knox_rust::services::knox_test::run;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + chrono::Days::new(d);
/// let points = vec![
///     Point::new(1, day(0), 0.0, 0.0),
///     Point::new(2, day(1), 100.0, 0.0),
///     Point::new(3, day(1), 5000.0, 0.0),
///     Point::new(4, day(20), 90.0, 0.0),
/// ];
///
/// let stat = run(points, 1800.0, 16).unwrap();
/// assert_eq!(stat.n_pairs, 6.0);
/// assert_eq!(stat.variance, 2.25);
/// ```
pub fn run(points: Vec<Point>, d_max: f64, t_max: i64) -> KnoxResult<ClusterStatistic> {
    run_with_config(points, &KnoxConfig::new(d_max, t_max)).map(|report| report.statistic)
}

/// Run the Knox test and return counts alongside the statistic.
pub fn run_with_config(points: Vec<Point>, config: &KnoxConfig) -> KnoxResult<KnoxReport> {
    execute(points, config, None)
}

/// Like [`run_with_config`], calling `on_progress` every
/// `config.progress_interval` points during counting.
pub fn run_with_progress(
    points: Vec<Point>,
    config: &KnoxConfig,
    on_progress: ProgressCallback<'_>,
) -> KnoxResult<KnoxReport> {
    execute(points, config, Some(on_progress))
}

/// Run the Knox test on an already validated store.
pub fn run_on_store(store: &PointStore, config: &KnoxConfig) -> KnoxResult<KnoxReport> {
    config.validate()?;
    analyze(store, config, None)
}

/// [`run_on_store`] with a progress callback during counting.
pub fn run_on_store_with_progress(
    store: &PointStore,
    config: &KnoxConfig,
    on_progress: ProgressCallback<'_>,
) -> KnoxResult<KnoxReport> {
    config.validate()?;
    analyze(store, config, Some(on_progress))
}

fn execute(
    points: Vec<Point>,
    config: &KnoxConfig,
    on_progress: Option<ProgressCallback<'_>>,
) -> KnoxResult<KnoxReport> {
    config.validate()?;
    let store = PointStore::new(points)?;
    analyze(&store, config, on_progress)
}

fn analyze(
    store: &PointStore,
    config: &KnoxConfig,
    on_progress: Option<ProgressCallback<'_>>,
) -> KnoxResult<KnoxReport> {
    let start = Instant::now();
    let n = store.len();
    log::info!(
        "Knox test on {} points (d_max={}, t_max={} days)",
        n,
        config.d_max,
        config.t_max
    );

    let raw_counts = count(store, config, on_progress);
    let counts = normalize(&raw_counts);
    log::debug!("Normalized counts: {:?}", counts);

    let statistic = compute_statistics(&counts, n)?;
    log::info!(
        "Knox test finished in {:.3}s: X={} E={:.4} V={:.4} Z={:.4}",
        start.elapsed().as_secs_f64(),
        counts.x,
        statistic.expected,
        statistic.variance,
        statistic.z_score
    );

    Ok(KnoxReport {
        n,
        config: *config,
        raw_counts,
        counts,
        statistic,
    })
}

#[cfg(not(feature = "parallel"))]
fn count(
    store: &PointStore,
    config: &KnoxConfig,
    on_progress: Option<ProgressCallback<'_>>,
) -> MatchCounts {
    let counter = ClusterCounter::from_config(config);
    match on_progress {
        Some(callback) => counter.count_with_progress(store, callback),
        None => counter.count(store),
    }
}

#[cfg(feature = "parallel")]
fn count(
    store: &PointStore,
    config: &KnoxConfig,
    on_progress: Option<ProgressCallback<'_>>,
) -> MatchCounts {
    let counter = ClusterCounter::from_config(config);
    match on_progress {
        Some(callback) => counter.count_parallel_with_progress(store, callback),
        None => counter.count_parallel(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::counting::CountProgress;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn point(id: i64, x: f64, y: f64, day: u64) -> Point {
        let date = NaiveDate::from_ymd_opt(2012, 6, 1).unwrap() + chrono::Days::new(day);
        Point::new(id, date, x, y)
    }

    fn four_points() -> Vec<Point> {
        vec![
            point(1, 0.0, 0.0, 0),
            point(2, 100.0, 0.0, 1),
            point(3, 5000.0, 0.0, 1),
            point(4, 90.0, 0.0, 20),
        ]
    }

    #[test]
    fn test_four_point_report() {
        let report = run_with_config(four_points(), &KnoxConfig::default()).unwrap();
        assert_eq!(report.n, 4);
        assert_eq!(report.raw_counts, MatchCounts { ns: 6, n2s: 6, nt: 6, n2t: 6, x: 2 });
        assert_eq!(report.counts, MatchCounts { ns: 3, n2s: 3, nt: 3, n2t: 3, x: 1 });
        assert_eq!(report.statistic.expected, 1.5);
        assert_eq!(report.statistic.variance, 2.25);
        assert!((report.statistic.z_score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_points_fail_before_counting() {
        let mut points = four_points();
        points.pop();
        let err = run(points, 1800.0, 16).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_no_matches_reports_undefined_z() {
        let points = (0..6)
            .map(|i| point(i, i as f64 * 10_000.0, 0.0, i as u64 * 50))
            .collect();
        let err = run_with_config(points, &KnoxConfig::default()).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = run(four_points(), -5.0, 16).unwrap_err();
        assert!(matches!(err, crate::error::KnoxError::ConfigurationError { .. }));
    }

    #[test]
    fn test_progress_is_reported() {
        let calls = AtomicUsize::new(0);
        let callback = |_: CountProgress| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let config = KnoxConfig::default().with_progress_interval(2);
        run_with_progress(four_points(), &config, &callback).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_run_on_store_matches_run() {
        let store = PointStore::new(four_points()).unwrap();
        let from_store = run_on_store(&store, &KnoxConfig::default()).unwrap();
        assert_eq!(from_store.statistic, run(four_points(), 1800.0, 16).unwrap());
    }

    #[test]
    fn test_run_on_store_with_progress() {
        let store = PointStore::new(four_points()).unwrap();
        let seen = AtomicUsize::new(0);
        let callback = |p: CountProgress| {
            seen.fetch_max(p.completed, Ordering::SeqCst);
        };
        let config = KnoxConfig::default().with_progress_interval(1);
        let report = run_on_store_with_progress(&store, &config, &callback).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 4);
        assert_eq!(report.counts, MatchCounts { ns: 3, n2s: 3, nt: 3, n2t: 3, x: 1 });
    }

    #[test]
    fn test_report_serializes() {
        let report = run_with_config(four_points(), &KnoxConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["counts"]["ns"], 3);
        assert_eq!(json["statistic"]["expected"], 1.5);
        assert_eq!(json["config"]["t_max"], 16);
    }
}
