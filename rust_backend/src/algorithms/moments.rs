//! Analytic moments of the Knox statistic.
//!
//! Follows Kulldorff & Hjalmars, "The Knox method and other tests for
//! space-time interaction", Biometrics 55.2 (1999): 544-552. With `n` cases,
//! `N = n(n-1)/2` pairs, `Ns`/`Nt` pairs close in space/time, `N2s`/`N2t`
//! pairs of such pairs sharing a case, and `X` pairs close in both:
//!
//! ```text
//! E = Ns Nt / N
//! V = Ns Nt / N
//!   + 4 N2s N2t / (n(n-1)(n-2))
//!   + 4 (Ns(Ns-1) - N2s)(Nt(Nt-1) - N2t) / (n(n-1)(n-2)(n-3))
//!   - (Ns Nt / N)^2
//! Z = |X - E| / sqrt(V)
//! ```

use crate::core::domain::{ClusterStatistic, MatchCounts, PointStore};
use crate::error::{ErrorContext, KnoxError, KnoxResult};

/// Number of unordered pairs among `n` points.
pub fn pair_count(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

/// Expected number of space-time pairs, `Nt * Ns / N`.
pub fn expected_value(counts: &MatchCounts, n: usize) -> f64 {
    counts.nt as f64 * counts.ns as f64 / pair_count(n)
}

/// Variance of the space-time pair count under space-time independence.
pub fn variance(counts: &MatchCounts, n: usize) -> f64 {
    let n = n as f64;
    let pairs = n * (n - 1.0) / 2.0;
    let ns = counts.ns as f64;
    let n2s = counts.n2s as f64;
    let nt = counts.nt as f64;
    let n2t = counts.n2t as f64;

    let first_order = ns * nt / pairs;
    let cross = 4.0 * n2s * n2t / (n * (n - 1.0) * (n - 2.0));
    let third_order = 4.0 * (ns * (ns - 1.0) - n2s) * (nt * (nt - 1.0) - n2t)
        / (n * (n - 1.0) * (n - 2.0) * (n - 3.0));

    first_order + cross + third_order - (ns * nt / pairs).powi(2)
}

/// Compute the Knox statistic from normalized counts.
///
/// # Arguments
/// * `counts` - Normalized (halved) match counts
/// * `n` - Number of points
///
/// # Errors
/// * `InputError` if `n < 4`, or if the variance is zero so `Z` is undefined
/// * `DomainError` if the variance is negative
pub fn compute_statistics(counts: &MatchCounts, n: usize) -> KnoxResult<ClusterStatistic> {
    if n < PointStore::MIN_POINTS {
        return Err(KnoxError::input_with_context(
            format!(
                "Knox variance needs at least {} points, got {}",
                PointStore::MIN_POINTS,
                n
            ),
            ErrorContext::new("compute_statistics"),
        ));
    }

    let n_pairs = pair_count(n);
    let expected = expected_value(counts, n);
    let variance = variance(counts, n);
    log::debug!("Knox moments: N={} E={} V={}", n_pairs, expected, variance);

    if variance < 0.0 || variance.is_nan() {
        return Err(KnoxError::domain_with_context(
            format!("variance must be non-negative, got {}", variance),
            ErrorContext::new("compute_statistics").with_details(format!("{:?}, n={}", counts, n)),
        ));
    }

    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Err(KnoxError::input_with_context(
            "Z-score is undefined: variance of the space-time pair count is zero",
            ErrorContext::new("compute_statistics").with_details(format!("{:?}, n={}", counts, n)),
        ));
    }

    let z_score = (counts.x as f64 - expected).abs() / std_dev;

    Ok(ClusterStatistic {
        n_pairs,
        expected,
        variance,
        std_dev,
        z_score,
    })
}
