use std::time::{Duration, Instant};

use crate::config::KnoxConfig;
use crate::core::domain::{MatchCounts, Point, PointStore};

use super::proximity::ProximityEvaluator;

/// Snapshot passed to progress callbacks while counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountProgress {
    /// Outer indices fully processed so far.
    pub completed: usize,
    /// Total number of outer indices (the number of points).
    pub total: usize,
    /// Wall time since counting started.
    pub elapsed: Duration,
}

impl CountProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Progress callback; `Sync` so the parallel counter can call it from workers.
pub type ProgressCallback<'a> = &'a (dyn Fn(CountProgress) + Sync);

/// Accumulates first- and second-order match counts over all ordered pairs.
///
/// For every ordered pair `(i, j)` of distinct points the counter records
/// spatial, temporal and joint matches. When `(i, j)` matches in space (or
/// time), every third point `k` for which `(j, k)` also matches in space (or
/// time) adds one to `n2s` (or `n2t`). The returned counts are raw: every
/// quantity is exactly twice its unordered value.
///
/// The cost is O(n^3) in the worst case; the inner `k` loop only runs for
/// pairs with at least one match.
#[derive(Debug, Clone, Copy)]
pub struct ClusterCounter {
    evaluator: ProximityEvaluator,
    progress_interval: usize,
}

impl ClusterCounter {
    pub fn new(evaluator: ProximityEvaluator) -> Self {
        Self {
            evaluator,
            progress_interval: crate::config::DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn from_config(config: &KnoxConfig) -> Self {
        Self::new(ProximityEvaluator::from_config(config))
            .with_progress_interval(config.progress_interval)
    }

    /// Outer iterations between progress callbacks; 0 only reports completion.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn evaluator(&self) -> &ProximityEvaluator {
        &self.evaluator
    }

    /// Count all matches sequentially.
    pub fn count(&self, store: &PointStore) -> MatchCounts {
        self.count_sequential(store.points(), None)
    }

    /// Count all matches sequentially, reporting progress through `on_progress`.
    pub fn count_with_progress(
        &self,
        store: &PointStore,
        on_progress: ProgressCallback<'_>,
    ) -> MatchCounts {
        self.count_sequential(store.points(), Some(on_progress))
    }

    /// Count all matches with the outer index spread over the rayon pool.
    ///
    /// Each worker folds its own partial counts, which are summed at the end;
    /// the result is identical to [`ClusterCounter::count`].
    #[cfg(feature = "parallel")]
    pub fn count_parallel(&self, store: &PointStore) -> MatchCounts {
        self.count_rayon(store.points(), None)
    }

    /// Parallel counterpart of [`ClusterCounter::count_with_progress`].
    #[cfg(feature = "parallel")]
    pub fn count_parallel_with_progress(
        &self,
        store: &PointStore,
        on_progress: ProgressCallback<'_>,
    ) -> MatchCounts {
        self.count_rayon(store.points(), Some(on_progress))
    }

    fn count_sequential(
        &self,
        points: &[Point],
        on_progress: Option<ProgressCallback<'_>>,
    ) -> MatchCounts {
        let start = Instant::now();
        let total = points.len();
        log::debug!("Counting space-time matches over {} points", total);

        let mut counts = MatchCounts::default();
        for i in 0..total {
            counts += self.count_row(points, i);
            self.report(on_progress, i + 1, total, start);
        }

        log::debug!(
            "Counted raw matches {:?} in {:.3}s",
            counts,
            start.elapsed().as_secs_f64()
        );
        counts
    }

    #[cfg(feature = "parallel")]
    fn count_rayon(
        &self,
        points: &[Point],
        on_progress: Option<ProgressCallback<'_>>,
    ) -> MatchCounts {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let start = Instant::now();
        let total = points.len();
        let completed = AtomicUsize::new(0);
        log::debug!(
            "Counting space-time matches over {} points on {} threads",
            total,
            rayon::current_num_threads()
        );

        let counts = (0..total)
            .into_par_iter()
            .map(|i| {
                let row = self.count_row(points, i);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                self.report(on_progress, done, total, start);
                row
            })
            .reduce(MatchCounts::default, |a, b| a + b);

        log::debug!(
            "Counted raw matches {:?} in {:.3}s",
            counts,
            start.elapsed().as_secs_f64()
        );
        counts
    }

    /// Contribution of outer index `i` to the raw counts.
    fn count_row(&self, points: &[Point], i: usize) -> MatchCounts {
        let eval = &self.evaluator;
        let pi = &points[i];
        let mut row = MatchCounts::default();

        for pj in points {
            if pj.id == pi.id {
                continue;
            }

            let space = eval.spatial_match(pi, pj);
            let time = eval.temporal_match(pi, pj);
            if space {
                row.ns += 1;
            }
            if time {
                row.nt += 1;
            }
            if space && time {
                row.x += 1;
            }
            if !space && !time {
                continue;
            }

            // Second order: chains i-j-k joined on j.
            for pk in points {
                if pk.id == pi.id || pk.id == pj.id {
                    continue;
                }
                if space && eval.spatial_match(pj, pk) {
                    row.n2s += 1;
                }
                if time && eval.temporal_match(pj, pk) {
                    row.n2t += 1;
                }
            }
        }

        row
    }

    fn report(
        &self,
        on_progress: Option<ProgressCallback<'_>>,
        completed: usize,
        total: usize,
        start: Instant,
    ) {
        let Some(callback) = on_progress else {
            return;
        };
        let on_cadence = self.progress_interval > 0 && completed % self.progress_interval == 0;
        if on_cadence || completed == total {
            callback(CountProgress {
                completed,
                total,
                elapsed: start.elapsed(),
            });
        }
    }
}

impl Default for ClusterCounter {
    fn default() -> Self {
        Self::from_config(&KnoxConfig::default())
    }
}
