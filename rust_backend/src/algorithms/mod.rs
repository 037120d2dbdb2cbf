//! Space-time clustering algorithms.
//!
//! This module provides the proximity tests, the pair and chain counter,
//! the double-count normalization and the analytic moments of the Knox test.
//!
//! # Components
//!
//! - [`proximity`]: Spatial and temporal closeness of two points
//! - [`counting`]: First- and second-order match counting over ordered pairs
//! - [`normalize`]: Correction for the double count of ordered-pair iteration
//! - [`moments`]: Pair count, expected value, variance and Z-score
//!
//! # Example
//!
//! ```
//! use knox_rust::algorithms::{compute_statistics, ClusterCounter};
//! use knox_rust::core::domain::{Point, PointStore};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + chrono::Days::new(d);
//! let store = PointStore::new(vec![
//!     Point::new(1, day(0), 0.0, 0.0),
//!     Point::new(2, day(1), 100.0, 0.0),
//!     Point::new(3, day(1), 5000.0, 0.0),
//!     Point::new(4, day(20), 90.0, 0.0),
//! ]).unwrap();
//!
//! let counts = ClusterCounter::default().count(&store).normalized();
//! let stat = compute_statistics(&counts, store.len()).unwrap();
//! assert_eq!(stat.expected, 1.5);
//! ```

pub mod counting;
pub mod moments;
pub mod normalize;
pub mod proximity;

pub use counting::{ClusterCounter, CountProgress, ProgressCallback};
pub use moments::{compute_statistics, expected_value, pair_count, variance};
pub use normalize::normalize;
pub use proximity::ProximityEvaluator;
