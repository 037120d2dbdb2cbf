//! # Knox Rust Backend
//!
//! Knox space-time interaction test for geocoded, dated point events.
//!
//! Given events with a planar location and a calendar date, the Knox test
//! counts pairs that are close in space (distance `<= d_max`), close in time
//! (`<= t_max` days apart) and close in both, then compares the joint count
//! against its expectation under space-time independence using the analytic
//! variance of Kulldorff & Hjalmars (1999).
//!
//! ## Architecture
//!
//! - [`core`]: Points, the point store, match counts and the statistic
//! - [`algorithms`]: Proximity tests, pair/chain counting, normalization, moments
//! - [`preprocessing`]: Point set validation
//! - [`parsing`] / [`io`]: Indexed points JSON ingestion and export
//! - [`services`]: The end-to-end pipeline (`run`, `run_with_config`, ...)
//! - [`config`]: Thresholds, defaults and `knox.toml` loading
//! - [`error`]: `KnoxError` taxonomy
//!
//! ## Features
//!
//! - `cli` (default): the `knox` command line tool
//! - `parallel`: count over the outer index on the rayon thread pool
//! - `python`: the `knox_rust` Python extension module
//!
//! ## Example
//!
//! ```
//! use knox_rust::{run, Point};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + chrono::Days::new(d);
//! let points = vec![
//!     Point::new(1, day(0), 0.0, 0.0),
//!     Point::new(2, day(1), 100.0, 0.0),
//!     Point::new(3, day(1), 5000.0, 0.0),
//!     Point::new(4, day(20), 90.0, 0.0),
//! ];
//!
//! let stat = run(points, 1800.0, 16).unwrap();
//! println!("Z = {:.3}", stat.z_score);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;

#[cfg(feature = "python")]
pub mod python;

pub use crate::config::KnoxConfig;
pub use crate::core::domain::{ClusterStatistic, Location, MatchCounts, Point, PointStore};
pub use crate::error::{KnoxError, KnoxResult};
pub use crate::services::knox_test::{run, run_with_config, run_with_progress, KnoxReport};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Knox Rust Backend - space-time interaction test
#[cfg(feature = "python")]
#[pymodule]
fn knox_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyKnoxReport>()?;
    m.add_function(wrap_pyfunction!(python::knox_test, m)?)?;
    m.add_function(wrap_pyfunction!(python::knox_test_json, m)?)?;

    Ok(())
}
