//! Python bindings for the Knox test.
//!
//! The point ingestion side (shapefile cursors, date field checks, JSON
//! export) lives in Python; these bindings take its in-memory records and run
//! the counting and moments in Rust with the GIL released.
//!
//! # Python API
//!
//! ```python
//! import knox_rust
//!
//! report = knox_rust.knox_test(
//!     [(0, "2014-03-05", (674032.4, 6580745.8)), ...],
//!     d_max=1800.0,
//!     t_max=16,
//! )
//! print(report.z_score, report.is_significant(1.96))
//! ```

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::config::{KnoxConfig, DEFAULT_D_MAX, DEFAULT_T_MAX};
use crate::core::domain::Point;
use crate::error::KnoxError;
use crate::io::loaders::PointLoader;
use crate::parsing::json_parser::parse_date;
use crate::services::knox_test::{run_on_store, run_with_config, KnoxReport};

/// Python wrapper for KnoxReport
#[pyclass(name = "KnoxReport")]
#[derive(Clone)]
pub struct PyKnoxReport {
    #[pyo3(get)]
    pub n: usize,
    #[pyo3(get)]
    pub d_max: f64,
    #[pyo3(get)]
    pub t_max: i64,
    #[pyo3(get)]
    pub ns: u64,
    #[pyo3(get)]
    pub n2s: u64,
    #[pyo3(get)]
    pub nt: u64,
    #[pyo3(get)]
    pub n2t: u64,
    #[pyo3(get)]
    pub x: u64,
    #[pyo3(get)]
    pub n_pairs: f64,
    #[pyo3(get)]
    pub expected: f64,
    #[pyo3(get)]
    pub variance: f64,
    #[pyo3(get)]
    pub std_dev: f64,
    #[pyo3(get)]
    pub z_score: f64,
}

#[pymethods]
impl PyKnoxReport {
    fn is_significant(&self, z_critical: f64) -> bool {
        self.z_score > z_critical
    }

    fn __repr__(&self) -> String {
        format!(
            "KnoxReport(n={}, X={}, E={:.4}, V={:.4}, Z={:.4})",
            self.n, self.x, self.expected, self.variance, self.z_score
        )
    }
}

impl From<KnoxReport> for PyKnoxReport {
    fn from(report: KnoxReport) -> Self {
        PyKnoxReport {
            n: report.n,
            d_max: report.config.d_max,
            t_max: report.config.t_max,
            ns: report.counts.ns,
            n2s: report.counts.n2s,
            nt: report.counts.nt,
            n2t: report.counts.n2t,
            x: report.counts.x,
            n_pairs: report.statistic.n_pairs,
            expected: report.statistic.expected,
            variance: report.statistic.variance,
            std_dev: report.statistic.std_dev,
            z_score: report.statistic.z_score,
        }
    }
}

fn to_py_err(err: KnoxError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Run the Knox test on `(id, date, (x, y))` records.
#[pyfunction]
#[pyo3(signature = (points, d_max = DEFAULT_D_MAX, t_max = DEFAULT_T_MAX))]
pub fn knox_test(
    py: Python<'_>,
    points: Vec<(i64, String, (f64, f64))>,
    d_max: f64,
    t_max: i64,
) -> PyResult<PyKnoxReport> {
    let points = points
        .into_iter()
        .map(|(id, date, (x, y))| {
            let date = parse_date(&date)
                .map_err(|e| PyValueError::new_err(format!("point {}: {:#}", id, e)))?;
            Ok(Point::new(id, date, x, y))
        })
        .collect::<PyResult<Vec<Point>>>()?;

    let config = KnoxConfig::new(d_max, t_max);
    let report = py
        .detach(|| run_with_config(points, &config))
        .map_err(to_py_err)?;
    Ok(report.into())
}

/// Run the Knox test on an indexed points JSON file.
#[pyfunction]
#[pyo3(signature = (path, d_max = DEFAULT_D_MAX, t_max = DEFAULT_T_MAX))]
pub fn knox_test_json(
    py: Python<'_>,
    path: PathBuf,
    d_max: f64,
    t_max: i64,
) -> PyResult<PyKnoxReport> {
    let store =
        PointLoader::load_store(&path).map_err(|e| PyIOError::new_err(format!("{:#}", e)))?;

    let config = KnoxConfig::new(d_max, t_max);
    let report = py
        .detach(|| run_on_store(&store, &config))
        .map_err(to_py_err)?;
    Ok(report.into())
}
