//! High-level data loading and export utilities.
//!
//! This module combines parsing with validation so callers get either a
//! ready-to-use [`PointStore`](crate::core::domain::PointStore) or a
//! detailed report of what is wrong with the input, and writes point sets
//! back out in the same interchange format.
//!
//! # Example
//!
//! ```no_run
//! use knox_rust::io::loaders::PointLoader;
//! use std::path::Path;
//!
//! let store = PointLoader::load_store(Path::new("points.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} points", store.len());
//! ```

pub mod loaders;


pub use loaders::{export_points_json, points_to_json_string, PointLoadResult, PointLoader};
