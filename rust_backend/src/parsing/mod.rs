//! Parsers for point event interchange formats.
//!
//! # Parsers
//!
//! - [`json_parser`]: Parse indexed point JSON (`[[id, date, [x, y]], ...]`)
//!
//! # Example
//!
//! ```no_run
//! use knox_rust::parsing::json_parser::parse_points_json;
//! use std::path::Path;
//!
//! let points = parse_points_json(Path::new("points.json"))
//!     .expect("Failed to parse points");
//! ```

pub mod json_parser;


pub use json_parser::{parse_date, parse_points_json, parse_points_json_str};
