//! Checks applied to ingested points before they enter the pipeline.

pub mod validator;

pub use validator::{PointValidator, ValidationResult, ValidationStats};
