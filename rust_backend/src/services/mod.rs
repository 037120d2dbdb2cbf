//! Service layer for the Knox test.
//!
//! Services orchestrate validation, counting, normalization and the moment
//! computation behind the entry points used by the CLI and the Python
//! bindings.

pub mod knox_test;

pub use knox_test::{
    run, run_on_store, run_on_store_with_progress, run_with_config, run_with_progress, KnoxReport,
};
