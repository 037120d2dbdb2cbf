//! Core domain models for space-time clustering.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: dated point events, the point store that owns them for a run, match
//! counts, and the final Knox statistic.

pub mod domain;

pub use domain::{ClusterStatistic, Location, MatchCounts, Point, PointStore};
