//! Knox test configuration.
//!
//! Thresholds are passed explicitly into the pipeline entry points. They can
//! be built in code or read from a TOML file:
//!
//! ```toml
//! [knox]
//! d_max = 1800.0          # spatial threshold, projection units (meters)
//! t_max = 16              # temporal threshold, days
//! progress_interval = 100 # outer iterations between progress callbacks
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ErrorContext, KnoxError, KnoxResult};

/// Default spatial threshold in distance units.
pub const DEFAULT_D_MAX: f64 = 1800.0;
/// Default temporal threshold in days.
pub const DEFAULT_T_MAX: i64 = 16;
/// Default number of outer iterations between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Where `knox.toml` is looked up, in order.
const DEFAULT_SEARCH_PATHS: [&str; 3] = ["knox.toml", "rust_backend/knox.toml", "../knox.toml"];

/// Thresholds and reporting cadence for one Knox run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnoxConfig {
    /// Maximum distance (inclusive) for two points to be close in space.
    #[serde(default = "default_d_max")]
    pub d_max: f64,
    /// Maximum day difference (inclusive) for two points to be close in time.
    #[serde(default = "default_t_max")]
    pub t_max: i64,
    /// Outer iterations between progress callbacks; 0 disables them.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_d_max() -> f64 {
    DEFAULT_D_MAX
}

fn default_t_max() -> i64 {
    DEFAULT_T_MAX
}

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for KnoxConfig {
    fn default() -> Self {
        Self {
            d_max: DEFAULT_D_MAX,
            t_max: DEFAULT_T_MAX,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// On-disk layout of `knox.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct KnoxConfigFile {
    #[serde(default)]
    knox: Option<KnoxConfig>,
}

impl KnoxConfig {
    pub fn new(d_max: f64, t_max: i64) -> Self {
        Self {
            d_max,
            t_max,
            ..Default::default()
        }
    }

    pub fn with_d_max(mut self, d_max: f64) -> Self {
        self.d_max = d_max;
        self
    }

    pub fn with_t_max(mut self, t_max: i64) -> Self {
        self.t_max = t_max;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Check that both thresholds are usable.
    ///
    /// # Returns
    /// * `Ok(())` if `d_max` is finite and non-negative and `t_max` is non-negative
    /// * `Err(KnoxError::ConfigurationError)` otherwise
    pub fn validate(&self) -> KnoxResult<()> {
        if !self.d_max.is_finite() || self.d_max < 0.0 {
            return Err(KnoxError::configuration_with_context(
                format!("d_max must be a finite non-negative distance, got {}", self.d_max),
                ErrorContext::new("validate_config"),
            ));
        }
        if self.t_max < 0 {
            return Err(KnoxError::configuration_with_context(
                format!("t_max must be a non-negative number of days, got {}", self.t_max),
                ErrorContext::new("validate_config"),
            ));
        }
        Ok(())
    }

    /// Parse configuration from TOML text.
    ///
    /// A missing `[knox]` table, or missing keys inside it, fall back to the
    /// defaults.
    pub fn from_toml_str(content: &str) -> KnoxResult<Self> {
        let file: KnoxConfigFile = toml::from_str(content).map_err(|e| {
            KnoxError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        let config = file.knox.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(KnoxConfig)` if successful
    /// * `Err(KnoxError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> KnoxResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KnoxError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Self::from_toml_str(&content).map_err(|e| e.with_operation("load_config"))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `knox.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> KnoxResult<Self> {
        Self::find_in(Path::new(""))?.ok_or_else(|| {
            KnoxError::configuration("No knox.toml found in standard locations")
        })
    }

    /// Like [`KnoxConfig::from_default_location`], falling back to the
    /// defaults when no `knox.toml` exists. A file that exists but does not
    /// parse or validate is still an error.
    pub fn from_default_location_or_default() -> KnoxResult<Self> {
        Ok(Self::find_in(Path::new(""))?.unwrap_or_default())
    }

    /// Load the first `knox.toml` found in the standard locations relative
    /// to `base`, or `None` if there is none.
    pub fn find_in(base: &Path) -> KnoxResult<Option<Self>> {
        for relative in DEFAULT_SEARCH_PATHS {
            let path = base.join(relative);
            if path.exists() {
                log::debug!("Loading Knox configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }
}
