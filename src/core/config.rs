// src/core/config.rs

use crate::core::common::KdSearchError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Search configuration.
///
/// Read from a TOML file (every key optional) and overridden by command-line
/// flags. `dimension` replaces a process-wide "current dimension": it is
/// passed explicitly to every build and checked on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Expected embedding dimension. `None` means "take it from the query".
    pub dimension: Option<usize>,
    /// Number of neighbors to return.
    pub k: usize,
    /// Approximation factor for pruning; 0 is exact.
    pub epsilon: f32,
    /// Answer with a brute-force scan instead of the KD-tree.
    pub use_linear_scan: bool,
    /// Print the performance block after the neighbors.
    pub report_performance: bool,
}

/// Builder for `Config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    dimension: Option<usize>,
    k: Option<usize>,
    epsilon: Option<f32>,
    use_linear_scan: Option<bool>,
    report_performance: Option<bool>,
}

impl ConfigBuilder {
    /// Creates a new ConfigBuilder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn use_linear_scan(mut self, enabled: bool) -> Self {
        self.use_linear_scan = Some(enabled);
        self
    }

    pub fn report_performance(mut self, enabled: bool) -> Self {
        self.report_performance = Some(enabled);
        self
    }

    /// Builds the Config instance with validation
    pub fn build(self) -> Result<Config, KdSearchError> {
        let defaults = Config::default();
        let config = Config {
            dimension: self.dimension.or(defaults.dimension),
            k: self.k.unwrap_or(defaults.k),
            epsilon: self.epsilon.unwrap_or(defaults.epsilon),
            use_linear_scan: self.use_linear_scan.unwrap_or(defaults.use_linear_scan),
            report_performance: self.report_performance.unwrap_or(defaults.report_performance),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimension: None,
            k: 5,
            epsilon: 0.0,
            use_linear_scan: false,
            report_performance: true,
        }
    }
}

impl Config {
    /// Creates a new ConfigBuilder for fluent configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), KdSearchError> {
        if self.k == 0 {
            return Err(KdSearchError::Configuration("k must be greater than 0".to_string()));
        }

        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(KdSearchError::Configuration(format!(
                "epsilon must be a finite number >= 0, got {}",
                self.epsilon
            )));
        }

        if self.dimension == Some(0) {
            return Err(KdSearchError::Configuration(
                "dimension must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `KdSearchError::Configuration` if parsing or validation fails,
    /// `KdSearchError::Io` for other read failures.
    pub fn load_from_file(path: &Path) -> Result<Self, KdSearchError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    KdSearchError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("config file '{}' not found, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(KdSearchError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path.
    ///
    /// If `optional_path` is `None`, it returns the default configuration.
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, KdSearchError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
