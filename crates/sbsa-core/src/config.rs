//! # Configuration System
//!
//! YAML configuration for the SBSA tools:
//!
//! - Hypercube shape (`dimensions`, `bounds`)
//! - Quantization (`quantization_step`, `rounding`)
//! - Wave superposition (`wave_params`, `spatial_phase`)
//! - Frame sampling and logging settings
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `SBSA_CONFIG` environment variable
//! 2. `./sbsa.yaml` (current directory)
//! 3. `~/.config/sbsa/config.yaml` (user config)
//! 4. `/etc/sbsa/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! dimensions: 4
//! bounds: [40000, 40000, 10000, 1000]
//! quantization_step: [0.5, 0.5, 1.0, 1.0]
//! rounding: half_even
//! spatial_phase: radial
//! wave_params:
//!   - frequency: 1.0
//!     amplitude: 1.0
//!     phase: 0.0
//!   - frequency: 2.5
//!     amplitude: 0.25
//!     phase: 1.57
//!     wavenumber: 3.0
//!
//! sampling:
//!   parallel: true
//!   max_frame_len: 1048576
//!
//! logging:
//!   level: info
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::address::{Hypercube, SBSA_BOUNDS, SBSA_DIMENSIONS};
use crate::field::{SpatialPhase, WaveComponent, WaveField, WaveParams};
use crate::observe::LogConfig;
use crate::quantizer::{Quantizer, RoundingMode};
use crate::types::SbsaResult;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "SBSA_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    ReadError(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Quantization step: one value for every axis or one per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepSpec {
    Uniform(f64),
    PerAxis(Vec<f64>),
}

impl Default for StepSpec {
    fn default() -> Self {
        StepSpec::Uniform(1.0)
    }
}

impl StepSpec {
    /// Expand into one step per axis.
    pub fn per_axis(&self, dimensions: usize) -> Vec<f64> {
        match self {
            StepSpec::Uniform(step) => vec![*step; dimensions],
            StepSpec::PerAxis(steps) => steps.clone(),
        }
    }
}

/// Frame sampling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sample frames on the rayon thread pool
    pub parallel: bool,
    /// Largest frame a single request may produce
    pub max_frame_len: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_frame_len: 1 << 20, // 1M cells
        }
    }
}

/// Complete SBSA configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbsaConfig {
    /// Configuration version
    pub version: String,
    /// Number of hypercube axes
    pub dimensions: usize,
    /// Per-axis bounds
    pub bounds: Vec<u64>,
    pub quantization_step: StepSpec,
    /// Quantizer tie-break rule
    pub rounding: RoundingMode,
    pub spatial_phase: SpatialPhase,
    /// Superposed sinusoidal components
    pub wave_params: Vec<WaveComponent>,
    pub sampling: SamplingConfig,
    pub logging: LogConfig,
}

impl Default for SbsaConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            dimensions: SBSA_DIMENSIONS,
            bounds: SBSA_BOUNDS.to_vec(),
            quantization_step: StepSpec::default(),
            rounding: RoundingMode::default(),
            spatial_phase: SpatialPhase::default(),
            wave_params: vec![WaveComponent::new(1.0, 1.0, 0.0)],
            sampling: SamplingConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl SbsaConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `SBSA_CONFIG` environment variable (must exist if set)
    /// 2. `./sbsa.yaml`
    /// 3. `~/.config/sbsa/config.yaml`
    /// 4. `/etc/sbsa/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points to {}",
                    CONFIG_ENV,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.display().to_string())
            } else {
                ConfigError::ReadError(format!("{}: {}", path.display(), e))
            }
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./sbsa.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "sbsa") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/sbsa/config.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions != self.bounds.len() {
            return Err(ConfigError::ValidationError(format!(
                "dimensions is {} but {} bounds given",
                self.dimensions,
                self.bounds.len()
            )));
        }

        if let StepSpec::PerAxis(ref steps) = self.quantization_step {
            if steps.len() != self.dimensions {
                return Err(ConfigError::ValidationError(format!(
                    "quantization_step has {} entries, expected {}",
                    steps.len(),
                    self.dimensions
                )));
            }
        }

        if self.sampling.max_frame_len == 0 {
            return Err(ConfigError::ValidationError(
                "sampling.max_frame_len must be > 0".to_string(),
            ));
        }

        self.to_quantizer()
            .and_then(|_| self.to_wave_field())
            .map(|_| ())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Build the hypercube described by `bounds`.
    pub fn to_hypercube(&self) -> SbsaResult<Hypercube> {
        Hypercube::new(self.bounds.clone())
    }

    /// Build the per-axis quantizer.
    pub fn to_quantizer(&self) -> SbsaResult<Quantizer> {
        Quantizer::new(
            self.quantization_step.per_axis(self.bounds.len()),
            self.rounding,
        )
    }

    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            components: self.wave_params.clone(),
            spatial: self.spatial_phase,
        }
    }

    /// Build the wave field over the configured hypercube.
    pub fn to_wave_field(&self) -> SbsaResult<WaveField> {
        WaveField::from_params(self.to_hypercube()?, self.wave_params())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            quantization_step: StepSpec::PerAxis(vec![0.5, 0.5, 1.0, 1.0]),
            rounding: RoundingMode::HalfEven,
            wave_params: vec![
                WaveComponent::new(1.0, 1.0, 0.0),
                WaveComponent::new(2.5, 0.25, std::f64::consts::FRAC_PI_2).with_wavenumber(3.0),
            ],
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SBSA_CAPACITY;
    use crate::observe::LogLevel;

    #[test]
    fn test_default_config() {
        let config = SbsaConfig::default();
        assert_eq!(config.dimensions, 4);
        assert_eq!(config.bounds, vec![40_000, 40_000, 10_000, 1_000]);
        assert_eq!(config.rounding, RoundingMode::HalfAwayFromZero);
        assert!(config.sampling.parallel);
        assert!(config.validate().is_ok());
        assert_eq!(config.to_hypercube().unwrap().capacity(), SBSA_CAPACITY);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
dimensions: 4
bounds: [4, 5, 6, 7]
quantization_step: [0.5, 0.5, 1.0, 2.0]
rounding: half_even
spatial_phase: planar
wave_params:
  - frequency: 1.0
    amplitude: 2.0
    phase: 0.5
  - frequency: 3.0
    amplitude: 0.5
    wavenumber: 4.0
sampling:
  parallel: false
logging:
  level: debug
"#;

        let config = SbsaConfig::parse(yaml).unwrap();
        assert_eq!(config.bounds, vec![4, 5, 6, 7]);
        assert_eq!(
            config.quantization_step,
            StepSpec::PerAxis(vec![0.5, 0.5, 1.0, 2.0])
        );
        assert_eq!(config.rounding, RoundingMode::HalfEven);
        assert_eq!(config.spatial_phase, SpatialPhase::Planar);
        assert_eq!(config.wave_params.len(), 2);
        assert_eq!(config.wave_params[1].phase, 0.0);
        assert_eq!(config.wave_params[1].wavenumber, 4.0);
        assert!(!config.sampling.parallel);
        assert_eq!(config.sampling.max_frame_len, 1 << 20);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.validate().is_ok());

        let field = config.to_wave_field().unwrap();
        assert_eq!(field.hypercube().capacity(), 840);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "quantization_step: 0.25\n";
        let config = SbsaConfig::parse(yaml).unwrap();
        assert_eq!(config.quantization_step, StepSpec::Uniform(0.25));
        assert_eq!(config.to_quantizer().unwrap().steps(), &[0.25; 4]);
        // Defaults should be applied
        assert_eq!(config.bounds, SBSA_BOUNDS.to_vec());
        assert_eq!(config.wave_params.len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SbsaConfig::parse("bounds: [1, 2"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            SbsaConfig::parse("rounding: sideways\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = SbsaConfig::default();
        config.dimensions = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = SbsaConfig::default();
        config.quantization_step = StepSpec::PerAxis(vec![1.0, 1.0]);
        assert!(config.validate().is_err());

        let mut config = SbsaConfig::default();
        config.quantization_step = StepSpec::Uniform(0.0);
        assert!(config.validate().is_err());

        let mut config = SbsaConfig::default();
        config.wave_params.push(WaveComponent::new(-1.0, 1.0, 0.0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Negative frequency"));

        let mut config = SbsaConfig::default();
        config.bounds = vec![u64::MAX, 2, 1, 1];
        assert!(config.validate().is_err());

        let mut config = SbsaConfig::default();
        config.sampling.max_frame_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_yaml() {
        let yaml = SbsaConfig::example_yaml();
        assert!(yaml.contains("bounds:"));
        assert!(yaml.contains("wave_params:"));
        assert!(yaml.contains("half_even"));
        let parsed = SbsaConfig::parse(&yaml).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.wave_params.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sbsa.yaml");

        let mut config = SbsaConfig::default();
        config.bounds = vec![8, 8];
        config.dimensions = 2;
        config.spatial_phase = SpatialPhase::Flat;
        config.save(&path).unwrap();

        let loaded = SbsaConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SbsaConfig::load_from(&dir.path().join("absent.yaml")),
            Err(ConfigError::NotFound(_))
        ));
    }

    /// Holds both `SBSA_CONFIG` cases in one test so no other test in this
    /// crate observes the variable while it is set.
    #[test]
    fn test_load_from_env_var() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.yaml");
        std::fs::write(&path, "dimensions: 2\nbounds: [3, 9]\nspatial_phase: planar\n").unwrap();

        let previous = std::env::var_os(CONFIG_ENV);

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = SbsaConfig::load();

        std::env::set_var(CONFIG_ENV, dir.path().join("absent.yaml"));
        let missing = SbsaConfig::load();

        match previous {
            Some(value) => std::env::set_var(CONFIG_ENV, value),
            None => std::env::remove_var(CONFIG_ENV),
        }

        let loaded = loaded.unwrap();
        assert_eq!(loaded.bounds, vec![3, 9]);
        assert_eq!(loaded.dimensions, 2);
        assert_eq!(loaded.spatial_phase, SpatialPhase::Planar);

        match missing {
            Err(ConfigError::NotFound(msg)) => {
                assert!(msg.contains(CONFIG_ENV));
                assert!(msg.contains("absent.yaml"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_config_search_paths() {
        let paths = SbsaConfig::config_search_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("sbsa.yaml"));
        assert!(paths.last().unwrap().starts_with("/etc/sbsa"));
    }
}
