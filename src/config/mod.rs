//! Run configuration with YAML schema and validation.
//!
//! Mistake-proofing in three layers:
//! - Typed structs with `deny_unknown_fields`
//! - `validator` range checks per field
//! - Semantic checks across fields

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::aco::ColonyParams;
use crate::error::{ParError, ParResult};

/// Top-level configuration for the harness and both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ParallelsConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Matrix multiplication settings.
    #[validate(nested)]
    #[serde(default)]
    pub winograd: WinogradConfig,

    /// Colony settings.
    #[validate(nested)]
    #[serde(default)]
    pub ant_colony: AntColonyConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl Default for ParallelsConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            winograd: WinogradConfig::default(),
            ant_colony: AntColonyConfig::default(),
        }
    }
}

impl ParallelsConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ParResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ParResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ParResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> ParallelsConfigBuilder {
        ParallelsConfigBuilder::default()
    }

    /// Validate constraints the field annotations cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first violated constraint.
    pub fn validate_semantic(&self) -> ParResult<()> {
        if self.schema_version != "1.0" {
            return Err(ParError::config(format!(
                "unsupported schema_version {:?}, expected \"1.0\"",
                self.schema_version
            )));
        }

        let colony = &self.ant_colony;
        if !(colony.deposit.is_finite() && colony.deposit > 0.0) {
            return Err(ParError::config(format!(
                "ant_colony.deposit must be positive, got {}",
                colony.deposit
            )));
        }
        if !(colony.initial_pheromone.is_finite() && colony.initial_pheromone > 0.0) {
            return Err(ParError::config(format!(
                "ant_colony.initial_pheromone must be positive, got {}",
                colony.initial_pheromone
            )));
        }

        Ok(())
    }

    /// Colony constants derived from this configuration.
    #[must_use]
    pub const fn colony_params(&self) -> ColonyParams {
        ColonyParams {
            ants_per_iteration: self.ant_colony.ants_per_iteration,
            decay: self.ant_colony.decay,
            deposit: self.ant_colony.deposit,
            initial_pheromone: self.ant_colony.initial_pheromone,
            seed: self.reproducibility.seed,
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ParallelsConfigBuilder {
    seed: Option<u64>,
    winograd_workers: Option<usize>,
    repeats: Option<usize>,
    iterations: Option<usize>,
    colony_workers: Option<usize>,
    ants: Option<usize>,
}

impl ParallelsConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the data-parallel Winograd worker count.
    #[must_use]
    pub const fn winograd_workers(mut self, workers: usize) -> Self {
        self.winograd_workers = Some(workers);
        self
    }

    /// Set how many times each Winograd strategy is timed.
    #[must_use]
    pub const fn repeats(mut self, repeats: usize) -> Self {
        self.repeats = Some(repeats);
        self
    }

    /// Set colony iterations.
    #[must_use]
    pub const fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the parallel colony worker count.
    #[must_use]
    pub const fn colony_workers(mut self, workers: usize) -> Self {
        self.colony_workers = Some(workers);
        self
    }

    /// Set ants per iteration.
    #[must_use]
    pub const fn ants(mut self, ants: usize) -> Self {
        self.ants = Some(ants);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ParallelsConfig {
        let mut config = ParallelsConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(workers) = self.winograd_workers {
            config.winograd.workers = workers;
        }
        if let Some(repeats) = self.repeats {
            config.winograd.repeats = repeats;
        }
        if let Some(iterations) = self.iterations {
            config.ant_colony.iterations = iterations;
        }
        if let Some(workers) = self.colony_workers {
            config.ant_colony.workers = workers;
        }
        if let Some(ants) = self.ants {
            config.ant_colony.ants_per_iteration = ants;
        }

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Master seed for random matrices and colony streams.
    pub seed: u64,
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Winograd harness settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WinogradConfig {
    /// Workers for the data-parallel strategy.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Timed runs per strategy.
    #[validate(range(min = 1))]
    #[serde(default = "default_repeats")]
    pub repeats: usize,
}

const fn default_workers() -> usize {
    4
}

const fn default_repeats() -> usize {
    1
}

impl Default for WinogradConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            repeats: default_repeats(),
        }
    }
}

/// Colony settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AntColonyConfig {
    /// Iterations per solve.
    #[validate(range(min = 1))]
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Workers for the parallel strategy.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Tours built per iteration.
    #[validate(range(min = 1))]
    #[serde(default = "default_ants")]
    pub ants_per_iteration: usize,
    /// Fraction of the trail kept at each evaporation.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Reinforcement constant `Q`.
    #[serde(default = "default_deposit")]
    pub deposit: f64,
    /// Trail on every edge before the first iteration.
    #[serde(default = "default_initial_pheromone")]
    pub initial_pheromone: f64,
}

const fn default_iterations() -> usize {
    10
}

const fn default_ants() -> usize {
    6000
}

const fn default_decay() -> f64 {
    0.5
}

const fn default_deposit() -> f64 {
    10.0
}

const fn default_initial_pheromone() -> f64 {
    0.2
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            workers: default_workers(),
            ants_per_iteration: default_ants(),
            decay: default_decay(),
            deposit: default_deposit(),
            initial_pheromone: default_initial_pheromone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = ParallelsConfig::default();

        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.reproducibility.seed, 42);
        assert_eq!(config.winograd.workers, 4);
        assert_eq!(config.ant_colony.ants_per_iteration, 6000);
        assert!((config.ant_colony.decay - 0.5).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
        assert!(config.validate_semantic().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ParallelsConfig::builder()
            .seed(7)
            .winograd_workers(8)
            .repeats(3)
            .iterations(2)
            .colony_workers(2)
            .ants(100)
            .build();

        assert_eq!(config.reproducibility.seed, 7);
        assert_eq!(config.winograd.workers, 8);
        assert_eq!(config.winograd.repeats, 3);
        assert_eq!(config.ant_colony.iterations, 2);
        assert_eq!(config.ant_colony.workers, 2);
        assert_eq!(config.ant_colony.ants_per_iteration, 100);
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
schema_version: '1.0'
reproducibility:
  seed: 1234
winograd:
  workers: 6
ant_colony:
  iterations: 3
  ants_per_iteration: 500
";
        let config = ParallelsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.reproducibility.seed, 1234);
        assert_eq!(config.winograd.workers, 6);
        assert_eq!(config.winograd.repeats, 1);
        assert_eq!(config.ant_colony.iterations, 3);
        assert_eq!(config.ant_colony.workers, 4);
    }

    #[test]
    fn test_config_empty_yaml_is_default() {
        let config = ParallelsConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ParallelsConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_field() {
        let err = ParallelsConfig::from_yaml("winograd:\n  threads: 4\n").unwrap_err();
        assert!(matches!(err, ParError::YamlParse(_)));
    }

    #[test]
    fn test_config_rejects_zero_workers() {
        let err = ParallelsConfig::from_yaml("winograd:\n  workers: 0\n").unwrap_err();
        assert!(matches!(err, ParError::Validation(_)));
    }

    #[test]
    fn test_config_rejects_decay_out_of_range() {
        let err = ParallelsConfig::from_yaml("ant_colony:\n  decay: 1.5\n").unwrap_err();
        assert!(matches!(err, ParError::Validation(_)));
    }

    #[test]
    fn test_config_semantic_deposit() {
        let err = ParallelsConfig::from_yaml("ant_colony:\n  deposit: 0.0\n").unwrap_err();
        assert!(matches!(err, ParError::Config { .. }));
    }

    #[test]
    fn test_config_more_workers_than_ants() {
        // Surplus workers get empty batches.
        let yaml = "ant_colony:\n  workers: 8\n  ants_per_iteration: 4\n";
        let config = ParallelsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.ant_colony.workers, 8);
        assert_eq!(config.colony_params().ants_per_iteration, 4);
    }

    #[test]
    fn test_config_semantic_schema_version() {
        let err = ParallelsConfig::from_yaml("schema_version: '2.0'\n").unwrap_err();
        assert!(matches!(err, ParError::Config { .. }));
    }

    #[test]
    fn test_colony_params() {
        let config = ParallelsConfig::builder().seed(99).ants(12).build();
        let params = config.colony_params();
        assert_eq!(params.seed, 99);
        assert_eq!(params.ants_per_iteration, 12);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reproducibility:\n  seed: 5\nant_colony:\n  iterations: 4").unwrap();
        let config = ParallelsConfig::load(file.path()).unwrap();
        assert_eq!(config.reproducibility.seed, 5);
        assert_eq!(config.ant_colony.iterations, 4);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = ParallelsConfig::load("/nonexistent/parallels.yaml").unwrap_err();
        assert!(matches!(err, ParError::Io(_)));
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = ParallelsConfig::builder().seed(3).iterations(7).build();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ParallelsConfig::from_yaml(&yaml).unwrap(), config);
    }
}
