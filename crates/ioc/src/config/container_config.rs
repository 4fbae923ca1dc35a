use crate::config::validation::{parse_bool, ConfigError};
use serde::Deserialize;
use std::path::Path;

pub const ENV_DETECT_CYCLES: &str = "ELIF_IOC_DETECT_CYCLES";
pub const ENV_MAX_DEPTH: &str = "ELIF_IOC_MAX_DEPTH";
pub const ENV_VALIDATE_ON_BUILD: &str = "ELIF_IOC_VALIDATE_ON_BUILD";

/// Container behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Include the whole-registry cycle check in `Container::validate`;
    /// resolution rejects cycles regardless
    pub detect_cycles: bool,
    /// Upper bound on nested resolutions within one top-level resolve
    pub max_depth: usize,
    /// Run `Container::validate` at the end of `ContainerBuilder::build`
    pub validate_on_build: bool,
}

impl ContainerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 128,
            validate_on_build: false,
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(value) = std::env::var(ENV_DETECT_CYCLES) {
            config.detect_cycles = parse_bool(ENV_DETECT_CYCLES, &value)?;
        }

        if let Ok(value) = std::env::var(ENV_MAX_DEPTH) {
            config.max_depth = value.trim().parse().map_err(|_| {
                ConfigError::invalid_value(ENV_MAX_DEPTH, &value, "a positive integer")
            })?;
        }

        if let Ok(value) = std::env::var(ENV_VALIDATE_ON_BUILD) {
            config.validate_on_build = parse_bool(ENV_VALIDATE_ON_BUILD, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::validation_failed(
                "max_depth must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_validate_on_build(mut self, enabled: bool) -> Self {
        self.validate_on_build = enabled;
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_DETECT_CYCLES);
        std::env::remove_var(ENV_MAX_DEPTH);
        std::env::remove_var(ENV_VALIDATE_ON_BUILD);
    }

    #[test]
    fn test_defaults() {
        let config = ContainerConfig::default();
        assert!(config.detect_cycles);
        assert_eq!(config.max_depth, 128);
        assert!(!config.validate_on_build);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var(ENV_DETECT_CYCLES, "false");
        std::env::set_var(ENV_MAX_DEPTH, "32");
        std::env::set_var(ENV_VALIDATE_ON_BUILD, "yes");

        let config = ContainerConfig::from_env().unwrap();
        assert!(!config.detect_cycles);
        assert_eq!(config.max_depth, 32);
        assert!(config.validate_on_build);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        std::env::set_var(ENV_MAX_DEPTH, "deep");
        assert!(matches!(
            ContainerConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::env::set_var(ENV_MAX_DEPTH, "0");
        assert!(matches!(
            ContainerConfig::from_env(),
            Err(ConfigError::ValidationFailed { .. })
        ));

        clear_env();
    }

    #[test]
    fn test_from_yaml_partial_document() {
        let config = ContainerConfig::from_yaml_str("max_depth: 16\n").unwrap();
        assert_eq!(config.max_depth, 16);
        assert!(config.detect_cycles);
    }

    #[test]
    fn test_from_yaml_file() {
        let path = std::env::temp_dir().join(format!("elif-ioc-config-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "detect_cycles: false\nvalidate_on_build: true").unwrap();

        let config = ContainerConfig::from_yaml_file(&path).unwrap();
        assert!(!config.detect_cycles);
        assert!(config.validate_on_build);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_from_yaml_rejects_zero_depth() {
        assert!(ContainerConfig::from_yaml_str("max_depth: 0").is_err());
    }
}
