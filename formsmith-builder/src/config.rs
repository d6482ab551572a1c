//! Builder settings, loadable from TOML.
//!
//! ```toml
//! history_limit = 50
//! name_suffix_len = 6
//! max_columns = 4
//! default_options = ["Yes", "No"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Undo steps kept; the oldest is dropped past this.
    pub history_limit: usize,
    /// Length of the random suffix in generated machine names.
    pub name_suffix_len: usize,
    /// Upper bound offered by the column-count picker.
    pub max_columns: usize,
    /// Options seeded into a freshly dropped select or radio field.
    pub default_options: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            name_suffix_len: 6,
            max_columns: 4,
            default_options: vec!["Option 1".to_string(), "Option 2".to_string()],
        }
    }
}

impl BuilderConfig {
    /// Parses and checks a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        info!("Loaded builder config from {:?}", path);
        Ok(config)
    }

    fn check(&self) -> ConfigResult<()> {
        if self.name_suffix_len == 0 {
            return Err(ConfigError::Invalid("name_suffix_len must be at least 1".into()));
        }
        if self.max_columns == 0 {
            return Err(ConfigError::Invalid("max_columns must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(BuilderConfig::from_toml_str("").unwrap(), BuilderConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = BuilderConfig::from_toml_str("history_limit = 5\ndefault_options = [\"A\"]").unwrap();
        assert_eq!(cfg.history_limit, 5);
        assert_eq!(cfg.default_options, vec!["A"]);
        assert_eq!(cfg.max_columns, 4);
    }

    #[test]
    fn zero_suffix_rejected() {
        assert!(matches!(
            BuilderConfig::from_toml_str("name_suffix_len = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn bad_toml_rejected() {
        assert!(matches!(
            BuilderConfig::from_toml_str("history_limit = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
