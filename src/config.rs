use serde::Deserialize;

use crate::error::ConfigError;
use crate::style::{FontBundle, StyleSpec};

pub const DEFAULT_FAMILY: &str = "Calibri";
pub const DEFAULT_SIZE: u16 = 11;

/// Engine settings shared by every document opened with them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Font family of text without an explicit font bundle.
    pub default_family: String,
    /// Point size (at 100% zoom) of text without an explicit font bundle.
    pub default_size: u16,
    /// Maximum number of formatting undo records; unbounded when absent.
    pub history_limit: Option<usize>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            default_family: DEFAULT_FAMILY.to_string(),
            default_size: DEFAULT_SIZE,
            history_limit: None,
        }
    }
}

impl FormatConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_family.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "default_family",
                reason: "must not be empty".to_string(),
            });
        }
        if self.default_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "history_limit",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }

    /// The ambient default bundle.
    pub fn default_bundle(&self) -> FontBundle {
        FontBundle::plain(self.default_family.clone(), self.default_size)
    }

    /// The ambient default spec: default bundle, no colors.
    pub fn default_spec(&self) -> StyleSpec {
        StyleSpec::from_parts(self.default_bundle(), None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = FormatConfig::from_toml_str("default_size = 12\n").unwrap();
        assert_eq!(config.default_family, "Calibri");
        assert_eq!(config.default_size, 12);
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            FormatConfig::from_toml_str("zoom = 150\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            FormatConfig::from_toml_str("default_size = 0\n"),
            Err(ConfigError::InvalidValue { key: "default_size", .. })
        ));
    }
}
