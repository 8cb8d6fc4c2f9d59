//! Engine configuration loaded from TOML.
//!
//! ```toml
//! separator_style_key = "PopupItem.Separator"
//!
//! [navigation]
//! cycle_top_level = true
//! cycle_submenu = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resource key of the default separator style.
pub const DEFAULT_SEPARATOR_STYLE_KEY: &str = "PopupItem.Separator";

/// Menu engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Resource key looked up for separators without an explicit style
    pub separator_style_key: String,
    /// Keyboard navigation behaviour
    pub navigation: NavigationConfig,
}

/// Keyboard navigation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Wrap Left/Right between top-level items
    pub cycle_top_level: bool,
    /// Wrap Up/Down inside a submenu
    pub cycle_submenu: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            separator_style_key: DEFAULT_SEPARATOR_STYLE_KEY.to_string(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cycle_top_level: true,
            cycle_submenu: true,
        }
    }
}

impl MenuConfig {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "menuribbon.toml";

    /// Parse a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or a value is unusable.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config from a file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Save the config to a file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load [`Self::CONFIG_FILE`] from the current directory.
    ///
    /// Falls back to the default config if the file is missing or invalid.
    #[must_use]
    pub fn load_default() -> Self {
        match Self::load_from_file(Path::new(Self::CONFIG_FILE)) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, file = Self::CONFIG_FILE, "ignoring invalid menu config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.separator_style_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "separator_style_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MenuConfig::default();
        assert_eq!(config.separator_style_key, "PopupItem.Separator");
        assert!(config.navigation.cycle_top_level);
        assert!(config.navigation.cycle_submenu);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = MenuConfig::from_toml(
            r#"
            [navigation]
            cycle_submenu = false
            "#,
        )
        .unwrap();
        assert_eq!(config.separator_style_key, DEFAULT_SEPARATOR_STYLE_KEY);
        assert!(config.navigation.cycle_top_level);
        assert!(!config.navigation.cycle_submenu);
    }

    #[test]
    fn test_from_toml_empty() {
        assert_eq!(MenuConfig::from_toml("").unwrap(), MenuConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = MenuConfig::from_toml("separator_style_key = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_toml_rejects_empty_key() {
        let err = MenuConfig::from_toml(r#"separator_style_key = "  ""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MenuConfig {
            separator_style_key: "Ribbon.Separator".to_string(),
            navigation: NavigationConfig {
                cycle_top_level: false,
                cycle_submenu: true,
            },
        };
        let text = config.to_toml().unwrap();
        assert_eq!(MenuConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "menuribbon-config-test-{}.toml",
            std::process::id()
        ));
        let config = MenuConfig::default();
        config.save_to_file(&path).unwrap();
        assert_eq!(MenuConfig::load_from_file(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = MenuConfig::load_from_file(Path::new("/nonexistent/menuribbon.toml"));
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }
}
