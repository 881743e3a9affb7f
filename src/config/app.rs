// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::defaults::*;
use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::error::{RekeyError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub layout: Layout,
    pub logging: Logging,
    /// File these settings were read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Names of the directories and files the rekey run works with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    pub keyring_dir: String,
    pub backup_prefix: String,
    /// Without the leading dot.
    pub key_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub filter: String,
}

impl Default for Layout {
    fn default() -> Self {
        default_layout()
    }
}

impl Default for Logging {
    fn default() -> Self {
        default_logging()
    }
}

/// Load settings from, in order: `explicit`, `$REKEY_CONFIG`, `./rekey.toml`.
///
/// An explicitly named file (argument or env var) must exist. The implicit
/// `rekey.toml` is optional and built-in defaults are used when it is absent.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return load_from(Path::new(&path));
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        return load_from(fallback);
    }

    Ok(Settings::default())
}

/// Read and validate a single settings file.
pub fn load_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| settings_error(path, e))?;
    let mut settings: Settings =
        toml::from_str(&content).map_err(|e| settings_error(path, e))?;
    settings
        .layout
        .validate()
        .map_err(|msg| settings_error(path, msg))?;
    settings.source = Some(path.to_path_buf());
    Ok(settings)
}

impl Layout {
    fn validate(&self) -> std::result::Result<(), String> {
        for (field, value) in [
            ("keyring_dir", &self.keyring_dir),
            ("backup_prefix", &self.backup_prefix),
            ("key_extension", &self.key_extension),
        ] {
            if value.is_empty() {
                return Err(format!("layout.{field} must not be empty"));
            }
            if value.contains(['/', '\\']) {
                return Err(format!("layout.{field} must be a bare name, got {value:?}"));
            }
        }
        if self.key_extension.starts_with('.') {
            return Err("layout.key_extension must not start with '.'".into());
        }
        Ok(())
    }
}

fn settings_error(path: &Path, err: impl ToString) -> RekeyError {
    RekeyError::Settings {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_layout() {
        let settings = Settings::default();
        assert_eq!(settings.layout.keyring_dir, "keyring");
        assert_eq!(settings.layout.backup_prefix, "keyring-backup");
        assert_eq!(settings.layout.key_extension, "txt");
        assert_eq!(settings.logging.filter, "info");
        assert!(settings.source.is_none());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let settings: Settings = toml::from_str("[logging]\nfilter = \"debug\"\n").unwrap();
        assert_eq!(settings.logging.filter, "debug");
        assert_eq!(settings.layout, Layout::default());
    }

    #[test]
    fn test_layout_rejects_path_separators() {
        let layout = Layout {
            keyring_dir: "nested/keyring".into(),
            ..Layout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_layout_rejects_dotted_extension() {
        let layout = Layout {
            key_extension: ".txt".into(),
            ..Layout::default()
        };
        assert!(layout.validate().is_err());
    }
}
