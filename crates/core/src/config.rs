//! TOML-based configuration for git-mediate.
//!
//! Configuration is optional. It is looked up first in the repository root
//! (`.git-mediate.toml`) and then in the user's config directory
//! (`<config_dir>/git-mediate/config.toml`). Command-line flags override any
//! value set here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::ConfigError;

/// File name looked up in the repository root.
pub const REPO_CONFIG_FILE: &str = ".git-mediate.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MediateConfig {
    /// Resolution and output settings.
    #[serde(default)]
    pub mediate: MediateSection,
}

/// When to color terminal output.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when the terminal supports it.
    #[default]
    Auto,
    Always,
    Never,
}

/// The `[mediate]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MediateSection {
    /// Editor command used with `--editor`. Falls back to the environment.
    #[serde(default)]
    pub editor: Option<String>,

    /// Print a diff of each side of every unresolved conflict.
    #[serde(default)]
    pub dump_diffs: bool,

    /// Color mode for terminal output.
    #[serde(default)]
    pub color: ColorMode,

    /// Add fully resolved files to the git index.
    #[serde(default = "default_true")]
    pub stage_resolved: bool,

    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MediateSection {
    fn default() -> Self {
        Self {
            editor: None,
            dump_diffs: false,
            color: ColorMode::Auto,
            stage_resolved: true,
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".into()
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl MediateConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: MediateConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Load the first config file found, or defaults when there is none.
    pub fn discover(repo_root: Option<&Path>) -> Result<Self, ConfigError> {
        let candidates = repo_root
            .map(|root| root.join(REPO_CONFIG_FILE))
            .into_iter()
            .chain(Self::user_config_path());

        for path in candidates {
            if path.is_file() {
                return Self::load_from_file(path);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Per-user config location, if the platform has a config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("git-mediate").join("config.toml"))
    }

    /// Check semantic constraints that TOML parsing cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let section = &self.mediate;
        if !LOG_LEVELS.contains(&section.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "mediate.log_level".into(),
                detail: format!(
                    "'{}' is not one of {}",
                    section.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if section
            .editor
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "mediate.editor".into(),
                detail: "editor command must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: MediateConfig = toml::from_str(
            r#"
[mediate]
editor = "code --wait"
dump_diffs = true
color = "never"
stage_resolved = false
log_level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.mediate.editor.as_deref(), Some("code --wait"));
        assert!(config.mediate.dump_diffs);
        assert_eq!(config.mediate.color, ColorMode::Never);
        assert!(!config.mediate.stage_resolved);
        assert_eq!(config.mediate.log_level, "debug");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config: MediateConfig = toml::from_str("").unwrap();
        assert_eq!(config, MediateConfig::default());
        assert!(config.mediate.stage_resolved);
        assert!(!config.mediate.dump_diffs);
        assert_eq!(config.mediate.color, ColorMode::Auto);
        assert_eq!(config.mediate.log_level, "warn");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mediate]\ndump_diffs = true\n").unwrap();

        let config = MediateConfig::load_from_file(&path).unwrap();
        assert!(config.mediate.dump_diffs);
    }

    #[test]
    fn test_discover_prefers_repo_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(REPO_CONFIG_FILE),
            "[mediate]\ncolor = \"always\"\n",
        )
        .unwrap();

        let config = MediateConfig::discover(Some(dir.path())).unwrap();
        assert_eq!(config.mediate.color, ColorMode::Always);
    }

    #[test]
    fn test_file_not_found() {
        let result = MediateConfig::load_from_file("/nonexistent/git-mediate.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[mediate]\ncolor = \"sometimes\"\n").unwrap();
        assert!(matches!(
            MediateConfig::load_from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MediateConfig::default();
        config.mediate.log_level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = MediateConfig::default();
        config.mediate.editor = Some("  ".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
