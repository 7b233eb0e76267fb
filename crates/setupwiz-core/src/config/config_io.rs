//! Configuration loading, validation, and path resolution.
//!
//! Focuses on I/O and filesystem-related helpers for config management.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::texts::{WizardSettings, WizardTexts};

use super::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFailed(String),
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to read text file {path}: {reason}")]
    TextFailed { path: String, reason: String },
    #[error("missing $HOME, unable to resolve config directory")]
    MissingHome,
}

impl Config {
    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|err| ConfigError::ReadFailed(err.to_string()))?;
        let config: Config =
            toml::from_str(&contents).map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load configuration from the default XDG config location, if present.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Rejects values the installer cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let product = &self.product;
        if product.name.trim().is_empty() {
            return Err(ConfigError::Invalid("product.name is empty".to_string()));
        }
        if product.key.trim().is_empty() {
            return Err(ConfigError::Invalid("product.key is empty".to_string()));
        }
        if product.process_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "product.process_name is empty".to_string(),
            ));
        }
        if product.process_name.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "product.process_name must be a bare name, got {}",
                product.process_name
            )));
        }
        Url::parse(&product.help_url).map_err(|err| {
            ConfigError::Invalid(format!("product.help_url {}: {}", product.help_url, err))
        })?;
        if product.binaries.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "product.binaries contains an empty name".to_string(),
            ));
        }
        if let Some(prereq) = self
            .prerequisites
            .iter()
            .find(|prereq| prereq.program.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "prerequisite {:?} has no program",
                prereq.name
            )));
        }
        Ok(())
    }

    /// Builds the wizard settings, reading text overrides relative to `base`
    /// and falling back to the supplied embedded texts.
    pub fn wizard_settings(
        &self,
        base: &Path,
        default_intro: &str,
        default_license: &str,
    ) -> Result<WizardSettings, ConfigError> {
        let intro = load_text(base, self.texts.intro.as_deref())?
            .unwrap_or_else(|| default_intro.to_string());
        let license = load_text(base, self.texts.license.as_deref())?
            .unwrap_or_else(|| default_license.to_string());
        Ok(WizardSettings {
            product_name: self.product.name.clone(),
            process_name: self.product.process_name.clone(),
            texts: WizardTexts::for_product(&self.product.name, intro, license),
        })
    }

    /// Return the default config directory based on XDG or $HOME.
    pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Directory for the installer log.
    pub fn default_state_dir() -> Result<PathBuf, ConfigError> {
        xdg_dir("XDG_STATE_HOME", &[".local", "state"])
    }

    /// Directory holding the install-locations record.
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }

    pub fn resolve_path(base: &Path, value: &str) -> PathBuf {
        let path = PathBuf::from(value);
        if path.is_absolute() {
            path
        } else {
            base.join(path)
        }
    }
}

fn xdg_dir(var: &str, fallback: &[&str]) -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = env::var(var) {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("setupwiz"));
        }
    }
    let home = env::var("HOME").map_err(|_| ConfigError::MissingHome)?;
    let mut path = PathBuf::from(home);
    path.extend(fallback);
    Ok(path.join("setupwiz"))
}

fn load_text(base: &Path, value: Option<&str>) -> Result<Option<String>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let path = Config::resolve_path(base, value);
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|err| ConfigError::TextFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
}
