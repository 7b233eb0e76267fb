//! Configuration types and defaults for the installer.
//!
//! Keeps schema definitions in one place for easier auditing.

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub product: ProductConfig,
    pub texts: TextsConfig,
    pub prerequisites: Vec<PrerequisiteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    /// Title drawn on the wizard frame.
    pub window_title: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            window_title: "Lan History Manager Setup".to_string(),
        }
    }
}

/// The product being installed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Display name used in every user-facing text.
    pub name: String,
    /// Key of the product's entry in the install-locations record.
    pub key: String,
    /// Exact process name checked before install and stopped before uninstall.
    pub process_name: String,
    pub help_url: String,
    /// Executables copied from the payload directory into `bin_dir`.
    /// The first one is the program launched from the finish panel.
    pub binaries: Vec<String>,
    /// Payload directory; defaults to the directory holding the installer.
    pub payload_dir: Option<String>,
    /// Install target; defaults to `$HOME/.local/bin`.
    pub bin_dir: Option<String>,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: "Lan History Manager".to_string(),
            key: "lan-history-manager".to_string(),
            process_name: "LanHistory".to_string(),
            help_url: "http://www.JumpForJoySoftware.com/Lan-History-Manager".to_string(),
            binaries: vec!["LanHistory".to_string()],
            payload_dir: None,
            bin_dir: None,
        }
    }
}

/// Optional overrides for the embedded intro and license texts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TextsConfig {
    /// Intro text file, resolves relative to the config dir.
    pub intro: Option<String>,
    /// License text file, resolves relative to the config dir.
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerequisiteConfig {
    pub name: String,
    /// Program that must be on `$PATH` for the prerequisite to count as present.
    pub program: String,
    pub detail: String,
}
