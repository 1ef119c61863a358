//! Engine configuration
//!
//! Loaded from TOML at startup. Every field has a default, so an empty or
//! partial file is valid.

use crate::error::{EngineError, EngineResult, ErrorContext};
use crate::gate::ParseOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Economy values used when a template leaves a key out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyDefaults {
    pub use_cost: i32,
    pub create_cost: i32,
    pub destroy_cost: i32,
    /// Pay use costs to the portal owner instead of the server
    pub to_owner: bool,
}

impl Default for EconomyDefaults {
    fn default() -> Self {
        Self {
            use_cost: 0,
            create_cost: 0,
            destroy_cost: 0,
            to_owner: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Folder holding `*.gate` templates
    pub gate_folder: PathBuf,
    /// Folder holding saved portals
    pub portal_folder: PathBuf,
    /// Network used when a portal names none
    pub default_network: String,
    /// Write templates back in canonical form after loading
    pub rewrite_templates: bool,
    /// Accept unmapped template symbols and learn them while matching
    pub lenient_symbols: bool,
    pub economy: EconomyDefaults,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gate_folder: PathBuf::from("gates"),
            portal_folder: PathBuf::from("portals"),
            default_network: "central".to_string(),
            rewrite_templates: true,
            lenient_symbols: false,
            economy: EconomyDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file; a missing file gives the defaults
    pub fn load(path: &Path) -> EngineResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                log::info!("[EngineConfig::load] Loaded {}", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "[EngineConfig::load] {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(err) => Err(EngineError::IoError {
                path: path.display().to_string(),
                error: err.to_string(),
            }),
        }
    }

    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).context("serializing engine config")
    }

    /// Parser switches derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            lenient_symbols: self.lenient_symbols,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.gate_folder.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("EngineConfig: gate_folder cannot be empty"));
        }
        if self.portal_folder.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("EngineConfig: portal_folder cannot be empty"));
        }
        if self.default_network.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "EngineConfig: default_network cannot be empty"
            ));
        }

        for (field, cost) in [
            ("use_cost", self.economy.use_cost),
            ("create_cost", self.economy.create_cost),
            ("destroy_cost", self.economy.destroy_cost),
        ] {
            if cost < 0 {
                return Err(anyhow::anyhow!(
                    "EngineConfig: economy.{} {} cannot be negative",
                    field,
                    cost
                ));
            }
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(anyhow::anyhow!(
                "EngineConfig: unknown log level '{}'",
                self.logging.level
            ));
        }

        log::info!("[EngineConfig] Configuration validated successfully");
        Ok(())
    }
}
