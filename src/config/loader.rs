//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/codemap/config.toml)
//! 3. Project config (<root>/.codemap/config.toml)
//! 4. Explicit `--config` file, when given
//! 5. Environment variables (CODEMAP_* prefix, `__` between sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{CodemapError, Result};

/// Directory holding project-level settings, relative to the index root
pub const PROJECT_DIR: &str = ".codemap";

const CONFIG_FILE: &str = "config.toml";

/// Where `config init` wrote, and whether an existing file was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub path: PathBuf,
    pub written: bool,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for an index root with the full resolution chain:
    /// defaults → global → project → env vars
    pub fn load(root: &Path) -> Result<Config> {
        Self::load_with(root, None)
    }

    /// Like [`ConfigLoader::load`], with an extra file merged above the
    /// project config.
    pub fn load_with(root: &Path, explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge project config
        let project_path = Self::project_config_path(root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CodemapError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // Merge environment variables (e.g., CODEMAP_MAP__LINE_LIMIT -> map.line_limit)
        figment = figment.merge(Env::prefixed("CODEMAP_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| CodemapError::Config(format!("Configuration error: {}", e)))?;

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CodemapError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/codemap/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("codemap"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get path to project config file
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR).join(CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or pretty JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| CodemapError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the default global config. Existing files are kept unless `force`.
    pub fn init_global(force: bool) -> Result<InitOutcome> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            CodemapError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir.join(CONFIG_FILE), force)
    }

    /// Write the default project config under `root`.
    pub fn init_project(root: &Path, force: bool) -> Result<InitOutcome> {
        Self::write_default(&Self::project_config_path(root), force)
    }

    fn write_default(path: &Path, force: bool) -> Result<InitOutcome> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let written = force || !path.exists();
        if written {
            fs::write(path, Self::default_config())?;
            info!("Created config: {}", path.display());
        } else {
            info!("Config exists: {}", path.display());
        }

        Ok(InitOutcome {
            path: path.to_path_buf(),
            written,
        })
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config content (TOML)
    fn default_config() -> String {
        r#"# codemap configuration
# Project settings in .codemap/config.toml override ~/.config/codemap/config.toml.

version = "1.0"

[map]
# Path prefixes shown as "skipped by default" unless selected with --filter
skip_patterns = []
# Maximum output lines (0 = default of 1000, negative = unlimited)
line_limit = 0

[scan]
ignore_file = ".gitignore"
skip_dirs = ["vendor", "node_modules"]
max_file_size = 2097152
"#
        .to_string()
    }
}
