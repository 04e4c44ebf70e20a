//! Config Command
//!
//! Inspect and create codemap configuration.
//!
//! Usage:
//!   codemap config show [--format toml|json]
//!   codemap config path
//!   codemap config init [--global] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{CodemapError, Result};

/// Show the merged effective configuration for `root`
pub fn show(root: &Path, explicit: Option<&Path>, format: &str) -> Result<()> {
    let config = ConfigLoader::load_with(root, explicit)?;
    let rendered = ConfigLoader::render(&config, format == "json")?;
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Show where configuration is read from
pub fn path(root: &Path) -> Result<()> {
    let output = Output::new();
    output.section("Configuration files");

    let global = ConfigLoader::global_config_path();
    match &global {
        Some(path) => output.field("Global", &describe(path)),
        None => output.field("Global", "(no config directory)"),
    }
    output.field("Project", &describe(&ConfigLoader::project_config_path(root)));
    output.field("Env", "CODEMAP_<SECTION>__<KEY>");
    Ok(())
}

fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

/// Write the default configuration file
pub fn init(root: &Path, global: bool, force: bool) -> Result<()> {
    let outcome = if global {
        ConfigLoader::init_global(force)?
    } else {
        if !root.is_dir() {
            return Err(CodemapError::InvalidInput(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        ConfigLoader::init_project(root, force)?
    };

    let scope = if global { "global" } else { "project" };
    let output = Output::new();
    if outcome.written {
        output.success(&format!("Initialized {} configuration", scope));
    } else {
        output.info(&format!(
            "Kept existing {} configuration (use --force to overwrite)",
            scope
        ));
    }
    output.field("Config", &outcome.path.display().to_string());
    Ok(())
}
