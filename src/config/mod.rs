//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/codemap/config.toml)
//! 3. Project config (.codemap/config.toml under the index root)
//! 4. Environment variables (CODEMAP_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigLoader, InitOutcome, PROJECT_DIR};
pub use types::*;
