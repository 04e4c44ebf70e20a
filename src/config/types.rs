//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/codemap/) and project (.codemap/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{map, scan};
use crate::types::{CodemapError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Map rendering settings
    pub map: MapConfig,

    /// Directory walk settings
    pub scan: ScanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            map: MapConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CodemapError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.scan.ignore_file.trim().is_empty() {
            return Err(CodemapError::Config(
                "scan.ignore_file must not be empty".to_string(),
            ));
        }

        if self.scan.ignore_file.contains(['/', '\\']) {
            return Err(CodemapError::Config(format!(
                "scan.ignore_file must be a file name, got {:?}",
                self.scan.ignore_file
            )));
        }

        if self.scan.max_file_size == 0 {
            return Err(CodemapError::Config(
                "scan.max_file_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Map Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Path prefixes listed as "skipped by default" unless a filter selects them
    pub skip_patterns: Vec<String>,

    /// Maximum output lines: 0 uses the built-in default, negative disables the limit
    pub line_limit: i64,
}

impl MapConfig {
    pub fn budget(&self) -> LineBudget {
        LineBudget::from_limit(self.line_limit)
    }
}

/// Output line budget for one map rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBudget {
    Unlimited,
    Lines(usize),
}

impl Default for LineBudget {
    fn default() -> Self {
        Self::Lines(map::DEFAULT_LINE_LIMIT)
    }
}

impl LineBudget {
    /// 0 selects the default limit; negative values mean no limit.
    pub fn from_limit(limit: i64) -> Self {
        match limit {
            0 => Self::default(),
            n if n < 0 => Self::Unlimited,
            n => Self::Lines(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::Lines(n) => Some(*n),
        }
    }

    pub fn allows(&self, lines: usize) -> bool {
        self.limit().is_none_or(|limit| lines <= limit)
    }
}

impl std::fmt::Display for LineBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Lines(n) => write!(f, "{} lines", n),
        }
    }
}

/// Immutable per-call options for planning and rendering a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapOptions {
    /// Path prefixes rendered as a skip notice instead of symbols
    pub skip_patterns: Vec<String>,
    /// When set, only matching files are shown and skip patterns are ignored
    pub filter: Option<String>,
    pub budget: LineBudget,
}

impl MapOptions {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            skip_patterns: config.skip_patterns.clone(),
            filter: None,
            budget: config.budget(),
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn with_budget(mut self, budget: LineBudget) -> Self {
        self.budget = budget;
        self
    }
}

// =============================================================================
// Scan Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Name of the per-directory ignore file
    pub ignore_file: String,

    /// Directory names never entered
    pub skip_dirs: Vec<String>,

    /// Files above this size (bytes) are listed without symbols
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_file: scan::IGNORE_FILE.to_string(),
            skip_dirs: scan::DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            max_file_size: scan::DEFAULT_MAX_FILE_SIZE,
        }
    }
}
