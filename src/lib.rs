//! codemap - Budgeted Symbol Maps for Source Trees
//!
//! Indexes a directory with tree-sitter, honouring nested ignore files, and
//! renders an outline of every file's declarations that fits a fixed number
//! of output lines.
//!
//! ## Quick Start
//!
//! ```ignore
//! use codemap::{ConfigLoader, MapOptions, build_map, index_directory, render_text};
//!
//! let config = ConfigLoader::load(root)?;
//! let files = index_directory(root, &config.scan)?;
//! let plan = build_map(&files, &MapOptions::from_config(&config.map));
//! print!("{}", render_text(&files, &plan));
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: file walking, ignore rules, tree-sitter outlines, lookups
//! - [`codemap`]: directory cost tree, budget planner, rendering
//! - [`config`]: layered configuration
//! - [`cli`]: command implementations for the binary

pub mod analyzer;
pub mod cli;
pub mod codemap;
pub mod config;
pub mod constants;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, LineBudget, MapConfig, MapOptions, ScanConfig};
pub use types::{CodemapError, Result};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    Definition, FileIndex, Reference, find_definition, find_references, format_references,
    index_directory,
    parser::{Language, ParseResult, Parser, Symbol, SymbolKind},
    scanner::{FileScanner, PathMatcher},
};

// =============================================================================
// Map Re-exports
// =============================================================================

pub use codemap::{EntryStatus, MapPlan, build_map, render_json, render_text};
