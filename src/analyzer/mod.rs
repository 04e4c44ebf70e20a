//! Code Analyzer Module
//!
//! Source-side plumbing for the map:
//! - File walking with ignore-file support
//! - Tree-sitter symbol outlines per language
//! - Directory indexing, definition lookup and reference search

pub mod definition;
pub mod index;
pub mod parser;
pub mod references;
pub mod scanner;

pub use definition::{Definition, find_definition};
pub use index::{FileIndex, index_directory};
pub use references::{Reference, find_references, format_references};
