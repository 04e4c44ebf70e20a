//! Directory Indexing
//!
//! Turns a source tree into a flat list of [`FileIndex`] records: one per
//! supported file, holding its imports and outline symbols. Individual
//! files never fail the run; only an unreadable root does.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::parser::{Language, ParseResult, Parser, Symbol, create_parser};
use super::scanner::{FileScanner, ScannedFile};
use crate::config::ScanConfig;
use crate::constants::map::FILE_OVERHEAD_LINES;
use crate::types::Result;

/// Index of a single source file
#[derive(Debug, Clone, Serialize)]
pub struct FileIndex {
    /// Root-relative, `/`-separated
    pub path: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub symbols: Vec<Symbol>,
}

impl FileIndex {
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
            imports: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Lines this file occupies in a full map: header, one line per symbol,
    /// trailing blank. Files without symbols are not rendered.
    pub fn rendered_cost(&self) -> usize {
        if self.symbols.is_empty() {
            0
        } else {
            self.symbols.len() + FILE_OVERHEAD_LINES
        }
    }
}

/// Index every supported file under `root`.
pub fn index_directory<P: AsRef<Path>>(root: P, config: &ScanConfig) -> Result<Vec<FileIndex>> {
    let root = root.as_ref();
    let scanner = FileScanner::from_config(root, config)?;
    let files = scanner.scan()?;

    let mut indexer = Indexer::new(config.max_file_size);
    let indexed: Vec<FileIndex> = files.iter().map(|file| indexer.index_file(file)).collect();

    info!(
        "Indexed {} files ({} symbols) under {}",
        indexed.len(),
        indexed.iter().map(|f| f.symbols.len()).sum::<usize>(),
        root.display()
    );

    Ok(indexed)
}

/// Parses scanned files, reusing one parser per language.
struct Indexer {
    max_file_size: u64,
    parsers: HashMap<Language, Option<Box<dyn Parser>>>,
}

impl Indexer {
    fn new(max_file_size: u64) -> Self {
        Self {
            max_file_size,
            parsers: HashMap::new(),
        }
    }

    fn index_file(&mut self, file: &ScannedFile) -> FileIndex {
        let mut index = FileIndex::new(&file.relative, file.language);

        if file.size > self.max_file_size {
            debug!(
                "Skipping symbols for {} ({} bytes exceeds limit)",
                file.relative, file.size
            );
            return index;
        }

        let content = match fs::read(&file.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Failed to read {}: {}", file.relative, e);
                return index;
            }
        };

        if let Some(ParseResult { imports, symbols }) = self.parse(file, &content) {
            index.imports = imports;
            index.symbols = symbols;
        }
        index
    }

    fn parse(&mut self, file: &ScannedFile, content: &str) -> Option<ParseResult> {
        let parser = self
            .parsers
            .entry(file.language)
            .or_insert_with(|| match create_parser(file.language) {
                Ok(parser) => Some(parser),
                Err(e) => {
                    debug!("No parser for {}: {}", file.language, e);
                    None
                }
            })
            .as_ref()?;

        match parser.parse(&file.relative, content) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("Failed to parse {}: {}", file.relative, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CodemapError;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_index_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib.rs", "use std::fmt;\n\npub fn one() {}\npub fn two() {}\n");
        write(dir.path(), "cmd/main.go", "package main\n\nfunc main() {}\n");
        write(dir.path(), "notes.txt", "not code");

        let files = index_directory(dir.path(), &ScanConfig::default()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["cmd/main.go", "src/lib.rs"]);

        let lib = &files[1];
        assert_eq!(lib.language, Language::Rust);
        assert_eq!(lib.imports, vec!["std::fmt"]);
        assert_eq!(lib.symbols.len(), 2);
        assert_eq!(lib.rendered_cost(), 4);
    }

    #[test]
    fn test_rendered_cost_empty_file() {
        assert_eq!(FileIndex::new("a.rs", Language::Rust).rendered_cost(), 0);
    }

    #[test]
    fn test_oversize_file_has_no_symbols() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.py", "def a():\n    pass\n");

        let config = ScanConfig {
            max_file_size: 4,
            ..ScanConfig::default()
        };
        let files = index_directory(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].symbols.is_empty());
    }

    #[test]
    fn test_broken_source_does_not_abort() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.rs", "fn ok() {}\n");
        write(dir.path(), "b.rs", "fn broken( {\n");

        let files = index_directory(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].symbols.len(), 1);
    }

    #[test]
    fn test_ignored_paths_not_indexed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "gen/\n");
        write(dir.path(), "gen/api.go", "package gen\n\nfunc X() {}\n");
        write(dir.path(), "vendor/dep.go", "package dep\n\nfunc Y() {}\n");
        write(dir.path(), "app.go", "package app\n\nfunc Z() {}\n");

        let files = index_directory(dir.path(), &ScanConfig::default()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app.go"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = index_directory(dir.path().join("nope"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, CodemapError::RootUnavailable { .. }));
    }
}
