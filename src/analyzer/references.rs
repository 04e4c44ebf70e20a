//! Reference Search
//!
//! Syntax-aware usage search: walks the same files the indexer would and
//! reports identifier nodes whose text equals the symbol name. Strings and
//! comments never match.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::parser::{Language, create_ts_parser, grammar};
use super::scanner::FileScanner;
use crate::config::ScanConfig;
use crate::constants::references::{CUT_CONTEXT_CHARS, MAX_CONTEXT_CHARS};
use crate::types::{CodemapError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Root-relative path
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
    /// Trimmed source line holding the reference
    pub context: String,
}

/// Every reference to `symbol` under `root`, in walk order.
pub fn find_references<P: AsRef<Path>>(
    root: P,
    symbol: &str,
    config: &ScanConfig,
) -> Result<Vec<Reference>> {
    if symbol.is_empty() {
        return Err(CodemapError::InvalidInput("symbol name is required".to_string()));
    }

    let scanner = FileScanner::from_config(root, config)?;
    let mut refs = Vec::new();

    for file in scanner.scan()? {
        let content = match fs::read(&file.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Failed to read {}: {}", file.relative, e);
                continue;
            }
        };
        match references_in_source(&content, symbol, file.language) {
            Ok(found) => refs.extend(found.into_iter().map(|mut r| {
                r.file = file.relative.clone();
                r
            })),
            Err(e) if e.is_per_file() => debug!("Skipping {}: {}", file.relative, e),
            Err(e) => return Err(e),
        }
    }

    Ok(refs)
}

/// References within one source text; `file` is left empty.
pub fn references_in_source(
    content: &str,
    symbol: &str,
    language: Language,
) -> Result<Vec<Reference>> {
    let ts_language =
        grammar(language).ok_or_else(|| CodemapError::UnsupportedLanguage(language.to_string()))?;
    let mut parser = create_ts_parser(ts_language, language.as_str())?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| CodemapError::parse("", format!("Failed to parse {} source", language)))?;

    let kinds = language.identifier_kinds();
    let source = content.as_bytes();
    let lines: Vec<&str> = content.split('\n').collect();
    let mut refs = Vec::new();

    // Pre-order walk; sibling order gives source order.
    let mut cursor = tree.walk();
    'walk: loop {
        let node = cursor.node();
        if kinds.contains(&node.kind()) && node.utf8_text(source).is_ok_and(|t| t == symbol) {
            let pos = node.start_position();
            refs.push(Reference {
                file: String::new(),
                line: pos.row + 1,
                column: pos.column + 1,
                context: lines.get(pos.row).map(|l| context_line(l)).unwrap_or_default(),
            });
        }

        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    Ok(refs)
}

fn context_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() > MAX_CONTEXT_CHARS {
        let cut: String = trimmed.chars().take(CUT_CONTEXT_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

/// Group references under `## <file>` headers.
pub fn format_references(symbol: &str, refs: &[Reference]) -> String {
    if refs.is_empty() {
        return format!("No references found for {:?}", symbol);
    }

    let mut out = String::new();
    let _ = writeln!(out, "# References to {:?} ({} found)\n", symbol, refs.len());

    let mut current: Option<&str> = None;
    for r in refs {
        if current != Some(r.file.as_str()) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "## {}", r.file);
            current = Some(&r.file);
        }
        let _ = writeln!(out, "  [{}:{}] {}", r.line, r.column, r.context);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_references_skip_strings_and_comments() {
        let source = "package main\n\n// Helper is documented\nfunc Helper() {}\n\nfunc main() {\n\tHelper()\n\tprintln(\"Helper\")\n}\n";
        let refs = references_in_source(source, "Helper", Language::Go).unwrap();

        let positions: Vec<(usize, usize)> = refs.iter().map(|r| (r.line, r.column)).collect();
        assert_eq!(positions, vec![(4, 6), (7, 2)]);
        assert_eq!(refs[1].context, "Helper()");
    }

    #[test]
    fn test_type_identifiers_match() {
        let source = "struct Config;\nfn load() -> Config { Config }\n";
        let refs = references_in_source(source, "Config", Language::Rust).unwrap();
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_long_context_is_cut() {
        let long = format!("x = [{}]", "1, ".repeat(60));
        let refs = references_in_source(&long, "x", Language::Python).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].context.chars().count(), 100);
        assert!(refs[0].context.ends_with("..."));
    }

    #[test]
    fn test_find_references_across_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("a.py"), "from pkg import run\nrun()\n").unwrap();
        fs::write(dir.path().join("pkg/b.py"), "def run():\n    pass\n").unwrap();
        fs::write(dir.path().join("c.py"), "print('run')\n").unwrap();

        let refs = find_references(dir.path(), "run", &ScanConfig::default()).unwrap();
        let files: Vec<&str> = refs.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["a.py", "a.py", "pkg/b.py"]);

        let text = format_references("run", &refs);
        assert!(text.starts_with("# References to \"run\" (3 found)\n\n## a.py\n"));
        assert!(text.contains("\n\n## pkg/b.py\n  [1:5] def run():\n"));
    }

    #[test]
    fn test_no_references_message() {
        assert_eq!(format_references("Nope", &[]), "No references found for \"Nope\"");
    }
}
