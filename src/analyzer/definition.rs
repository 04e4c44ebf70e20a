//! Definition Lookup
//!
//! Finds a symbol by name in one file and returns its source lines.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::parser::{Language, Symbol, create_parser};
use crate::types::{CodemapError, Result};

/// A located symbol together with the source lines it spans.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Path as given by the caller
    pub file: String,
    pub symbol: Symbol,
    pub lines: Vec<String>,
}

/// Parse `path` and return the first symbol named `name`.
///
/// Methods are looked up by their bare name, without receiver or impl.
pub fn find_definition<P: AsRef<Path>>(path: P, name: &str) -> Result<Definition> {
    let path = path.as_ref();
    let display = path.to_string_lossy().into_owned();

    if name.is_empty() {
        return Err(CodemapError::InvalidInput("symbol name is required".to_string()));
    }
    if !path.is_file() {
        return Err(CodemapError::FileNotFound(path.to_path_buf()));
    }

    let language = Language::from_path(path);
    if !language.is_known() {
        return Err(CodemapError::UnsupportedLanguage(display));
    }

    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let parsed = create_parser(language)?.parse(&display, &content)?;

    let symbol = parsed
        .symbols
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CodemapError::SymbolNotFound {
            symbol: name.to_string(),
            path: display.clone(),
        })?;

    let all: Vec<&str> = content.split('\n').collect();
    let end = symbol.range.end.line.min(all.len().saturating_sub(1));
    let start = symbol.range.start.line.min(end);
    let lines = all[start..=end]
        .iter()
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect();

    Ok(Definition {
        file: display,
        symbol,
        lines,
    })
}

impl Definition {
    /// Header, optional doc line, then the numbered source in a fenced block.
    pub fn render(&self) -> String {
        let start = self.symbol.start_line();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "# {} in {} [{}-{}]\n",
            self.symbol.signature,
            self.file,
            start,
            self.symbol.end_line()
        );
        if let Some(doc) = &self.symbol.doc {
            let _ = writeln!(out, "// {}\n", doc);
        }

        out.push_str("```\n");
        for (i, line) in self.lines.iter().enumerate() {
            let _ = writeln!(out, "{:>4} | {}", start + i, line);
        }
        out.push_str("```\n");
        out
    }
}
