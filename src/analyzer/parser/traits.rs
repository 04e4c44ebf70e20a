use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

use crate::types::{CodemapError, Result};

// =============================================================================
// Locations
// =============================================================================

/// 0-based position in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// 0-based range; `end` is the position just past the last character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn lines(start: usize, end: usize) -> Self {
        Self {
            start: Position {
                line: start,
                column: 0,
            },
            end: Position {
                line: end,
                column: 0,
            },
        }
    }

    /// Range covered by a tree-sitter node
    pub fn of_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: Position {
                line: start.row,
                column: start.column,
            },
            end: Position {
                line: end.row,
                column: end.column,
            },
        }
    }
}

// =============================================================================
// Symbols
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Struct,
    Enum,
    Trait,
    Interface,
    Type,
    Const,
    Static,
    Var,
    Module,
    Impl,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Function => "func",
            Self::Method => "method",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Trait => "trait",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Const => "const",
            Self::Static => "static",
            Self::Var => "var",
            Self::Module => "mod",
            Self::Impl => "impl",
        };
        write!(f, "{}", s)
    }
}

/// A named declaration found by a language parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: Range,
    /// One-line rendering used in the map, e.g. `pub fn open(path: &Path)`
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        range: Range,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            signature: signature.into(),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc.filter(|d| !d.is_empty());
        self
    }

    /// 1-based first line
    pub fn start_line(&self) -> usize {
        self.range.start.line + 1
    }

    /// 1-based last line
    pub fn end_line(&self) -> usize {
        self.range.end.line + 1
    }

    /// `[12]` for one-line symbols, `[12-40]` otherwise
    pub fn line_label(&self) -> String {
        if self.start_line() == self.end_line() {
            format!("[{}]", self.start_line())
        } else {
            format!("[{}-{}]", self.start_line(), self.end_line())
        }
    }

    /// Map line for this symbol, without trailing newline.
    pub fn render(&self) -> String {
        match &self.doc {
            Some(doc) => format!("  {} {} // {}", self.signature, self.line_label(), doc),
            None => format!("  {} {}", self.signature, self.line_label()),
        }
    }
}

// =============================================================================
// Parser Contract
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub imports: Vec<String>,
    pub symbols: Vec<Symbol>,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }
}

pub trait Parser: Send + Sync {
    fn parse(&self, path: &str, content: &str) -> Result<ParseResult>;
    fn language(&self) -> super::Language;
}

// =============================================================================
// Tree-sitter Helpers
// =============================================================================

/// Create a tree-sitter parser for the given grammar.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language.into()).map_err(|e| {
        CodemapError::parse("", format!("Failed to set {} language: {}", lang_name, e))
    })?;
    Ok(parser)
}

/// A configured tree-sitter parser kept for the lifetime of a language
/// parser. tree-sitter parsing needs `&mut`, so it sits behind a mutex.
pub struct SyntaxParser {
    inner: Mutex<tree_sitter::Parser>,
    lang_name: &'static str,
}

impl SyntaxParser {
    pub fn new<L: Into<tree_sitter::Language>>(language: L, lang_name: &'static str) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(create_ts_parser(language, lang_name)?),
            lang_name,
        })
    }

    /// Parse `content` into a syntax tree, attributing failures to `path`.
    pub fn parse(&self, path: &str, content: &str) -> Result<tree_sitter::Tree> {
        let mut parser = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        parser.parse(content, None).ok_or_else(|| {
            CodemapError::parse(path, format!("Failed to parse {} file", self.lang_name))
        })
    }
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            e
        );
        ""
    })
}

/// Text of the named field `field`, if present.
pub fn field_text<'a>(node: tree_sitter::Node, field: &str, content: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)
        .map(|n| get_node_text(n, content))
        .filter(|s| !s.is_empty())
}

/// Declaration header: source text before the node's `body` field,
/// whitespace collapsed and the body opener (`{`, `:`, `=`, `;`) removed.
/// Nodes without a body use their first line.
pub fn signature_text(node: tree_sitter::Node, content: &[u8]) -> String {
    let head = match node.child_by_field_name("body") {
        Some(body) => content
            .get(node.start_byte()..body.start_byte())
            .map(String::from_utf8_lossy)
            .unwrap_or_default()
            .into_owned(),
        None => get_node_text(node, content)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let collapsed = head.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['{', ':', '=', ';'])
        .trim_end()
        .to_string()
}

/// First line of the comment block directly above `node`.
///
/// Attributes/decorators between the comments and the node are skipped.
/// A blank line between comment and node breaks the association.
pub fn preceding_doc(node: tree_sitter::Node, content: &[u8]) -> Option<String> {
    let mut expected_row = node.start_position().row;
    let mut current = node.prev_named_sibling();
    let mut top_comment = None;

    while let Some(sibling) = current {
        let kind = sibling.kind();
        if last_row(sibling) + 1 < expected_row {
            break;
        }
        if kind.contains("comment") {
            top_comment = Some(sibling);
        } else if kind != "attribute_item" && kind != "decorator" {
            break;
        }
        expected_row = sibling.start_position().row;
        current = sibling.prev_named_sibling();
    }

    // Walk forward from the top comment to find the first non-empty line.
    let mut comment = top_comment?;
    loop {
        if comment.kind().contains("comment")
            && let Some(line) = first_comment_line(get_node_text(comment, content))
        {
            return Some(line);
        }
        match comment.next_named_sibling() {
            Some(next) if next.id() != node.id() => comment = next,
            _ => return None,
        }
    }
}

/// Last row holding text of `node`; line comments may end at column 0 of
/// the following row.
fn last_row(node: tree_sitter::Node) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}

/// Strip comment markers and return the first line with text.
pub fn first_comment_line(text: &str) -> Option<String> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            let line = line
                .trim_start_matches("/**")
                .trim_start_matches("/*")
                .trim_start_matches("//!")
                .trim_start_matches("///")
                .trim_start_matches("//")
                .trim_start_matches('#')
                .trim_end_matches("*/");
            line.trim_start_matches('*').trim().to_string()
        })
        .find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_parser_reused_across_files() {
        let syntax = SyntaxParser::new(tree_sitter_go::LANGUAGE, "Go").unwrap();
        let first = syntax.parse("a.go", "package a\n\nfunc A() {}\n").unwrap();
        let second = syntax.parse("b.go", "package b\n").unwrap();
        assert_eq!(first.root_node().named_child_count(), 2);
        assert_eq!(second.root_node().named_child_count(), 1);
    }

    #[test]
    fn test_line_label() {
        let one = Symbol::new("x", SymbolKind::Const, Range::lines(4, 4), "const x");
        assert_eq!(one.line_label(), "[5]");
        let many = Symbol::new("f", SymbolKind::Function, Range::lines(0, 9), "fn f()");
        assert_eq!(many.line_label(), "[1-10]");
    }

    #[test]
    fn test_render_with_doc() {
        let sym = Symbol::new("open", SymbolKind::Function, Range::lines(2, 5), "fn open()")
            .with_doc(Some("Opens the store".to_string()));
        assert_eq!(sym.render(), "  fn open() [3-6] // Opens the store");
    }

    #[test]
    fn test_empty_doc_dropped() {
        let sym = Symbol::new("a", SymbolKind::Var, Range::lines(0, 0), "a")
            .with_doc(Some(String::new()));
        assert!(sym.doc.is_none());
        assert_eq!(sym.render(), "  a [1]");
    }

    #[test]
    fn test_first_comment_line() {
        assert_eq!(
            first_comment_line("/// Loads config\n/// more"),
            Some("Loads config".to_string())
        );
        assert_eq!(
            first_comment_line("/**\n * Adds numbers.\n */"),
            Some("Adds numbers.".to_string())
        );
        assert_eq!(first_comment_line("# note"), Some("note".to_string()));
        assert_eq!(first_comment_line("//\n//"), None);
    }

    #[test]
    fn test_symbol_kind_display() {
        assert_eq!(SymbolKind::Function.to_string(), "func");
        assert_eq!(SymbolKind::Module.to_string(), "mod");
    }
}
