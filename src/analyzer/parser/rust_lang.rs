use super::traits::{SyntaxParser, field_text, preceding_doc, signature_text};
use super::{Language, ParseResult, Parser, Range, Symbol, SymbolKind, get_node_text};
use crate::types::Result;

pub struct RustParser {
    syntax: SyntaxParser,
}

impl RustParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            syntax: SyntaxParser::new(tree_sitter_rust::LANGUAGE, "Rust")?,
        })
    }
}

impl Parser for RustParser {
    fn parse(&self, path: &str, content: &str) -> Result<ParseResult> {
        let tree = self.syntax.parse(path, content)?;
        let source = content.as_bytes();
        let root = tree.root_node();

        let mut result = ParseResult::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "use_declaration" => {
                    if let Some(arg) = field_text(child, "argument", source) {
                        result.imports.push(arg.to_string());
                    }
                }
                "impl_item" => extract_impl(child, source, &mut result),
                kind => {
                    if let Some(sym_kind) = item_kind(kind)
                        && let Some(sym) = extract_item(child, sym_kind, source)
                    {
                        result.symbols.push(sym);
                    }
                }
            }
        }

        Ok(result)
    }

    fn language(&self) -> Language {
        Language::Rust
    }
}

fn item_kind(kind: &str) -> Option<SymbolKind> {
    match kind {
        "function_item" => Some(SymbolKind::Function),
        "struct_item" => Some(SymbolKind::Struct),
        "enum_item" => Some(SymbolKind::Enum),
        "trait_item" => Some(SymbolKind::Trait),
        "const_item" => Some(SymbolKind::Const),
        "static_item" => Some(SymbolKind::Static),
        "type_item" => Some(SymbolKind::Type),
        "mod_item" => Some(SymbolKind::Module),
        _ => None,
    }
}

fn extract_item(node: tree_sitter::Node, kind: SymbolKind, source: &[u8]) -> Option<Symbol> {
    let name = field_text(node, "name", source)?;
    let signature = match kind {
        // `const X: T = value;` keeps its type but not the value
        SymbolKind::Const | SymbolKind::Static => declaration_head(node, source),
        _ => signature_text(node, source),
    };

    Some(
        Symbol::new(name, kind, Range::of_node(node), signature)
            .with_doc(preceding_doc(node, source)),
    )
}

/// Methods of an impl block, each prefixed with the impl header.
/// An impl without methods (`impl Copy for X {}`) is kept as one symbol.
fn extract_impl(node: tree_sitter::Node, source: &[u8], result: &mut ParseResult) {
    let header = signature_text(node, source);
    let mut methods = Vec::new();

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for item in body.named_children(&mut cursor) {
            if item.kind() != "function_item" {
                continue;
            }
            let Some(name) = field_text(item, "name", source) else {
                continue;
            };
            let signature = format!("{}: {}", header, signature_text(item, source));
            methods.push(
                Symbol::new(name, SymbolKind::Method, Range::of_node(item), signature)
                    .with_doc(preceding_doc(item, source)),
            );
        }
    }

    if methods.is_empty() {
        let name = field_text(node, "type", source).unwrap_or_default();
        result.symbols.push(
            Symbol::new(name, SymbolKind::Impl, Range::of_node(node), header)
                .with_doc(preceding_doc(node, source)),
        );
    } else {
        result.symbols.extend(methods);
    }
}

/// Text before the `value` field of a const/static item.
fn declaration_head(node: tree_sitter::Node, source: &[u8]) -> String {
    let text = match node.child_by_field_name("value") {
        Some(value) => String::from_utf8_lossy(&source[node.start_byte()..value.start_byte()])
            .into_owned(),
        None => get_node_text(node, source).to_string(),
    };
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['=', ';'])
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ParseResult {
        RustParser::new().unwrap().parse("lib.rs", content).unwrap()
    }

    #[test]
    fn test_functions_and_types() {
        let result = parse(
            r#"
use std::collections::HashMap;

/// Adds two numbers.
pub fn add(a: i32, b: i32) -> i32 {
    a + b
}

pub struct Point {
    x: i32,
}

enum Shape { Circle, Square }
"#,
        );

        assert_eq!(result.imports, vec!["std::collections::HashMap"]);
        let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["add", "Point", "Shape"]);

        let add = &result.symbols[0];
        assert_eq!(add.kind, SymbolKind::Function);
        assert_eq!(add.signature, "pub fn add(a: i32, b: i32) -> i32");
        assert_eq!(add.doc.as_deref(), Some("Adds two numbers."));
        assert_eq!(add.line_label(), "[5-7]");

        assert_eq!(result.symbols[1].signature, "pub struct Point");
        assert_eq!(result.symbols[2].kind, SymbolKind::Enum);
    }

    #[test]
    fn test_impl_methods() {
        let result = parse(
            r#"
struct Counter;

impl Counter {
    pub fn incr(&mut self) {}
    fn get(&self) -> u32 { 0 }
}

impl Copy for Counter {}
"#,
        );

        let methods: Vec<&Symbol> = result
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Method)
            .collect();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].signature, "impl Counter: pub fn incr(&mut self)");
        assert_eq!(methods[1].name, "get");

        let marker = result.symbols.last().unwrap();
        assert_eq!(marker.kind, SymbolKind::Impl);
        assert_eq!(marker.signature, "impl Copy for Counter");
    }

    #[test]
    fn test_const_drops_value() {
        let result = parse("pub const LIMIT: usize = 1000;\nstatic NAME: &str = \"x\";\n");
        assert_eq!(result.symbols[0].signature, "pub const LIMIT: usize");
        assert_eq!(result.symbols[0].line_label(), "[1]");
        assert_eq!(result.symbols[1].kind, SymbolKind::Static);
    }

    #[test]
    fn test_doc_skips_attributes() {
        let result = parse("/// A config value.\n#[derive(Debug)]\nstruct Config;\n");
        assert_eq!(result.symbols[0].doc.as_deref(), Some("A config value."));
    }

    #[test]
    fn test_detached_comment_is_not_doc() {
        let result = parse("// header\n\nfn main() {}\n");
        assert!(result.symbols[0].doc.is_none());
    }

    #[test]
    fn test_language() {
        assert_eq!(RustParser::new().unwrap().language(), Language::Rust);
    }
}
