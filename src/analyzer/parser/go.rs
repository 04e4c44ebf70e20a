use super::traits::{SyntaxParser, field_text, preceding_doc, signature_text};
use super::{Language, ParseResult, Parser, Range, Symbol, SymbolKind, get_node_text};
use crate::types::Result;

pub struct GoParser {
    syntax: SyntaxParser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            syntax: SyntaxParser::new(tree_sitter_go::LANGUAGE, "Go")?,
        })
    }
}

impl Parser for GoParser {
    fn parse(&self, path: &str, content: &str) -> Result<ParseResult> {
        let tree = self.syntax.parse(path, content)?;
        let source = content.as_bytes();
        let root = tree.root_node();

        let mut result = ParseResult::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "import_declaration" => collect_imports(child, source, &mut result.imports),
                "function_declaration" => {
                    push_named(child, SymbolKind::Function, source, &mut result.symbols)
                }
                "method_declaration" => {
                    push_named(child, SymbolKind::Method, source, &mut result.symbols)
                }
                "type_declaration" => extract_types(child, source, &mut result.symbols),
                "const_declaration" => {
                    extract_specs(child, "const", SymbolKind::Const, source, &mut result.symbols)
                }
                "var_declaration" => {
                    extract_specs(child, "var", SymbolKind::Var, source, &mut result.symbols)
                }
                _ => {}
            }
        }

        Ok(result)
    }

    fn language(&self) -> Language {
        Language::Go
    }
}

fn collect_imports(node: tree_sitter::Node, source: &[u8], imports: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = field_text(child, "path", source) {
                    imports.push(path.trim_matches(['"', '`']).to_string());
                }
            }
            "import_spec_list" => collect_imports(child, source, imports),
            _ => {}
        }
    }
}

fn push_named(node: tree_sitter::Node, kind: SymbolKind, source: &[u8], out: &mut Vec<Symbol>) {
    if let Some(name) = field_text(node, "name", source) {
        out.push(
            Symbol::new(name, kind, Range::of_node(node), signature_text(node, source))
                .with_doc(preceding_doc(node, source)),
        );
    }
}

/// One symbol per `type_spec`; grouped `type ( ... )` blocks share the
/// declaration's doc comment.
fn extract_types(node: tree_sitter::Node, source: &[u8], out: &mut Vec<Symbol>) {
    let doc = preceding_doc(node, source);
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if !matches!(spec.kind(), "type_spec" | "type_alias") {
            continue;
        }
        let Some(name) = field_text(spec, "name", source) else {
            continue;
        };
        let kind = match spec.child_by_field_name("type").map(|t| t.kind()) {
            Some("struct_type") => SymbolKind::Struct,
            Some("interface_type") => SymbolKind::Interface,
            _ => SymbolKind::Type,
        };
        let signature = format!("type {}", first_line(spec, source));
        let doc = preceding_doc(spec, source).or_else(|| doc.clone());
        out.push(Symbol::new(name, kind, Range::of_node(spec), signature).with_doc(doc));
    }
}

fn extract_specs(
    node: tree_sitter::Node,
    keyword: &str,
    kind: SymbolKind,
    source: &[u8],
    out: &mut Vec<Symbol>,
) {
    let doc = preceding_doc(node, source);
    let mut specs = Vec::new();
    collect_specs(node, &mut specs);

    for spec in specs {
        let signature = format!("{} {}", keyword, spec_head(spec, source));
        let mut cursor = spec.walk();
        let names: Vec<String> = spec
            .children_by_field_name("name", &mut cursor)
            .map(|n| get_node_text(n, source).to_string())
            .filter(|n| !n.is_empty() && n != "_")
            .collect();
        let spec_doc = preceding_doc(spec, source).or_else(|| doc.clone());
        for name in names {
            out.push(
                Symbol::new(name, kind, Range::of_node(spec), signature.clone())
                    .with_doc(spec_doc.clone()),
            );
        }
    }
}

fn collect_specs<'t>(node: tree_sitter::Node<'t>, out: &mut Vec<tree_sitter::Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "const_spec" | "var_spec" => out.push(child),
            "var_spec_list" => collect_specs(child, out),
            _ => {}
        }
    }
}

/// `Limit int = 10` becomes `Limit int`.
fn spec_head(spec: tree_sitter::Node, source: &[u8]) -> String {
    let text = match spec.child_by_field_name("value") {
        Some(value) => String::from_utf8_lossy(&source[spec.start_byte()..value.start_byte()])
            .into_owned(),
        None => first_line(spec, source),
    };
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('=').trim_end().to_string()
}

fn first_line(node: tree_sitter::Node, source: &[u8]) -> String {
    let line = get_node_text(node, source).lines().next().unwrap_or_default();
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('{')
        .trim_end()
        .to_string()
}
