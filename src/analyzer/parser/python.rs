use super::traits::{SyntaxParser, field_text, first_comment_line, preceding_doc, signature_text};
use super::{Language, ParseResult, Parser, Range, Symbol, SymbolKind, get_node_text};
use crate::types::Result;

pub struct PythonParser {
    syntax: SyntaxParser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            syntax: SyntaxParser::new(tree_sitter_python::LANGUAGE, "Python")?,
        })
    }
}

impl Parser for PythonParser {
    fn parse(&self, path: &str, content: &str) -> Result<ParseResult> {
        let tree = self.syntax.parse(path, content)?;
        let source = content.as_bytes();
        let root = tree.root_node();

        let mut result = ParseResult::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "import_statement" => {
                    let mut names = child.walk();
                    for name in child.children_by_field_name("name", &mut names) {
                        let module = match name.kind() {
                            "aliased_import" => field_text(name, "name", source),
                            _ => Some(get_node_text(name, source)),
                        };
                        if let Some(module) = module {
                            result.imports.push(module.to_string());
                        }
                    }
                }
                "import_from_statement" => {
                    if let Some(module) = field_text(child, "module_name", source) {
                        result.imports.push(module.to_string());
                    }
                }
                "function_definition" | "class_definition" | "decorated_definition" => {
                    if let Some(sym) = extract_definition(child, source) {
                        result.symbols.push(sym);
                    }
                }
                "expression_statement" => extract_assignment(child, source, &mut result.symbols),
                _ => {}
            }
        }

        Ok(result)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

/// Function or class, with decorators folded into the signature
/// (`@dataclass class Point`). The range covers the decorators.
fn extract_definition(node: tree_sitter::Node, source: &[u8]) -> Option<Symbol> {
    let (definition, decorators) = if node.kind() == "decorated_definition" {
        let definition = node.child_by_field_name("definition")?;
        let mut cursor = node.walk();
        let decorators: Vec<String> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "decorator")
            .map(|d| get_node_text(d, source).trim().to_string())
            .collect();
        (definition, decorators)
    } else {
        (node, Vec::new())
    };

    let kind = match definition.kind() {
        "function_definition" => SymbolKind::Function,
        "class_definition" => SymbolKind::Class,
        _ => return None,
    };
    let name = field_text(definition, "name", source)?;

    let mut signature = signature_text(definition, source);
    if !decorators.is_empty() {
        signature = format!("{} {}", decorators.join(" "), signature);
    }

    let doc = docstring(definition, source).or_else(|| preceding_doc(node, source));
    Some(Symbol::new(name, kind, Range::of_node(node), signature).with_doc(doc))
}

/// First line of the docstring, if the body opens with one.
fn docstring(definition: tree_sitter::Node, source: &[u8]) -> Option<String> {
    let body = definition.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0).filter(|n| n.kind() == "string")?;
    let text = get_node_text(string, source)
        .trim_start_matches(['r', 'R', 'u', 'U', 'b', 'B', 'f', 'F'])
        .trim_matches(['"', '\'']);
    first_comment_line(text)
}

/// Public module-level names bound by a simple assignment.
fn extract_assignment(node: tree_sitter::Node, source: &[u8], out: &mut Vec<Symbol>) {
    let Some(assignment) = node.named_child(0).filter(|n| n.kind() == "assignment") else {
        return;
    };
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" {
        return;
    }
    let name = get_node_text(left, source);
    if name.is_empty() || name.starts_with('_') {
        return;
    }

    let signature = match field_text(assignment, "type", source) {
        Some(ty) => format!("{}: {}", name, ty),
        None => name.to_string(),
    };
    out.push(
        Symbol::new(name, SymbolKind::Var, Range::of_node(node), signature)
            .with_doc(preceding_doc(node, source)),
    );
}
