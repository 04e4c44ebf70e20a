use super::traits::{SyntaxParser, field_text, preceding_doc, signature_text};
use super::{Language, ParseResult, Parser, Range, Symbol, SymbolKind, get_node_text};
use crate::types::Result;

/// Parser for TypeScript and JavaScript, including the JSX dialects.
pub struct TypeScriptParser {
    language: Language,
    syntax: SyntaxParser,
}

impl TypeScriptParser {
    pub fn new() -> Result<Self> {
        Self::for_language(Language::TypeScript)
    }

    /// Plain `.ts` uses the TypeScript grammar; TSX, JavaScript and JSX
    /// all parse with the TSX grammar, which accepts JSX syntax.
    pub fn for_language(language: Language) -> Result<Self> {
        Ok(Self {
            language,
            syntax: SyntaxParser::new(grammar(language), language.as_str())?,
        })
    }
}

pub(crate) fn grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        _ => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

impl Parser for TypeScriptParser {
    fn parse(&self, path: &str, content: &str) -> Result<ParseResult> {
        let tree = self.syntax.parse(path, content)?;
        let source = content.as_bytes();
        let root = tree.root_node();

        let mut result = ParseResult::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "import_statement" => {
                    if let Some(module) = field_text(child, "source", source) {
                        result.imports.push(module.trim_matches(['"', '\'', '`']).to_string());
                    }
                }
                "export_statement" => {
                    // `export { a } from "./a"` re-exports count as imports
                    if let Some(module) = field_text(child, "source", source) {
                        result.imports.push(module.trim_matches(['"', '\'', '`']).to_string());
                    }
                    if let Some(decl) = child.child_by_field_name("declaration") {
                        let prefix = if get_node_text(child, source).starts_with("export default") {
                            "export default"
                        } else {
                            "export"
                        };
                        extract_declaration(decl, child, Some(prefix), source, &mut result.symbols);
                    }
                }
                _ => extract_declaration(child, child, None, source, &mut result.symbols),
            }
        }

        Ok(result)
    }

    fn language(&self) -> Language {
        self.language
    }
}

/// `outer` is the node that owns the doc comment and the line range:
/// the export statement when the declaration is exported.
fn extract_declaration(
    decl: tree_sitter::Node,
    outer: tree_sitter::Node,
    prefix: Option<&str>,
    source: &[u8],
    out: &mut Vec<Symbol>,
) {
    let kind = match decl.kind() {
        "function_declaration" | "generator_function_declaration" => SymbolKind::Function,
        "class_declaration" | "abstract_class_declaration" => SymbolKind::Class,
        "interface_declaration" => SymbolKind::Interface,
        "type_alias_declaration" => SymbolKind::Type,
        "enum_declaration" => SymbolKind::Enum,
        "internal_module" | "module" => SymbolKind::Module,
        "lexical_declaration" | "variable_declaration" => {
            extract_variables(decl, outer, prefix, source, out);
            return;
        }
        _ => return,
    };
    let Some(name) = field_text(decl, "name", source) else {
        return;
    };

    let head = match decl.child_by_field_name("value") {
        // `type A<T> = ...` keeps only the left-hand side
        Some(value) if kind == SymbolKind::Type => {
            collapse(&String::from_utf8_lossy(&source[decl.start_byte()..value.start_byte()]))
        }
        _ => signature_text(decl, source),
    };

    out.push(
        Symbol::new(name, kind, Range::of_node(outer), with_prefix(prefix, head))
            .with_doc(preceding_doc(outer, source)),
    );
}

/// One symbol per declarator: `const API_URL: string`, or a function kind
/// when the value is an arrow function or function expression.
fn extract_variables(
    decl: tree_sitter::Node,
    outer: tree_sitter::Node,
    prefix: Option<&str>,
    source: &[u8],
    out: &mut Vec<Symbol>,
) {
    let keyword = get_node_text(decl, source)
        .split_whitespace()
        .next()
        .unwrap_or("const");
    let doc = preceding_doc(outer, source);

    let mut cursor = decl.walk();
    for declarator in decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name_node.kind() != "identifier" {
            continue;
        }
        let name = get_node_text(name_node, source);

        let value_kind = declarator.child_by_field_name("value").map(|v| v.kind());
        let kind = match value_kind {
            Some("arrow_function" | "function_expression" | "function") => SymbolKind::Function,
            _ if keyword == "const" => SymbolKind::Const,
            _ => SymbolKind::Var,
        };

        let mut head = format!("{} {}", keyword, name);
        if let Some(ty) = field_text(declarator, "type", source) {
            head.push_str(ty);
        }
        if kind == SymbolKind::Function
            && let Some(value) = declarator.child_by_field_name("value")
            && let Some(params) = field_text(value, "parameters", source)
        {
            head = format!("{} = {} =>", head, collapse(params));
        }

        out.push(
            Symbol::new(name, kind, Range::of_node(outer), with_prefix(prefix, head))
                .with_doc(doc.clone()),
        );
    }
}

fn with_prefix(prefix: Option<&str>, head: String) -> String {
    match prefix {
        Some(prefix) => format!("{} {}", prefix, head),
        None => head,
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('=')
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(language: Language, content: &str) -> ParseResult {
        TypeScriptParser::for_language(language)
            .unwrap()
            .parse("index.ts", content)
            .unwrap()
    }

    #[test]
    fn test_imports() {
        let result = parse(
            Language::TypeScript,
            "import { a } from './a';\nimport * as b from \"lib-b\";\n",
        );
        assert_eq!(result.imports, vec!["./a", "lib-b"]);
    }

    #[test]
    fn test_exported_function_with_jsdoc() {
        let result = parse(
            Language::TypeScript,
            r#"
/**
 * Sums the values.
 */
export function sum(values: number[]): number {
  return values.reduce((a, b) => a + b, 0);
}
"#,
        );

        let sum = &result.symbols[0];
        assert_eq!(sum.kind, SymbolKind::Function);
        assert_eq!(sum.signature, "export function sum(values: number[]): number");
        assert_eq!(sum.doc.as_deref(), Some("Sums the values."));
        assert_eq!(sum.line_label(), "[5-7]");
    }

    #[test]
    fn test_types_and_interfaces() {
        let result = parse(
            Language::TypeScript,
            "interface User {\n  id: string;\n}\n\ntype Id<T> = string | T;\n\nenum Color { Red }\n\nclass Store {}\n",
        );

        let kinds: Vec<SymbolKind> = result.symbols.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SymbolKind::Interface,
                SymbolKind::Type,
                SymbolKind::Enum,
                SymbolKind::Class
            ]
        );
        assert_eq!(result.symbols[0].signature, "interface User");
        assert_eq!(result.symbols[1].signature, "type Id<T>");
        assert_eq!(result.symbols[3].signature, "class Store");
    }

    #[test]
    fn test_variables() {
        let result = parse(
            Language::TypeScript,
            "export const API_URL: string = 'x';\nlet count = 0;\nconst add = (a: number, b: number) => a + b;\n",
        );

        assert_eq!(result.symbols.len(), 3);
        assert_eq!(result.symbols[0].signature, "export const API_URL: string");
        assert_eq!(result.symbols[0].kind, SymbolKind::Const);
        assert_eq!(result.symbols[1].kind, SymbolKind::Var);
        assert_eq!(result.symbols[2].kind, SymbolKind::Function);
        assert_eq!(
            result.symbols[2].signature,
            "const add = (a: number, b: number) =>"
        );
    }

    #[test]
    fn test_jsx_dialect() {
        let parser = TypeScriptParser::for_language(Language::Jsx).unwrap();
        assert_eq!(parser.language(), Language::Jsx);
        let result = parser
            .parse(
                "App.jsx",
                "export default function App() {\n  return <div>hi</div>;\n}\n",
            )
            .unwrap();
        assert_eq!(result.symbols[0].name, "App");
        assert_eq!(result.symbols[0].signature, "export default function App()");
    }
}
