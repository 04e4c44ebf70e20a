//! Language Parser Module
//!
//! Tree-sitter based symbol outlines for the supported languages. Every
//! parser implements the same small contract ([`Parser`]) and yields
//! [`Symbol`] values; nothing downstream inspects language semantics.
//!
//! ```rust,ignore
//! use codemap::analyzer::parser::{Language, create_parser};
//!
//! let parser = create_parser(Language::Rust)?;
//! let result = parser.parse("main.rs", content)?;
//! ```

pub mod go;
pub mod language;
pub mod python;
pub mod rust_lang;
pub mod traits;
pub mod typescript;

pub use go::GoParser;
pub use language::Language;
pub use python::PythonParser;
pub use rust_lang::RustParser;
pub use traits::{
    ParseResult, Parser, Position, Range, Symbol, SymbolKind, SyntaxParser, create_ts_parser,
    get_node_text,
};
pub use typescript::TypeScriptParser;

use crate::types::{CodemapError, Result};

/// Tree-sitter grammar used for a language, if it has one.
pub fn grammar(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
        Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        Language::TypeScript | Language::Tsx | Language::JavaScript | Language::Jsx => {
            Some(typescript::grammar(language))
        }
        Language::Unknown => None,
    }
}

/// Create a parser for the given language.
///
/// Returns an error if the language has no symbol extraction support.
pub fn create_parser(language: Language) -> Result<Box<dyn Parser>> {
    match language {
        Language::Rust => Ok(Box::new(RustParser::new()?)),
        Language::Go => Ok(Box::new(GoParser::new()?)),
        Language::Python => Ok(Box::new(PythonParser::new()?)),
        Language::TypeScript | Language::Tsx | Language::JavaScript | Language::Jsx => {
            Ok(Box::new(TypeScriptParser::for_language(language)?))
        }
        Language::Unknown => Err(CodemapError::UnsupportedLanguage(language.to_string())),
    }
}

/// Try to create a parser for a file path.
///
/// Returns None if the extension does not map to a supported language.
pub fn create_parser_for_path(path: &str) -> Option<Box<dyn Parser>> {
    let language = Language::from_path(path);
    if language.is_known() {
        create_parser(language).ok()
    } else {
        None
    }
}
