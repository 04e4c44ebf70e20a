//! Language Detection
//!
//! Maps file paths to the languages the indexer can outline. Every
//! language-specific fact (extensions, aliases, identifier node kinds)
//! lives in the metadata table below.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Short lowercase identifier
    id: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Alternative names for parsing from string
    aliases: &'static [&'static str],
    /// Tree-sitter node kinds that count as a name reference
    identifier_kinds: &'static [&'static str],
}

macro_rules! lang_meta {
    ($display:literal, $id:literal, [$($ext:literal),*], [$($alias:literal),*], [$($ident:literal),*]) => {
        LanguageMeta {
            display_name: $display,
            id: $id,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            identifier_kinds: &[$($ident),*],
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Rust => lang_meta!("Rust", "rust", ["rs"], ["rust", "rs"],
                ["identifier", "type_identifier", "field_identifier"]),
            Language::Go => lang_meta!("Go", "go", ["go"], ["go", "golang"],
                ["identifier", "type_identifier", "field_identifier", "package_identifier"]),
            Language::Python => lang_meta!("Python", "python", ["py", "pyi"], ["python", "py"],
                ["identifier"]),
            Language::TypeScript => lang_meta!("TypeScript", "typescript", ["ts", "mts", "cts"], ["typescript", "ts"],
                ["identifier", "property_identifier", "type_identifier"]),
            Language::Tsx => lang_meta!("TSX", "tsx", ["tsx"], ["tsx"],
                ["identifier", "property_identifier", "type_identifier"]),
            Language::JavaScript => lang_meta!("JavaScript", "javascript", ["js", "mjs", "cjs"], ["javascript", "js"],
                ["identifier", "property_identifier"]),
            Language::Jsx => lang_meta!("JSX", "jsx", ["jsx"], ["jsx"],
                ["identifier", "property_identifier"]),
            Language::Unknown => lang_meta!("Unknown", "text", [], ["unknown", "text"], []),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages with symbol extraction support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Go,
    Python,
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    #[default]
    Unknown,
}

impl Language {
    /// Display name (human-readable)
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Short lowercase identifier, e.g. `rust`
    pub fn id(&self) -> &'static str {
        self.meta().id
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();

        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.iter().any(|e| *e == ext_lower))
            .unwrap_or(Language::Unknown)
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Check if this is a known language (not Unknown)
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// Tree-sitter node kinds treated as name references
    pub fn identifier_kinds(&self) -> &'static [&'static str] {
        self.meta().identifier_kinds
    }

    /// All supported extensions, without the leading dot
    pub fn supported_extensions() -> Vec<&'static str> {
        Self::all_variants()
            .iter()
            .flat_map(|lang| lang.meta().extensions.iter().copied())
            .collect()
    }

    fn all_variants() -> &'static [Language] {
        &[
            Language::Rust,
            Language::Go,
            Language::Python,
            Language::TypeScript,
            Language::Tsx,
            Language::JavaScript,
            Language::Jsx,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();

        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().aliases.iter().any(|a| *a == s_lower))
            .ok_or_else(|| format!("Unknown language: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("tsx"), Language::Tsx);
        assert_eq!(Language::from_extension("mjs"), Language::JavaScript);
        assert_eq!(Language::from_extension("kt"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/main.rs"), Language::Rust);
        assert_eq!(Language::from_path("cmd/server/main.go"), Language::Go);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
        assert_eq!(Language::from_path("Component.jsx"), Language::Jsx);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("golang".parse::<Language>(), Ok(Language::Go));
        assert_eq!("TS".parse::<Language>(), Ok(Language::TypeScript));
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_identifier_kinds() {
        assert!(Language::Go.identifier_kinds().contains(&"package_identifier"));
        assert_eq!(Language::Python.identifier_kinds(), &["identifier"]);
        assert!(Language::Unknown.identifier_kinds().is_empty());
    }

    #[test]
    fn test_supported_extensions() {
        let exts = Language::supported_extensions();
        assert!(exts.contains(&"go"));
        assert!(exts.contains(&"pyi"));
        assert!(!exts.contains(&"md"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Language::TypeScript).unwrap();
        assert_eq!(json, "\"typescript\"");
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::TypeScript);
    }
}
