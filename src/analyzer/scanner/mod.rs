pub mod file_scanner;
pub mod gitignore;
pub mod glob;

pub use file_scanner::{FileScanner, ScannedFile};
pub use gitignore::{IgnoreRule, PathMatcher};
pub use glob::glob_match;
