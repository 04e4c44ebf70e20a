//! Ignore-file Rules
//!
//! Parses `.gitignore`-style files found anywhere under an index root and
//! answers "is this path excluded?" with the usual semantics:
//!
//! - `#` comments and blank lines are dropped
//! - `!pattern` re-includes a path excluded by an earlier rule
//! - `pattern/` only matches directories
//! - `/pattern`, or any pattern with an inner `/`, is anchored to the
//!   directory holding the ignore file; other patterns match at any depth
//! - rules from `sub/.gitignore` only apply to paths under `sub/`
//! - an excluded directory excludes everything below it, and negation
//!   cannot bring those descendants back
//!
//! Paths are always root-relative and `/`-separated.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use ignore::WalkBuilder;
use tracing::debug;

use super::glob::{glob_match, segment_suffixes};
use crate::constants::scan::IGNORE_FILE;
use crate::types::{CodemapError, Result};

// =============================================================================
// Rule
// =============================================================================

/// A single parsed ignore-file line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pattern: String,
    negated: bool,
    dir_only: bool,
    anchored: bool,
    base_dir: String,
}

impl IgnoreRule {
    /// Parse one ignore-file line. Returns `None` for blank lines, comments,
    /// and lines that reduce to an empty pattern.
    pub fn parse(line: &str, base_dir: &str) -> Option<Self> {
        let line = trim_trailing_spaces(line);
        let mut rest: &str = &line;

        if rest.is_empty() || rest.starts_with('#') {
            return None;
        }

        let mut negated = false;
        if let Some(escaped) = rest.strip_prefix('\\') {
            // `\#` and `\!` are literal leading characters
            rest = escaped;
        } else if let Some(stripped) = rest.strip_prefix('!') {
            negated = true;
            rest = stripped;
        }

        let mut dir_only = false;
        if let Some(stripped) = rest.strip_suffix('/') {
            dir_only = true;
            rest = stripped;
        }

        let anchored = if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
            true
        } else {
            rest.contains('/')
        };

        if rest.is_empty() {
            return None;
        }

        Some(Self {
            pattern: rest.to_string(),
            negated,
            dir_only,
            anchored,
            base_dir: base_dir.trim_matches('/').to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// Whether this rule applies to and matches `path`.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        let relative = if self.base_dir.is_empty() {
            path
        } else {
            match path
                .strip_prefix(self.base_dir.as_str())
                .and_then(|r| r.strip_prefix('/'))
            {
                Some(r) => r,
                None => return false,
            }
        };

        if self.anchored {
            glob_match(&self.pattern, relative)
        } else {
            segment_suffixes(relative).any(|s| glob_match(&self.pattern, s))
        }
    }
}

/// Drop trailing spaces unless the last one is escaped with `\`.
fn trim_trailing_spaces(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim_end_matches(' ');
    if trimmed.len() < line.len() && trimmed.ends_with('\\') {
        Cow::Owned(format!("{} ", &trimmed[..trimmed.len() - 1]))
    } else {
        Cow::Borrowed(trimmed)
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// Ordered rule set collected from every ignore file under a root.
///
/// Read-only after construction, so it can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    rules: Vec<IgnoreRule>,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.gitignore` under `root`.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::load_with(root, IGNORE_FILE)
    }

    /// Load every ignore file named `file_name` under `root`, visiting
    /// directories in name order and skipping hidden ones.
    ///
    /// Fails only when `root` itself cannot be read. Unreadable ignore
    /// files are skipped.
    pub fn load_with<P: AsRef<Path>>(root: P, file_name: &str) -> Result<Self> {
        let root = root.as_ref();
        fs::read_dir(root).map_err(|source| CodemapError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut matcher = Self::new();

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                entry.depth() == 0 || !is_dir || !entry.file_name().to_string_lossy().starts_with('.')
            })
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_name() != file_name || !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let base_dir = path
                .parent()
                .and_then(|dir| dir.strip_prefix(root).ok())
                .map(to_slash)
                .unwrap_or_default();

            match fs::read(path) {
                Ok(bytes) => {
                    let before = matcher.rules.len();
                    matcher.add_rules(&String::from_utf8_lossy(&bytes), &base_dir);
                    debug!(
                        "Loaded {} rules from {}",
                        matcher.rules.len() - before,
                        path.display()
                    );
                }
                Err(e) => debug!("Skipping unreadable ignore file {}: {}", path.display(), e),
            }
        }

        Ok(matcher)
    }

    /// Append the rules of one ignore file whose directory is `base_dir`
    /// (empty for the root).
    pub fn add_rules(&mut self, contents: &str, base_dir: &str) {
        self.rules.extend(
            contents
                .lines()
                .filter_map(|line| IgnoreRule::parse(line, base_dir)),
        );
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether `path` is excluded. A path is excluded when any of its
    /// ancestor directories is, or when the last rule matching the path
    /// itself is not a negation.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let path = normalize(path);
        if path.is_empty() {
            return false;
        }

        for (i, _) in path.match_indices('/') {
            if self.evaluate(&path[..i], true) {
                return true;
            }
        }

        self.evaluate(&path, is_dir)
    }

    fn evaluate(&self, path: &str, is_dir: bool) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(path, is_dir))
            .is_some_and(|rule| !rule.negated)
    }
}

fn normalize(path: &str) -> Cow<'_, str> {
    let path: Cow<'_, str> = if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    };

    let trimmed = path.strip_prefix("./").unwrap_or(&path).trim_end_matches('/');
    if trimmed.len() == path.len() {
        path
    } else {
        Cow::Owned(trimmed.to_string())
    }
}

/// Root-relative path rendered with `/` separators.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn matcher(lines: &str) -> PathMatcher {
        let mut m = PathMatcher::new();
        m.add_rules(lines, "");
        m
    }

    #[test]
    fn test_parse_comment_and_blank() {
        assert!(IgnoreRule::parse("", "").is_none());
        assert!(IgnoreRule::parse("   ", "").is_none());
        assert!(IgnoreRule::parse("# comment", "").is_none());
        assert!(IgnoreRule::parse("!", "").is_none());
        assert!(IgnoreRule::parse("/", "").is_none());
    }

    #[test]
    fn test_parse_flags() {
        let rule = IgnoreRule::parse("!build/", "pkg").unwrap();
        assert_eq!(rule.pattern(), "build");
        assert!(rule.is_negated());
        assert!(rule.is_dir_only());
        assert!(!rule.is_anchored());
        assert_eq!(rule.base_dir(), "pkg");

        let rule = IgnoreRule::parse("/root.txt", "").unwrap();
        assert_eq!(rule.pattern(), "root.txt");
        assert!(rule.is_anchored());

        let rule = IgnoreRule::parse("docs/*.md", "").unwrap();
        assert!(rule.is_anchored());
    }

    #[test]
    fn test_parse_trailing_spaces() {
        assert_eq!(IgnoreRule::parse("foo   ", "").unwrap().pattern(), "foo");
        assert_eq!(IgnoreRule::parse("foo\\ ", "").unwrap().pattern(), "foo ");
    }

    #[test]
    fn test_parse_escaped_leading_chars() {
        let rule = IgnoreRule::parse("\\#notes", "").unwrap();
        assert_eq!(rule.pattern(), "#notes");
        let rule = IgnoreRule::parse("\\!bang", "").unwrap();
        assert_eq!(rule.pattern(), "!bang");
        assert!(!rule.is_negated());
    }

    #[test]
    fn test_empty_matcher_ignores_nothing() {
        let m = PathMatcher::new();
        assert!(!m.is_ignored("anything", false));
        assert!(!m.is_ignored("a/b/c", true));
    }

    #[test]
    fn test_dir_only_rule() {
        let m = matcher("foo/\n");
        assert!(m.is_ignored("foo", true));
        assert!(!m.is_ignored("foo", false));
        assert!(m.is_ignored("foo/bar.txt", false));
        assert!(m.is_ignored("src/foo", true));
    }

    #[test]
    fn test_later_rule_wins() {
        let m = matcher("*.log\n!important.log\n");
        assert!(m.is_ignored("debug.log", false));
        assert!(!m.is_ignored("important.log", false));

        let m = matcher("!important.log\n*.log\n");
        assert!(m.is_ignored("important.log", false));
    }

    #[test]
    fn test_negation_cannot_reinclude_under_excluded_dir() {
        let m = matcher("build/\n!build/keep.txt\n");
        assert!(m.is_ignored("build/keep.txt", false));
    }

    #[test]
    fn test_anchored_pattern() {
        let m = matcher("/root.txt\n");
        assert!(m.is_ignored("root.txt", false));
        assert!(!m.is_ignored("sub/root.txt", false));
    }

    #[test]
    fn test_inner_slash_anchors() {
        let m = matcher("docs/*.md\n");
        assert!(m.is_ignored("docs/a.md", false));
        assert!(!m.is_ignored("x/docs/a.md", false));
    }

    #[test]
    fn test_unanchored_matches_any_depth() {
        let m = matcher("*.tmp\n");
        assert!(m.is_ignored("a.tmp", false));
        assert!(m.is_ignored("x/y/z/a.tmp", false));
    }

    #[test]
    fn test_double_star_rule() {
        let m = matcher("**/*.go\n");
        assert!(m.is_ignored("main.go", false));
        assert!(m.is_ignored("src/main.go", false));
        assert!(m.is_ignored("src/pkg/deep/main.go", false));
        assert!(!m.is_ignored("main.py", false));
    }

    #[test]
    fn test_base_dir_scoping() {
        let mut m = PathMatcher::new();
        m.add_rules("/local.txt\n*.tmp\n", "pkg");
        assert!(m.is_ignored("pkg/local.txt", false));
        assert!(!m.is_ignored("pkg/sub/local.txt", false));
        assert!(!m.is_ignored("local.txt", false));
        assert!(m.is_ignored("pkg/sub/a.tmp", false));
        assert!(!m.is_ignored("a.tmp", false));
        assert!(!m.is_ignored("pkgx/a.tmp", false));
    }

    #[test]
    fn test_path_normalization() {
        let m = matcher("build/\n");
        assert!(m.is_ignored("./build/out.bin", false));
        assert!(m.is_ignored("build\\out.bin", false));
        assert!(m.is_ignored("build/", true));
    }

    #[test]
    fn test_is_ignored_idempotent() {
        let m = matcher("*.log\n!keep.log\n");
        for _ in 0..3 {
            assert!(m.is_ignored("a.log", false));
            assert!(!m.is_ignored("keep.log", false));
        }
    }

    #[test]
    fn test_load_scenario() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".gitignore"),
            "build/\n*.log\n!important.log\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/.gitignore"), "*.tmp\n").unwrap();

        let m = PathMatcher::load(dir.path()).unwrap();
        assert_eq!(m.len(), 4);
        assert!(m.is_ignored("build", true));
        assert!(m.is_ignored("build/out.bin", false));
        assert!(m.is_ignored("debug.log", false));
        assert!(!m.is_ignored("important.log", false));
        assert!(m.is_ignored("pkg/cache.tmp", false));
        assert!(!m.is_ignored("cache.tmp", false));
    }

    #[test]
    fn test_load_orders_files_by_walk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.gen\n").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/.gitignore"), "!keep.gen\n").unwrap();

        let m = PathMatcher::load(dir.path()).unwrap();
        let bases: Vec<&str> = m.rules().iter().map(|r| r.base_dir()).collect();
        assert_eq!(bases, vec!["", "a"]);
        assert!(!m.is_ignored("a/keep.gen", false));
        assert!(m.is_ignored("keep.gen", false));
    }

    #[test]
    fn test_load_skips_hidden_dirs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join(".hidden/.gitignore"), "*\n").unwrap();

        let m = PathMatcher::load(dir.path()).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_load_tolerates_non_utf8_ignore_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), b"*.log\n\xff\xfe\x80\nbuild/\n").unwrap();

        let m = PathMatcher::load(dir.path()).unwrap();
        assert!(m.is_ignored("debug.log", false));
        assert!(m.is_ignored("build", true));
        assert!(!m.is_ignored("src/main.rs", false));
    }

    #[test]
    fn test_load_skips_ignore_file_that_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg/.gitignore")).unwrap();
        fs::write(dir.path().join(".gitignore"), "*.tmp\n").unwrap();

        let m = PathMatcher::load(dir.path()).unwrap();
        assert_eq!(m.len(), 1);
        assert!(m.is_ignored("pkg/cache.tmp", false));
    }

    #[test]
    fn test_load_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let err = PathMatcher::load(&missing).unwrap_err();
        assert!(matches!(err, CodemapError::RootUnavailable { .. }));
    }
}
