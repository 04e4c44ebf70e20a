use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::gitignore::{PathMatcher, to_slash};
use crate::analyzer::parser::Language;
use crate::config::ScanConfig;
use crate::types::{CodemapError, Result};

/// Walks a source tree in file-name order, yielding files whose language
/// has a parser.
///
/// Hidden directories, directories named in `skip_dirs`, and anything the
/// ignore rules exclude are never entered. Directory names are matched
/// exactly; they are unrelated to the map's skip patterns.
pub struct FileScanner {
    root: PathBuf,
    skip_dirs: Vec<String>,
    matcher: Arc<PathMatcher>,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            skip_dirs: Vec::new(),
            matcher: Arc::new(PathMatcher::new()),
        }
    }

    /// Scanner configured from `[scan]`, with ignore rules loaded from
    /// `config.ignore_file` under the root.
    pub fn from_config<P: AsRef<Path>>(root: P, config: &ScanConfig) -> Result<Self> {
        let root = root.as_ref();
        let matcher = PathMatcher::load_with(root, &config.ignore_file)?;
        debug!("Loaded {} ignore rules under {}", matcher.len(), root.display());

        Ok(Self::new(root)
            .with_skip_dirs(config.skip_dirs.clone())
            .with_matcher(matcher))
    }

    pub fn with_skip_dirs(mut self, dirs: Vec<String>) -> Self {
        self.skip_dirs = dirs;
        self
    }

    pub fn with_matcher(mut self, matcher: PathMatcher) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        fs::read_dir(&self.root).map_err(|source| CodemapError::RootUnavailable {
            path: self.root.clone(),
            source,
        })?;

        let root = self.root.clone();
        let skip_dirs = self.skip_dirs.clone();
        let matcher = Arc::clone(&self.matcher);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let name = entry.file_name().to_string_lossy();
                if is_dir && (name.starts_with('.') || skip_dirs.iter().any(|d| *d == name)) {
                    return false;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&root)
                    .map(to_slash)
                    .unwrap_or_default();
                !matcher.is_ignored(&relative, is_dir)
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let language = Language::from_path(path);
            if !language.is_known() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative: to_slash(relative),
                size,
                language,
            });
        }

        Ok(files)
    }

    /// Root-relative paths of every scanned file
    pub fn paths(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_iter().map(|f| f.relative).collect())
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Root-relative, `/`-separated
    pub relative: String,
    pub size: u64,
    pub language: Language,
}
