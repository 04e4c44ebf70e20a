//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Map rendering and budget constants
pub mod map {
    /// Default maximum number of output lines when the configured limit is 0
    pub const DEFAULT_LINE_LIMIT: usize = 1000;

    /// Lines taken by a placeholder entry (header + notice + blank)
    pub const PLACEHOLDER_LINES: usize = 3;

    /// Lines a file costs on top of its symbols (header + trailing blank)
    pub const FILE_OVERHEAD_LINES: usize = 2;

    /// Notice rendered for files under a default skip pattern
    pub const SKIPPED_NOTICE: &str =
        "(skipped by default - use filter parameter to index this path explicitly)";

    /// Notice rendered for files in a truncated directory
    pub const TRUNCATED_NOTICE: &str =
        "(truncated to fit line limit - use filter parameter to view this directory)";

    /// Output when nothing was indexed
    pub const EMPTY_MAP: &str = "No symbols found in the specified directory.";
}

/// Directory walk constants
pub mod scan {
    /// Name of the per-directory ignore file
    pub const IGNORE_FILE: &str = ".gitignore";

    /// Directory names never descended into, regardless of ignore rules
    pub const DEFAULT_SKIP_DIRS: &[&str] = &["vendor", "node_modules"];

    /// Files larger than this are indexed with zero symbols (2MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;
}

/// Reference search constants
pub mod references {
    /// Context lines longer than this are cut
    pub const MAX_CONTEXT_CHARS: usize = 100;

    /// Kept prefix length when a context line is cut (room for "...")
    pub const CUT_CONTEXT_CHARS: usize = 97;
}
