//! Map Rendering
//!
//! Turns a [`MapPlan`] back into text or JSON. All decisions are already
//! made by the planner; this module only assembles output.

use std::fmt::Write as _;

use serde::Serialize;

use super::planner::{EntryStatus, MapPlan};
use crate::analyzer::FileIndex;
use crate::analyzer::parser::Symbol;
use crate::constants::map::{EMPTY_MAP, SKIPPED_NOTICE, TRUNCATED_NOTICE};
use crate::types::Result;

/// Render the plan as the plain-text map. `files` must be the slice the
/// plan was built from.
///
/// A plan that pruned everything away still prints its notice block.
pub fn render_text(files: &[FileIndex], plan: &MapPlan) -> String {
    if plan.is_empty() && !plan.is_pruned() {
        return EMPTY_MAP.to_string();
    }

    let mut out = String::new();

    if plan.is_pruned() {
        out.push_str("# Note: Output pruned to fit line limit\n");
        if !plan.truncated_dirs.is_empty() {
            let _ = writeln!(out, "# Pruned directories: {}", plan.truncated_dirs.join(", "));
        }
        if !plan.dropped.is_empty() {
            let _ = writeln!(out, "# Omitted files: {}", plan.dropped.len());
        }
        out.push('\n');
    }

    for entry in &plan.entries {
        let _ = writeln!(out, "## {}", entry.path);
        match entry.status {
            EntryStatus::Full => {
                if let Some(file) = files.get(entry.index) {
                    for symbol in &file.symbols {
                        out.push_str(&symbol.render());
                        out.push('\n');
                    }
                }
            }
            EntryStatus::Truncated => {
                let _ = writeln!(out, "  {}", TRUNCATED_NOTICE);
            }
            EntryStatus::Skipped => {
                let _ = writeln!(out, "  {}", SKIPPED_NOTICE);
            }
        }
        out.push('\n');
    }

    out
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Serialize)]
struct JsonMap<'a> {
    entries: Vec<JsonEntry<'a>>,
    truncated_dirs: &'a [String],
    dropped: &'a [String],
    total_lines: usize,
}

#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    path: &'a str,
    status: EntryStatus,
    #[serde(skip_serializing_if = "<[Symbol]>::is_empty")]
    symbols: &'a [Symbol],
}

/// Render the plan as pretty JSON. Only fully rendered entries carry symbols.
pub fn render_json(files: &[FileIndex], plan: &MapPlan) -> Result<String> {
    let entries = plan
        .entries
        .iter()
        .map(|entry| JsonEntry {
            path: &entry.path,
            status: entry.status,
            symbols: match entry.status {
                EntryStatus::Full => files
                    .get(entry.index)
                    .map(|f| f.symbols.as_slice())
                    .unwrap_or(&[]),
                _ => &[],
            },
        })
        .collect();

    let map = JsonMap {
        entries,
        truncated_dirs: &plan.truncated_dirs,
        dropped: &plan.dropped,
        total_lines: plan.total_cost,
    };

    Ok(serde_json::to_string_pretty(&map)?)
}
