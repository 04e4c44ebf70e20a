//! Budgeted Symbol Maps
//!
//! - [`tree`]: directory cost tree
//! - [`planner`]: fits the index into a line budget
//! - [`formatter`]: renders the plan as text or JSON

pub mod formatter;
pub mod planner;
pub mod tree;

pub use formatter::{render_json, render_text};
pub use planner::{EntryStatus, FileRecord, MapPlan, PlanEntry, is_skipped, matches_filter, plan};

use crate::analyzer::FileIndex;
use crate::config::MapOptions;

/// Plan a map over indexed files, charging each its rendered line cost.
pub fn build_map(files: &[FileIndex], options: &MapOptions) -> MapPlan {
    let records: Vec<FileRecord<'_>> = files
        .iter()
        .map(|file| FileRecord {
            path: &file.path,
            cost: file.rendered_cost(),
        })
        .collect();
    plan(&records, options)
}
