//! Line Budget Planner
//!
//! Decides, for every indexed file, whether the map shows it in full, as a
//! placeholder inside a truncated directory, as a "skipped by default"
//! notice, or not at all. Pruning is greedy:
//!
//! 1. truncate the costliest leaf directory, repeat while over budget
//! 2. once no leaf can be truncated, drop the costliest remaining files
//!
//! Ties always break on the smaller path so the plan never depends on input
//! or map iteration order.

use serde::Serialize;
use tracing::debug;

use super::tree::{DirTree, NodeId};
use crate::config::{LineBudget, MapOptions};

/// Planner input: a file and the lines it costs when rendered in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRecord<'a> {
    pub path: &'a str,
    pub cost: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Full,
    Truncated,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Index into the planner input
    pub index: usize,
    pub path: String,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPlan {
    /// Rendered entries, sorted by path
    pub entries: Vec<PlanEntry>,
    /// Directories rendered as placeholders, sorted
    pub truncated_dirs: Vec<String>,
    /// Files omitted entirely to fit the budget, sorted
    pub dropped: Vec<String>,
    /// Lines used by full and truncated entries
    pub total_cost: usize,
    pub budget: LineBudget,
}

impl MapPlan {
    /// Whether any truncation or file drop happened
    pub fn is_pruned(&self) -> bool {
        !self.truncated_dirs.is_empty() || !self.dropped.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn within_budget(&self) -> bool {
        self.budget.allows(self.total_cost)
    }
}

// =============================================================================
// Path Selection
// =============================================================================

/// Exact file match or directory prefix match (`cmd` selects `cmd/main.go`).
pub fn matches_filter(path: &str, filter: &str) -> bool {
    let path = path.strip_prefix("./").unwrap_or(path);
    let filter = filter.strip_prefix("./").unwrap_or(filter);
    if path == filter {
        return true;
    }
    let dir = filter.trim_end_matches('/');
    !dir.is_empty() && path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

/// Whether `path` equals or lies under any skip prefix.
pub fn is_skipped(path: &str, patterns: &[String]) -> bool {
    let path = path.strip_prefix("./").unwrap_or(path);
    patterns.iter().any(|pattern| {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        let pattern = pattern.trim_end_matches('/');
        !pattern.is_empty()
            && (path == pattern
                || path.strip_prefix(pattern).is_some_and(|rest| rest.starts_with('/')))
    })
}

// =============================================================================
// Planning
// =============================================================================

pub fn plan(files: &[FileRecord<'_>], options: &MapOptions) -> MapPlan {
    let mut entries = Vec::new();
    let mut tree = DirTree::new();

    for (index, file) in files.iter().enumerate() {
        match &options.filter {
            Some(filter) if !matches_filter(file.path, filter) => continue,
            Some(_) => {}
            None if is_skipped(file.path, &options.skip_patterns) => {
                entries.push(PlanEntry {
                    index,
                    path: file.path.to_string(),
                    status: EntryStatus::Skipped,
                });
                continue;
            }
            None => {}
        }
        // Files without symbols render nothing
        if file.cost > 0 {
            tree.insert(index, file.path, file.cost);
        }
    }
    tree.recompute();

    let mut truncated_dirs = Vec::new();
    if let Some(limit) = options.budget.limit()
        && tree.total_cost() > limit
    {
        debug!(
            "Map needs {} lines, budget is {}; pruning",
            tree.total_cost(),
            limit
        );
        truncate_leaves(&mut tree, limit, &mut truncated_dirs);
        if tree.total_cost() > limit {
            drop_files(&mut tree, limit);
        }
    }

    let mut dropped = Vec::new();
    tree.walk(|_, node| {
        for file in &node.files {
            if file.dropped {
                dropped.push(file.path.clone());
                continue;
            }
            entries.push(PlanEntry {
                index: file.index,
                path: file.path.clone(),
                status: if node.truncated {
                    EntryStatus::Truncated
                } else {
                    EntryStatus::Full
                },
            });
        }
    });

    entries.sort_by(|a, b| a.path.cmp(&b.path).then(a.index.cmp(&b.index)));
    truncated_dirs.sort();
    dropped.sort();

    MapPlan {
        entries,
        truncated_dirs,
        dropped,
        total_cost: tree.total_cost(),
        budget: options.budget,
    }
}

fn truncate_leaves(tree: &mut DirTree, limit: usize, truncated: &mut Vec<String>) {
    while tree.total_cost() > limit {
        let Some(chain) = largest_leaf(tree) else {
            break;
        };
        let Some(&leaf) = chain.last() else {
            break;
        };
        debug!(
            "Truncating {} ({} lines)",
            tree.node(leaf).path,
            tree.node(leaf).aggregate_cost
        );
        truncated.push(tree.node(leaf).path.clone());
        tree.truncate(&chain);
    }
}

/// Root-to-leaf chain of the costliest untruncated leaf directory. The
/// root itself is never a candidate.
fn largest_leaf(tree: &DirTree) -> Option<Vec<NodeId>> {
    let mut best: Option<(usize, Vec<NodeId>)> = None;

    tree.walk(|chain, node| {
        if chain.len() < 2 || !node.is_leaf() || node.truncated {
            return;
        }
        // walk visits paths in order, so the first of equal costs wins
        if best.as_ref().is_none_or(|(cost, _)| node.aggregate_cost > *cost) {
            best = Some((node.aggregate_cost, chain.to_vec()));
        }
    });

    best.map(|(_, chain)| chain)
}

/// Drop files outside truncated directories, largest first, until the
/// budget is met or nothing droppable is left.
fn drop_files(tree: &mut DirTree, limit: usize) {
    let mut candidates: Vec<(usize, String, Vec<NodeId>, usize)> = Vec::new();
    tree.walk(|chain, node| {
        if node.truncated {
            return;
        }
        for (i, file) in node.files.iter().enumerate() {
            if !file.dropped {
                candidates.push((file.cost, file.path.clone(), chain.to_vec(), i));
            }
        }
    });

    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    for (cost, path, chain, file) in candidates {
        if tree.total_cost() <= limit {
            break;
        }
        debug!("Dropping {} ({} lines)", path, cost);
        tree.drop_file(&chain, file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records<'a>(files: &[(&'a str, usize)]) -> Vec<FileRecord<'a>> {
        files
            .iter()
            .map(|&(path, cost)| FileRecord { path, cost })
            .collect()
    }

    fn options(budget: LineBudget) -> MapOptions {
        MapOptions::default().with_budget(budget)
    }

    fn status_of<'p>(plan: &'p MapPlan, path: &str) -> Option<&'p EntryStatus> {
        plan.entries.iter().find(|e| e.path == path).map(|e| &e.status)
    }

    #[test]
    fn test_under_budget_is_noop() {
        let files = records(&[("b/x.rs", 22), ("a/y.rs", 12), ("main.rs", 4)]);
        let plan = plan(&files, &options(LineBudget::Lines(100)));

        assert!(!plan.is_pruned());
        assert_eq!(plan.total_cost, 38);
        let paths: Vec<&str> = plan.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a/y.rs", "b/x.rs", "main.rs"]);
        assert!(plan.entries.iter().all(|e| e.status == EntryStatus::Full));
    }

    #[test]
    fn test_default_budget_total_60() {
        let files = records(&[("a/x.rs", 30), ("b/y.rs", 30)]);
        let plan = plan(&files, &MapOptions::default());
        assert_eq!(plan.budget, LineBudget::Lines(1000));
        assert!(!plan.is_pruned());
    }

    #[test]
    fn test_largest_directory_truncated_first() {
        let files = records(&[("big/a.rs", 22), ("mid/b.rs", 12), ("small/c.rs", 4)]);
        let plan = plan(&files, &options(LineBudget::Lines(20)));

        assert_eq!(plan.truncated_dirs, vec!["big"]);
        assert!(plan.dropped.is_empty());
        assert_eq!(status_of(&plan, "big/a.rs"), Some(&EntryStatus::Truncated));
        assert_eq!(status_of(&plan, "mid/b.rs"), Some(&EntryStatus::Full));
        assert_eq!(status_of(&plan, "small/c.rs"), Some(&EntryStatus::Full));
        assert_eq!(plan.total_cost, 3 + 12 + 4);
    }

    #[test]
    fn test_five_directories_budget_50() {
        let files = records(&[
            ("e/main.go", 22),
            ("c/main.go", 22),
            ("a/main.go", 22),
            ("d/main.go", 22),
            ("b/main.go", 22),
        ]);
        let plan = plan(&files, &options(LineBudget::Lines(50)));

        assert!(plan.total_cost <= 50);
        assert!(plan.within_budget());
        assert_eq!(plan.truncated_dirs, vec!["a", "b", "c", "d"]);
        assert_eq!(status_of(&plan, "e/main.go"), Some(&EntryStatus::Full));
    }

    #[test]
    fn test_unlimited_budget_never_prunes() {
        let files = records(&[("a/x.rs", 5000)]);
        let plan = plan(&files, &options(LineBudget::Unlimited));
        assert!(!plan.is_pruned());
        assert_eq!(plan.total_cost, 5000);
    }

    #[test]
    fn test_skip_patterns_and_filter() {
        let files = records(&[("vendor/lib.go", 10), ("app/main.go", 10)]);
        let skip = vec!["vendor".to_string()];

        let opts = MapOptions {
            skip_patterns: skip.clone(),
            ..MapOptions::default()
        };
        let plan_skip = plan(&files, &opts);
        assert_eq!(status_of(&plan_skip, "vendor/lib.go"), Some(&EntryStatus::Skipped));
        assert_eq!(status_of(&plan_skip, "app/main.go"), Some(&EntryStatus::Full));
        // skip notices are not charged against the budget
        assert_eq!(plan_skip.total_cost, 10);

        let filtered = plan(&files, &opts.clone().with_filter(Some("vendor".to_string())));
        assert_eq!(filtered.entries.len(), 1);
        assert_eq!(filtered.entries[0].path, "vendor/lib.go");
        assert_eq!(filtered.entries[0].status, EntryStatus::Full);
    }

    #[test]
    fn test_zero_cost_files_not_rendered() {
        let files = records(&[("a.rs", 0), ("b.rs", 5)]);
        let plan = plan(&files, &MapOptions::default());
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].path, "b.rs");
    }

    #[test]
    fn test_truncation_then_file_drop() {
        // Truncating `lib` leaves 3 + 12 lines; only the root file can go.
        let files = records(&[("lib/big.rs", 22), ("main.rs", 12)]);
        let plan = plan(&files, &options(LineBudget::Lines(10)));

        assert_eq!(plan.truncated_dirs, vec!["lib"]);
        assert_eq!(plan.dropped, vec!["main.rs"]);
        assert_eq!(plan.total_cost, 3);
        assert_eq!(status_of(&plan, "lib/big.rs"), Some(&EntryStatus::Truncated));
        assert_eq!(status_of(&plan, "main.rs"), None);
    }

    #[test]
    fn test_no_drop_when_truncation_suffices() {
        let files = records(&[("lib/big.rs", 22), ("main.rs", 12)]);
        let plan = plan(&files, &options(LineBudget::Lines(15)));

        assert_eq!(plan.truncated_dirs, vec!["lib"]);
        assert!(plan.dropped.is_empty());
        assert_eq!(plan.total_cost, 15);
    }

    #[test]
    fn test_parent_dir_files_dropped_not_truncated() {
        // `src` still has a child after `src/util` is truncated, so its own
        // files can only be dropped.
        let files = records(&[
            ("src/util/a.rs", 12),
            ("src/lib.rs", 20),
            ("src/mod.rs", 6),
        ]);
        let plan = plan(&files, &options(LineBudget::Lines(12)));

        assert_eq!(plan.truncated_dirs, vec!["src/util"]);
        assert_eq!(plan.dropped, vec!["src/lib.rs"]);
        assert_eq!(plan.total_cost, 3 + 6);
    }

    #[test]
    fn test_over_budget_when_nothing_left_to_drop() {
        let files = records(&[("a/x.rs", 22), ("b/y.rs", 22)]);
        let plan = plan(&files, &options(LineBudget::Lines(2)));

        assert_eq!(plan.truncated_dirs, vec!["a", "b"]);
        assert!(plan.dropped.is_empty());
        assert_eq!(plan.total_cost, 6);
        assert!(!plan.within_budget());
    }

    #[test]
    fn test_every_leaf_truncated_before_files_drop() {
        // `a` saves nothing when truncated, but it still becomes a
        // placeholder rather than losing its file.
        let files = records(&[("a/tiny.rs", 3), ("b/big.rs", 30)]);
        let plan = plan(&files, &options(LineBudget::Lines(5)));

        assert_eq!(plan.truncated_dirs, vec!["a", "b"]);
        assert!(plan.dropped.is_empty());
        assert_eq!(status_of(&plan, "a/tiny.rs"), Some(&EntryStatus::Truncated));
        assert_eq!(plan.total_cost, 6);
        assert!(!plan.within_budget());
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("cmd/main.go", "cmd"));
        assert!(matches_filter("cmd/main.go", "./cmd/"));
        assert!(matches_filter("cmd/main.go", "cmd/main.go"));
        assert!(!matches_filter("cmdline/main.go", "cmd"));
    }

    #[test]
    fn test_is_skipped() {
        let patterns = vec!["vendor/".to_string(), "./gen".to_string()];
        assert!(is_skipped("vendor/x.go", &patterns));
        assert!(is_skipped("gen", &patterns));
        assert!(!is_skipped("generated/x.go", &patterns));
        assert!(!is_skipped("x.go", &[String::new()]));
    }

    fn file_set() -> impl Strategy<Value = Vec<(String, usize)>> {
        // Rendered costs are 0 or at least header + one symbol + blank
        let cost = prop_oneof![Just(0usize), 3usize..40];
        prop::collection::btree_map("[a-c](/[a-c]){0,2}/f[0-9]\\.rs", cost, 1..24)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_plan_independent_of_input_order(files in file_set(), budget in 1usize..200) {
            let forward: Vec<FileRecord> = files
                .iter()
                .map(|(p, c)| FileRecord { path: p, cost: *c })
                .collect();
            let mut reversed = forward.clone();
            reversed.reverse();

            let opts = options(LineBudget::Lines(budget));
            let a = plan(&forward, &opts);
            let b = plan(&reversed, &opts);

            let strip = |p: &MapPlan| -> Vec<(String, EntryStatus)> {
                p.entries.iter().map(|e| (e.path.clone(), e.status)).collect()
            };
            prop_assert_eq!(strip(&a), strip(&b));
            prop_assert_eq!(a.truncated_dirs, b.truncated_dirs);
            prop_assert_eq!(a.dropped, b.dropped);
            prop_assert_eq!(a.total_cost, b.total_cost);
        }

        #[test]
        fn prop_fits_when_budget_covers_placeholders(files in file_set(), extra in 0usize..50) {
            let records: Vec<FileRecord> = files
                .iter()
                .map(|(p, c)| FileRecord { path: p, cost: *c })
                .collect();
            let budget = 3 * records.len() + extra;
            let plan = plan(&records, &options(LineBudget::Lines(budget)));
            prop_assert!(plan.total_cost <= budget);
        }

        #[test]
        fn prop_every_file_accounted_for(files in file_set(), budget in 1usize..200) {
            let records: Vec<FileRecord> = files
                .iter()
                .map(|(p, c)| FileRecord { path: p, cost: *c })
                .collect();
            let plan = plan(&records, &options(LineBudget::Lines(budget)));
            let rendered = records.iter().filter(|r| r.cost > 0).count();
            prop_assert_eq!(plan.entries.len() + plan.dropped.len(), rendered);
        }
    }
}
