//! Map Command
//!
//! Index a directory and print its symbol map within the line budget.
//!
//! Usage:
//!   codemap map [PATH] [-f FILTER] [--skip PREFIX]... [--limit N] [--format text|json]

use std::path::PathBuf;

use tracing::info;

use crate::analyzer::index_directory;
use crate::cli::ui::Output;
use crate::codemap::{build_map, render_json, render_text};
use crate::config::{Config, ConfigLoader, LineBudget, MapOptions};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct MapArgs {
    pub path: Option<PathBuf>,
    pub filter: Option<String>,
    pub skip: Vec<String>,
    pub limit: Option<i64>,
    pub format: String,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

impl MapArgs {
    /// Per-call map options: config values overridden by flags.
    pub fn options(&self, config: &Config) -> MapOptions {
        let mut options = MapOptions::from_config(&config.map);
        options.skip_patterns.extend(self.skip.iter().cloned());
        if let Some(limit) = self.limit {
            options = options.with_budget(LineBudget::from_limit(limit));
        }
        options.with_filter(self.filter.clone())
    }
}

pub fn run(args: MapArgs) -> Result<()> {
    let root = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = ConfigLoader::load_with(&root, args.config.as_deref())?;
    let options = args.options(&config);

    let files = index_directory(&root, &config.scan)?;
    let plan = build_map(&files, &options);
    info!(
        "Planned {} entries in {} lines ({})",
        plan.entries.len(),
        plan.total_cost,
        plan.budget
    );

    if !plan.within_budget() {
        Output::quiet(args.quiet).warning(&format!(
            "Map still needs {} lines after pruning ({}); narrow it with --filter",
            plan.total_cost, plan.budget
        ));
    }

    match args.format.as_str() {
        "json" => println!("{}", render_json(&files, &plan)?),
        _ => print!("{}", render_text(&files, &plan)),
    }

    Ok(())
}
