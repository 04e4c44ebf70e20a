//! Refs Command
//!
//! Find identifier references to a symbol across a directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::{find_references, format_references};
use crate::config::ConfigLoader;
use crate::types::Result;

pub fn run(symbol: &str, path: Option<PathBuf>, config: Option<&Path>, format: &str) -> Result<()> {
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    let config = ConfigLoader::load_with(&root, config)?;

    let refs = find_references(&root, symbol, &config.scan)?;
    info!("Found {} references to {:?}", refs.len(), symbol);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&refs)?),
        _ => {
            let text = format_references(symbol, &refs);
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
        }
    }
    Ok(())
}
