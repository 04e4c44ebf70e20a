//! Show Command
//!
//! Print one symbol's definition with numbered source lines.

use std::path::Path;

use crate::analyzer::find_definition;
use crate::types::Result;

pub fn run(file: &Path, symbol: &str) -> Result<()> {
    let definition = find_definition(file, symbol)?;
    print!("{}", definition.render());
    Ok(())
}
