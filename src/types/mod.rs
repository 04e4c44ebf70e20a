pub mod error;

pub use error::{CodemapError, Result};
