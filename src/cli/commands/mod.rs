pub mod config;
pub mod map;
pub mod refs;
pub mod show;
