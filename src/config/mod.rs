//! Configuration loading and merging
//!
//! Handles loading from the `.tabappend` dotfile, CLI arguments and caller
//! overrides with precedence (override > CLI > file > defaults).

pub mod loader;
pub mod merge;

pub use loader::{load_config, parse_config_file};
pub use merge::{merge, resolve_sources};
