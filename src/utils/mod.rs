//! Small shared helpers.

pub mod paths;

pub use paths::{base_name, normalize_path};
