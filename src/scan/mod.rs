//! Target expansion into concrete file lists

pub mod expand;

pub use expand::{expand, TargetExpander, ALL_FILES};
