//! Command-line plumbing shared by the `mapgen` and `fuzz` binaries.

pub mod args;
pub mod files;
pub mod render;
