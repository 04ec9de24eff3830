//! Configuration for the comment tree
//!
//! This crate provides:
//! - Configuration file lookup (CWD, then home directory)
//! - Tree configuration (TreeConfig) with serde defaults

pub mod config_file;
pub mod tree_config;

pub use config_file::load_config_file;
pub use tree_config::TreeConfig;
