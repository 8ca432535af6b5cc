//! Infrastructure layer for filesystem and environment interactions.
//!
//! Locating the data directory and resolving configured file paths.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, resolve_in};
