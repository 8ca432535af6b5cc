//! Domain layer for projstash.
//!
//! This module contains the record types persisted by every backend and the
//! crate's error type. Nothing here knows about cookies, fragments or files.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`project`]: `Project` and `Version` records
//!
//! # Examples
//!
//! ```
//! use projstash::domain::{Project, Version};
//!
//! let project = Project::new("demo", "payload").with_version(Version::new("abc123", 1));
//! assert_eq!(project.versions.len(), 1);
//! ```

pub mod error;
pub mod project;

pub use error::{ProjstashError, Result};
pub use project::{Project, Version};
