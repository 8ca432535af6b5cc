//! Project and version records.
//!
//! A [`Project`] is the unit every backend stores. It is a plain value: backends
//! persist a serialized copy and hand back a freshly deserialized one, so there
//! is never shared identity between an in-memory project and a stored one.
//!
//! The serialized shape is fixed and shared by all backends:
//!
//! ```json
//! {"id": "demo", "data": "...", "versions": [{"hash": "abc", "timestamp": 1700000000000}]}
//! ```

use crate::domain::error::{ProjstashError, Result};
use serde::{Deserialize, Serialize};

/// A saved project.
///
/// # Fields
///
/// - `id`: Caller-chosen primary key, shared across all backends. Must be non-empty.
///   Backends take care of encoding it for their medium.
/// - `data`: Opaque payload; never interpreted by the storage layer.
/// - `versions`: Version history in caller order, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub data: String,
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// One entry in a project's version history.
///
/// `timestamp` is a logical creation time. Callers are expected to append
/// versions in non-decreasing timestamp order, but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub hash: String,
    pub timestamp: i64,
}

impl Project {
    /// Creates a project with an empty version history.
    ///
    /// # Examples
    ///
    /// ```
    /// use projstash::Project;
    ///
    /// let project = Project::new("notes", "hello");
    /// assert_eq!(project.id, "notes");
    /// assert!(project.versions.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            versions: Vec::new(),
        }
    }

    /// Appends a version and returns the project, for builder-style construction.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.versions.push(version);
        self
    }

    /// Returns the most recently appended version, if any.
    #[must_use]
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Checks that the project can be used as a storage key.
    ///
    /// # Errors
    ///
    /// Returns [`ProjstashError::InvalidProject`] if the id is empty.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(ProjstashError::InvalidProject(
                "project id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Version {
    pub fn new(hash: impl Into<String>, timestamp: i64) -> Self {
        Self {
            hash: hash.into(),
            timestamp,
        }
    }

    /// Creates a version stamped with the current Unix time in milliseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use projstash::Version;
    ///
    /// let version = Version::now("abc123");
    /// assert!(version.timestamp > 0);
    /// ```
    #[must_use]
    pub fn now(hash: impl Into<String>) -> Self {
        Self::new(hash, chrono::Utc::now().timestamp_millis())
    }
}
