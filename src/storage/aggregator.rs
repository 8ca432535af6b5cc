//! Cross-backend aggregation.
//!
//! [`StorageModule`] combines an ordered list of backends under one
//! save/fetch/list surface:
//!
//! - **save** is broadcast to every backend, in order, whatever each one does
//! - **fetch** returns the first backend hit, later backends are never consulted
//! - **list** concatenates every backend's listing without deduplication
//!
//! Since backends never report failure, the aggregator has no error handling
//! of its own. A partial save (some backends wrote, some did not) is the
//! normal case, not an exceptional one.

use crate::domain::Project;
use crate::storage::backend::Backend;
use std::collections::HashSet;

/// Ordered set of backends presented as one store.
///
/// # Examples
///
/// ```
/// use projstash::medium::{MemoryCookieJar, MemoryLocation};
/// use projstash::storage::{CookieBackend, FragmentBackend, StorageModule};
/// use projstash::Project;
///
/// let mut storage = StorageModule::new(vec![
///     Box::new(CookieBackend::new(MemoryCookieJar::new())),
///     Box::new(FragmentBackend::new(MemoryLocation::default())),
/// ]);
///
/// storage.save_project(&Project::new("demo", "payload"));
///
/// assert!(storage.fetch_project("demo").is_some());
/// // Both backends hold a copy, and listing does not deduplicate.
/// assert_eq!(storage.list_projects().len(), 2);
/// ```
#[derive(Default)]
pub struct StorageModule {
    backends: Vec<Box<dyn Backend>>,
}

impl StorageModule {
    #[must_use]
    pub fn new(backends: Vec<Box<dyn Backend>>) -> Self {
        tracing::debug!(backend_count = backends.len(), "storage module created");
        Self { backends }
    }

    /// Appends a backend after the existing ones.
    #[must_use]
    pub fn with_backend(mut self, backend: impl Backend + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// Saves `project` to every backend in order.
    ///
    /// Each backend is attempted even if an earlier one failed. There is no
    /// rollback, so after this call any subset of the backends may hold the
    /// new copy.
    pub fn save_project(&mut self, project: &Project) {
        let _span = tracing::info_span!("save_project",
            project_id = %project.id,
            backend_count = self.backends.len()
        ).entered();

        for backend in &mut self.backends {
            backend.save(project);
        }
    }

    /// Returns the first copy of `id` found, searching backends in order.
    ///
    /// If several backends hold different data under `id`, only the earliest
    /// backend's copy is visible.
    #[must_use]
    pub fn fetch_project(&self, id: &str) -> Option<Project> {
        let _span = tracing::info_span!("fetch_project", project_id = %id).entered();

        let found = self
            .backends
            .iter()
            .find_map(|backend| backend.load(id).map(|project| (backend.name(), project)));

        match found {
            Some((source, project)) => {
                tracing::debug!(source = source, "project found");
                Some(project)
            }
            None => {
                tracing::debug!("project not found in any backend");
                None
            }
        }
    }

    /// Returns every backend's projects, concatenated in backend order.
    ///
    /// The same id may appear more than once. Use [`dedup_by_id`] if unique
    /// ids are needed.
    #[must_use]
    pub fn list_projects(&self) -> Vec<Project> {
        let _span = tracing::info_span!("list_projects").entered();

        let projects: Vec<Project> = self
            .backends
            .iter()
            .flat_map(|backend| backend.list_all())
            .collect();

        tracing::debug!(count = projects.len(), "projects listed");
        projects
    }

    /// Names of the configured backends, in order.
    #[must_use]
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for StorageModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageModule")
            .field("backends", &self.backend_names())
            .finish()
    }
}

/// Drops later projects whose id was already seen, preserving order.
///
/// Combined with [`StorageModule::list_projects`] this gives the same
/// precedence as [`StorageModule::fetch_project`]: the earliest backend wins.
#[must_use]
pub fn dedup_by_id(projects: Vec<Project>) -> Vec<Project> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|project| seen.insert(project.id.clone()))
        .collect()
}
