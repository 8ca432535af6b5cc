//! Storage backend abstraction.
//!
//! This module defines the [`Backend`] trait every storage medium adapter
//! implements. The aggregator only ever talks to backends through this trait,
//! so adding a medium means adding an implementation, never a branch in the
//! aggregator.
//!
//! # Failure Contract
//!
//! Backend operations never return errors. A failed `save` is logged and
//! returns normally, a failed `load` is `None`, and a failed `list_all` is an
//! empty vector. Implementations do their real work in private fallible
//! helpers and pass the outcome through [`absorb`], which emits the
//! diagnostic and substitutes the soft result.

use crate::domain::error::Result;
use crate::domain::Project;

/// A single storage medium adapter.
///
/// # Implementations
///
/// - [`CookieBackend`](crate::storage::CookieBackend): one cookie per project
/// - [`FragmentBackend`](crate::storage::FragmentBackend): single project in the URL fragment
///
/// # Examples
///
/// ```
/// use projstash::medium::MemoryCookieJar;
/// use projstash::storage::{Backend, CookieBackend};
/// use projstash::Project;
///
/// let mut backend = CookieBackend::new(MemoryCookieJar::new());
/// backend.save(&Project::new("demo", "payload"));
///
/// assert_eq!(backend.load("demo").map(|p| p.data), Some("payload".to_string()));
/// assert!(backend.load("other").is_none());
/// ```
pub trait Backend: Send {
    /// Short label for log fields, e.g. `"cookie"`.
    fn name(&self) -> &str;

    /// Writes `project` into the medium under its id.
    ///
    /// Overwrites any copy already stored under the same id. Failures are
    /// logged and otherwise invisible to the caller.
    fn save(&mut self, project: &Project);

    /// Returns the project stored under `id`.
    ///
    /// Returns `None` if there is no such entry or it cannot be decoded.
    fn load(&self, id: &str) -> Option<Project>;

    /// Returns every project decodable from the medium.
    ///
    /// Returns an empty vector if the medium cannot be read or decoded.
    fn list_all(&self) -> Vec<Project>;
}

/// Converts a fallible backend result into its soft form.
///
/// Logs success at `debug` and failure at `warn`, tagged with the backend and
/// operation names, then returns either the value or `fallback`. The failure
/// is emitted inside its own `warn`-level span so it is exported even when
/// every enclosing span is filtered out.
pub(crate) fn absorb<T>(backend: &str, operation: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => {
            tracing::debug!(backend = backend, operation = operation, "backend operation successful");
            value
        }
        Err(e) => {
            let _span = tracing::warn_span!("backend_failure", backend = backend, operation = operation).entered();
            tracing::warn!(backend = backend, operation = operation, error = %e, "backend operation failed");
            fallback
        }
    }
}
