//! Cookie-backed storage.
//!
//! Each project is stored as its own cookie: the name is the encoded project
//! id and the value is the encoded JSON of the whole project.
//!
//! # Listing Caveat
//!
//! The jar is shared with whatever else sets cookies, and there is no marker
//! telling a project cookie apart from an unrelated one. `list_all` decodes
//! every cookie as a project, so a single foreign cookie makes the whole
//! listing come back empty. `load` is unaffected because it only decodes the
//! matching cookie.

use crate::domain::error::Result;
use crate::domain::Project;
use crate::medium::cookie_jar::{CookieJar, COOKIE_SEPARATOR};
use crate::storage::backend::{absorb, Backend};
use crate::storage::codec;

/// Backend storing one cookie per project.
#[derive(Debug)]
pub struct CookieBackend<J: CookieJar> {
    jar: J,
}

impl<J: CookieJar> CookieBackend<J> {
    pub const fn new(jar: J) -> Self {
        Self { jar }
    }

    /// Returns the underlying jar.
    pub const fn jar(&self) -> &J {
        &self.jar
    }

    fn entries(&self) -> Result<Vec<String>> {
        let raw = self.jar.cookie_string()?;
        Ok(raw
            .split(COOKIE_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect())
    }

    fn try_save(&self, project: &Project) -> Result<()> {
        let entry = codec::encode_entry(project)?;
        tracing::trace!(bytes = entry.len(), "writing project cookie");
        self.jar.set_cookie(&entry)
    }

    fn try_load(&self, id: &str) -> Result<Option<Project>> {
        self.entries()?
            .iter()
            .filter_map(|entry| codec::split_entry(entry))
            .find(|(key, _)| codec::key_matches(key, id))
            .map(|(_, value)| codec::decode_project(value))
            .transpose()
    }

    fn try_list(&self) -> Result<Vec<Project>> {
        self.entries()?
            .iter()
            .map(|entry| {
                let value = codec::split_entry(entry).map_or(entry.as_str(), |(_, value)| value);
                codec::decode_project(value)
            })
            .collect()
    }
}

impl<J: CookieJar> Backend for CookieBackend<J> {
    fn name(&self) -> &str {
        "cookie"
    }

    fn save(&mut self, project: &Project) {
        let _span = tracing::debug_span!("cookie_save", project_id = %project.id).entered();
        let result = self.try_save(project);
        absorb(self.name(), "save", result, ());
    }

    fn load(&self, id: &str) -> Option<Project> {
        let _span = tracing::debug_span!("cookie_load", project_id = %id).entered();
        let project = absorb(self.name(), "load", self.try_load(id), None);

        tracing::debug!(found = project.is_some(), "cookie lookup complete");
        project
    }

    fn list_all(&self) -> Vec<Project> {
        let _span = tracing::debug_span!("cookie_list_all").entered();
        let projects = absorb(self.name(), "list_all", self.try_list(), Vec::new());

        tracing::debug!(count = projects.len(), "listed cookie projects");
        projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::medium::{MemoryCookieJar, MAX_COOKIE_BYTES};

    fn sample(id: &str) -> Project {
        Project::new(id, format!("data for {id}"))
            .with_version(Version::new("h1", 10))
            .with_version(Version::new("h2", 20))
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut backend = CookieBackend::new(MemoryCookieJar::new());
        let project = sample("alpha");

        backend.save(&project);

        assert_eq!(backend.load("alpha"), Some(project));
    }

    #[test]
    fn save_overwrites_same_id_and_keeps_others() {
        let mut backend = CookieBackend::new(MemoryCookieJar::new());
        backend.save(&sample("a"));
        backend.save(&sample("b"));
        backend.save(&Project::new("a", "updated"));

        assert_eq!(backend.load("a").map(|p| p.data), Some("updated".to_string()));
        let ids: Vec<String> = backend.list_all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn ids_with_delimiters_are_encoded() {
        let jar = MemoryCookieJar::new();
        let mut backend = CookieBackend::new(jar.clone());
        let project = sample("my project; v=2");

        backend.save(&project);

        let raw = jar.cookie_string().unwrap();
        assert!(raw.starts_with("my%20project%3B%20v%3D2="));
        assert_eq!(backend.load("my project; v=2"), Some(project));
    }

    #[test]
    fn empty_jar_is_empty() {
        let backend = CookieBackend::new(MemoryCookieJar::new());
        assert!(backend.load("anything").is_none());
        assert!(backend.list_all().is_empty());
    }

    #[test]
    fn foreign_cookie_breaks_listing_but_not_load() {
        let jar = MemoryCookieJar::from_cookie_string("session=abc123");
        let mut backend = CookieBackend::new(jar);
        backend.save(&sample("alpha"));

        assert!(backend.list_all().is_empty());
        assert_eq!(backend.load("alpha"), Some(sample("alpha")));
    }

    #[test]
    fn malformed_matching_cookie_loads_as_absent() {
        let backend = CookieBackend::new(MemoryCookieJar::from_cookie_string("alpha=%7Bbroken"));
        assert!(backend.load("alpha").is_none());
    }

    #[test]
    fn oversized_project_fails_softly() {
        let jar = MemoryCookieJar::new();
        let mut backend = CookieBackend::new(jar.clone());

        backend.save(&Project::new("huge", "x".repeat(MAX_COOKIE_BYTES)));

        assert!(backend.load("huge").is_none());
        assert_eq!(jar.cookie_string().unwrap(), "");
    }

    #[test]
    fn disabled_jar_fails_softly() {
        let mut backend = CookieBackend::new(MemoryCookieJar::disabled());
        backend.save(&sample("alpha"));
        assert!(backend.load("alpha").is_none());
        assert!(backend.list_all().is_empty());
    }

    #[test]
    fn empty_id_is_not_written() {
        let jar = MemoryCookieJar::new();
        let mut backend = CookieBackend::new(jar.clone());
        backend.save(&Project::new("", "x"));
        assert_eq!(jar.cookie_string().unwrap(), "");
    }
}
