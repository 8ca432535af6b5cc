//! URL-fragment-backed storage.
//!
//! The fragment holds `key=value` pairs separated by `&`, but this backend only
//! ever writes one: `save` replaces the whole fragment with the saved project.
//! The fragment is therefore a single slot, and saving a second project makes
//! the first one unreachable through this backend.

use crate::domain::error::Result;
use crate::domain::Project;
use crate::medium::location::Location;
use crate::storage::backend::{absorb, Backend};
use crate::storage::codec;

/// Separator between pairs in the fragment.
const PAIR_SEPARATOR: char = '&';

/// Backend storing a single project in the location fragment.
#[derive(Debug)]
pub struct FragmentBackend<L: Location> {
    location: L,
}

impl<L: Location> FragmentBackend<L> {
    pub const fn new(location: L) -> Self {
        Self { location }
    }

    pub const fn location(&self) -> &L {
        &self.location
    }

    fn try_save(&self, project: &Project) -> Result<()> {
        let entry = codec::encode_entry(project)?;
        self.location.set_fragment(&entry)
    }

    fn try_load(&self, id: &str) -> Result<Option<Project>> {
        let fragment = self.location.fragment()?;
        fragment
            .split(PAIR_SEPARATOR)
            .filter_map(codec::split_entry)
            .find(|(key, _)| codec::key_matches(key, id))
            .map(|(_, value)| codec::decode_project(value))
            .transpose()
    }

    /// Decodes the first pair containing `=`; anything after it is ignored.
    fn try_list(&self) -> Result<Vec<Project>> {
        let fragment = self.location.fragment()?;
        let first = fragment.split(PAIR_SEPARATOR).find_map(codec::split_entry);

        match first {
            Some((_, value)) => Ok(vec![codec::decode_project(value)?]),
            None => Ok(Vec::new()),
        }
    }
}

impl<L: Location> Backend for FragmentBackend<L> {
    fn name(&self) -> &str {
        "fragment"
    }

    fn save(&mut self, project: &Project) {
        let _span = tracing::debug_span!("fragment_save", project_id = %project.id).entered();
        let result = self.try_save(project);
        absorb(self.name(), "save", result, ());
    }

    fn load(&self, id: &str) -> Option<Project> {
        let _span = tracing::debug_span!("fragment_load", project_id = %id).entered();
        let project = absorb(self.name(), "load", self.try_load(id), None);

        tracing::debug!(found = project.is_some(), "fragment lookup complete");
        project
    }

    fn list_all(&self) -> Vec<Project> {
        let _span = tracing::debug_span!("fragment_list_all").entered();
        absorb(self.name(), "list_all", self.try_list(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::medium::MemoryLocation;

    fn sample(id: &str) -> Project {
        Project::new(id, "payload").with_version(Version::new(format!("{id}-hash"), 7))
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut backend = FragmentBackend::new(MemoryLocation::default());
        backend.save(&sample("alpha"));
        assert_eq!(backend.load("alpha"), Some(sample("alpha")));
    }

    #[test]
    fn second_save_evicts_first() {
        let mut backend = FragmentBackend::new(MemoryLocation::default());
        backend.save(&sample("p1"));
        backend.save(&sample("p2"));

        assert!(backend.load("p1").is_none());
        assert_eq!(backend.load("p2"), Some(sample("p2")));
        assert_eq!(backend.list_all(), vec![sample("p2")]);
    }

    #[test]
    fn save_keeps_the_rest_of_the_url() {
        let location = MemoryLocation::new("https://app.test/editor?mode=x#stale=1&other=2");
        let mut backend = FragmentBackend::new(location.clone());

        backend.save(&sample("alpha"));

        let href = location.href().unwrap();
        assert!(href.starts_with("https://app.test/editor?mode=x#alpha="));
        assert!(!href.contains('&'));
    }

    #[test]
    fn load_scans_all_pairs() {
        let value = codec::encode_project(&sample("second")).unwrap();
        let location = MemoryLocation::new(format!("https://a.test/#junk&first=%7B&second={value}"));
        let backend = FragmentBackend::new(location);

        assert_eq!(backend.load("second"), Some(sample("second")));
        assert!(backend.load("first").is_none());
    }

    #[test]
    fn list_uses_only_first_pair_with_equals() {
        let value = codec::encode_project(&sample("b")).unwrap();
        let other = codec::encode_project(&sample("c")).unwrap();
        let location = MemoryLocation::new(format!("https://a.test/#noequals&b={value}&c={other}"));
        let backend = FragmentBackend::new(location);

        assert_eq!(backend.list_all(), vec![sample("b")]);
    }

    #[test]
    fn empty_or_malformed_fragment_is_empty() {
        let backend = FragmentBackend::new(MemoryLocation::new("https://a.test/"));
        assert!(backend.load("x").is_none());
        assert!(backend.list_all().is_empty());

        let backend = FragmentBackend::new(MemoryLocation::new("https://a.test/#x=%ZZ"));
        assert!(backend.load("x").is_none());
        assert!(backend.list_all().is_empty());
    }

    #[test]
    fn disabled_location_fails_softly() {
        let mut backend = FragmentBackend::new(MemoryLocation::disabled());
        backend.save(&sample("alpha"));
        assert!(backend.load("alpha").is_none());
        assert!(backend.list_all().is_empty());
    }
}
