use projstash::medium::{CookieJar, Location, MemoryCookieJar, MemoryLocation, MAX_COOKIE_BYTES};
use projstash::storage::{dedup_by_id, Backend, CookieBackend, FragmentBackend, StorageModule};
use projstash::{Project, Version};

fn project(id: &str, data: &str) -> Project {
    Project::new(id, data)
        .with_version(Version::new(format!("{id}-1"), 100))
        .with_version(Version::new(format!("{id}-2"), 200))
}

fn cookie_and_fragment() -> (StorageModule, MemoryCookieJar, MemoryLocation) {
    let jar = MemoryCookieJar::new();
    let location = MemoryLocation::new("https://app.test/editor");
    let storage = StorageModule::default()
        .with_backend(CookieBackend::new(jar.clone()))
        .with_backend(FragmentBackend::new(location.clone()));
    (storage, jar, location)
}

#[test]
fn round_trip_through_each_backend() {
    let original = project("alpha", "{\"nested\": \"json; with=delims&more\"}");

    let mut cookie = CookieBackend::new(MemoryCookieJar::new());
    cookie.save(&original);
    assert_eq!(cookie.load("alpha"), Some(original.clone()));

    let mut fragment = FragmentBackend::new(MemoryLocation::default());
    fragment.save(&original);
    assert_eq!(fragment.load("alpha"), Some(original));
}

#[test]
fn fetch_prefers_earlier_backend() {
    let mut first = CookieBackend::new(MemoryCookieJar::new());
    let mut second = FragmentBackend::new(MemoryLocation::default());
    first.save(&project("shared", "from cookie"));
    second.save(&project("shared", "from fragment"));

    let storage = StorageModule::default().with_backend(first).with_backend(second);

    assert_eq!(storage.fetch_project("shared").map(|p| p.data), Some("from cookie".to_string()));
}

#[test]
fn fetch_falls_back_to_later_backend() {
    let mut second = FragmentBackend::new(MemoryLocation::default());
    second.save(&project("only-here", "fragment copy"));

    let storage = StorageModule::default()
        .with_backend(CookieBackend::new(MemoryCookieJar::new()))
        .with_backend(second);

    assert_eq!(storage.fetch_project("only-here"), Some(project("only-here", "fragment copy")));
}

#[test]
fn list_does_not_deduplicate() {
    let (mut storage, _, _) = cookie_and_fragment();
    storage.save_project(&project("dup", "x"));

    let listed = storage.list_projects();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p.id == "dup"));
    assert_eq!(dedup_by_id(listed).len(), 1);
}

#[test]
fn list_concatenates_in_backend_order() {
    let (mut storage, _, _) = cookie_and_fragment();
    storage.save_project(&project("a", "1"));
    storage.save_project(&project("b", "2"));

    let ids: Vec<String> = storage.list_projects().into_iter().map(|p| p.id).collect();
    // Cookies keep both; the fragment only holds the last save.
    assert_eq!(ids, vec!["a", "b", "b"]);
}

#[test]
fn absent_id_for_every_configuration() {
    assert!(StorageModule::default().fetch_project("nonexistent").is_none());

    let (mut storage, _, _) = cookie_and_fragment();
    assert!(storage.fetch_project("nonexistent").is_none());

    storage.save_project(&project("present", "x"));
    assert!(storage.fetch_project("nonexistent").is_none());
}

#[test]
fn fragment_holds_a_single_project() {
    let (mut storage, jar, location) = cookie_and_fragment();
    storage.save_project(&project("p1", "first"));
    storage.save_project(&project("p2", "second"));

    let fragment = FragmentBackend::new(location);
    assert!(fragment.load("p1").is_none());
    assert_eq!(fragment.load("p2"), Some(project("p2", "second")));

    // The cookie backend still has both, so the aggregator finds p1 there.
    assert!(jar.cookie_string().unwrap().contains("p1="));
    assert_eq!(storage.fetch_project("p1"), Some(project("p1", "first")));
}

#[test]
fn malformed_medium_does_not_hide_other_backends() {
    let jar = MemoryCookieJar::from_cookie_string("tracking=not-json");
    let mut fragment = FragmentBackend::new(MemoryLocation::default());
    fragment.save(&project("good", "x"));

    let storage = StorageModule::default()
        .with_backend(CookieBackend::new(jar))
        .with_backend(fragment);

    assert_eq!(storage.list_projects(), vec![project("good", "x")]);
}

#[test]
fn failed_save_does_not_stop_later_backends() {
    let location = MemoryLocation::default();
    let mut storage = StorageModule::default()
        .with_backend(CookieBackend::new(MemoryCookieJar::disabled()))
        .with_backend(FragmentBackend::new(location.clone()));

    storage.save_project(&project("resilient", "x"));

    assert!(location.fragment().unwrap().starts_with("resilient="));
    assert_eq!(storage.fetch_project("resilient"), Some(project("resilient", "x")));
}

#[test]
fn oversized_project_lands_only_where_it_fits() {
    let (mut storage, jar, _) = cookie_and_fragment();
    let big = Project::new("big", "y".repeat(MAX_COOKIE_BYTES));

    storage.save_project(&big);

    assert_eq!(jar.cookie_string().unwrap(), "");
    assert_eq!(storage.fetch_project("big"), Some(big));
}

#[test]
fn saving_same_id_overwrites_each_backend() {
    let (mut storage, _, _) = cookie_and_fragment();
    storage.save_project(&project("doc", "v1"));
    storage.save_project(&project("doc", "v2"));

    let listed = storage.list_projects();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p.data == "v2"));
}
