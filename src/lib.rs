//! projstash: save, load, and list projects across interchangeable storage backends.
//!
//! A caller hands projects to a [`StorageModule`], which fans each operation
//! out over an ordered list of backends. Every backend wraps one storage
//! medium (a cookie jar, a URL fragment) behind the same three operations, so
//! the caller never needs to know which backend holds what.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs) / embedding UI                       │  ← Caller
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Aggregator (storage::StorageModule)                │  ← save to all
//! │                                                     │  ← fetch first hit
//! │                                                     │  ← list all, no dedup
//! └─────────────────────────────────────────────────────┘
//!         │                                   │
//! ┌───────────────────────┐       ┌───────────────────────┐
//! │ CookieBackend         │       │ FragmentBackend       │  ← Backend trait
//! └───────────────────────┘       └───────────────────────┘
//!         │                                   │
//! ┌───────────────────────┐       ┌───────────────────────┐
//! │ CookieJar (medium/)   │       │ Location (medium/)    │  ← Injected media
//! │ memory or file        │       │ memory or file        │
//! └───────────────────────┘       └───────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: `Project`, `Version`, error types
//! - [`medium`]: Cookie jar and location abstractions with memory and file implementations
//! - [`storage`]: Backend trait, reference backends, aggregator
//! - [`infrastructure`]: Data directory and path resolution
//! - [`observability`]: Tracing setup with file-based OTLP export
//!
//! # Failure Model
//!
//! Storage is best-effort. Backends swallow their own errors, log them, and
//! report an empty or absent result instead. Nothing returned by
//! [`StorageModule`] is a `Result`; "the data isn't there" is the only
//! visible failure mode.
//!
//! # Examples
//!
//! ```
//! use projstash::medium::{MemoryCookieJar, MemoryLocation};
//! use projstash::storage::{CookieBackend, FragmentBackend, StorageModule};
//! use projstash::{Project, Version};
//!
//! let mut storage = StorageModule::default()
//!     .with_backend(CookieBackend::new(MemoryCookieJar::new()))
//!     .with_backend(FragmentBackend::new(MemoryLocation::new("https://app.test/")));
//!
//! let project = Project::new("sketch", "{\"shapes\":[]}").with_version(Version::new("a1b2", 1));
//! storage.save_project(&project);
//!
//! assert_eq!(storage.fetch_project("sketch"), Some(project));
//! assert!(storage.fetch_project("missing").is_none());
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod domain;
pub mod infrastructure;
pub mod medium;
pub mod observability;
pub mod storage;

pub use domain::{Project, ProjstashError, Result, Version};
pub use storage::{Backend, StorageModule};

use medium::{FileCookieJar, FileLocation};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use storage::{CookieBackend, FragmentBackend};

const DEFAULT_COOKIE_FILE: &str = "cookies.txt";
const DEFAULT_LOCATION_FILE: &str = "location.txt";
const DEFAULT_BASE_URL: &str = "about:blank";

/// Kind of backend to build, in configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Cookie,
    Fragment,
}

impl FromStr for BackendKind {
    type Err = ProjstashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" | "cookies" => Ok(Self::Cookie),
            "fragment" | "url" | "hash" => Ok(Self::Fragment),
            other => Err(ProjstashError::Config(format!("unknown backend: {other}"))),
        }
    }
}

/// Storage configuration.
///
/// Can be built from a string map (as handed over by a host environment) or
/// from a TOML file.
///
/// # Example
///
/// ```toml
/// backends = ["cookie", "fragment"]
/// data_dir = "~/.local/share/projstash"
/// cookie_file = "cookies.txt"
/// location_file = "location.txt"
/// base_url = "https://app.example/editor"
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backends in fallback order. Default: `[Cookie, Fragment]`
    pub backends: Vec<BackendKind>,

    /// Directory holding the file media and the trace file.
    ///
    /// Default: `$PROJSTASH_DATA_DIR`, else `~/.local/share/projstash`
    pub data_dir: PathBuf,

    /// Cookie jar file, relative to `data_dir` unless absolute.
    pub cookie_file: String,

    /// Location file, relative to `data_dir` unless absolute.
    pub location_file: String,

    /// Href reported by the location before anything was saved to it.
    pub base_url: String,

    /// `tracing` filter directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backends: vec![BackendKind::Cookie, BackendKind::Fragment],
            data_dir: infrastructure::default_data_dir(),
            cookie_file: DEFAULT_COOKIE_FILE.to_string(),
            location_file: DEFAULT_LOCATION_FILE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            trace_level: None,
        }
    }
}

/// On-disk shape of the TOML configuration; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    backends: Option<Vec<String>>,
    data_dir: Option<String>,
    cookie_file: Option<String>,
    location_file: Option<String>,
    base_url: Option<String>,
    trace_level: Option<String>,
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `backends`: Comma-separated names; unknown names are skipped, and an
    ///   empty result falls back to the default order
    /// - `data_dir`: Path, `~` expanded
    /// - `cookie_file`, `location_file`, `base_url`, `trace_level`: Strings
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use projstash::{BackendKind, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("backends".to_string(), "fragment, cookie".to_string());
    /// map.insert("data_dir".to_string(), "/tmp/stash".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.backends, vec![BackendKind::Fragment, BackendKind::Cookie]);
    /// assert_eq!(config.data_dir, std::path::PathBuf::from("/tmp/stash"));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let file = ConfigFile {
            backends: map
                .get("backends")
                .map(|s| s.split(',').map(String::from).collect()),
            data_dir: map.get("data_dir").cloned(),
            cookie_file: map.get("cookie_file").cloned(),
            location_file: map.get("location_file").cloned(),
            base_url: map.get("base_url").cloned(),
            trace_level: map.get("trace_level").cloned(),
        };
        Self::from_parts(file)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ProjstashError::Config`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| ProjstashError::Config(format!("invalid TOML: {e}")))?;
        Ok(Self::from_parts(file))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ProjstashError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProjstashError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    fn from_parts(file: ConfigFile) -> Self {
        let defaults = Self::default();

        let backends = file
            .backends
            .map(|names| {
                names
                    .iter()
                    .map(|name| name.trim())
                    .filter(|name| !name.is_empty())
                    .filter_map(|name| {
                        name.parse::<BackendKind>()
                            .map_err(|e| tracing::debug!(error = %e, "skipping backend"))
                            .ok()
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|kinds| !kinds.is_empty())
            .unwrap_or(defaults.backends);

        Self {
            backends,
            data_dir: file
                .data_dir
                .map_or(defaults.data_dir, |dir| PathBuf::from(infrastructure::expand_tilde(&dir))),
            cookie_file: file.cookie_file.unwrap_or(defaults.cookie_file),
            location_file: file.location_file.unwrap_or(defaults.location_file),
            base_url: file.base_url.unwrap_or(defaults.base_url),
            trace_level: file.trace_level,
        }
    }

    /// Full path of the cookie jar file.
    #[must_use]
    pub fn cookie_path(&self) -> PathBuf {
        infrastructure::resolve_in(&self.data_dir, &self.cookie_file)
    }

    /// Full path of the location file.
    #[must_use]
    pub fn location_path(&self) -> PathBuf {
        infrastructure::resolve_in(&self.data_dir, &self.location_file)
    }
}

/// Builds a [`StorageModule`] over file-backed media.
///
/// Creates the data directory, then one backend per configured kind, in
/// configured order.
///
/// # Errors
///
/// Returns [`ProjstashError::Io`] if the data directory cannot be created.
///
/// # Example
///
/// ```rust
/// use projstash::{initialize, Config, Project};
///
/// let dir = std::env::temp_dir().join("projstash-doc-initialize");
/// let config = Config { data_dir: dir.clone(), ..Default::default() };
///
/// let mut storage = initialize(&config)?;
/// storage.save_project(&Project::new("demo", "payload"));
/// assert!(storage.fetch_project("demo").is_some());
/// # std::fs::remove_dir_all(dir).ok();
/// # Ok::<(), projstash::ProjstashError>(())
/// ```
pub fn initialize(config: &Config) -> Result<StorageModule> {
    let _span = tracing::debug_span!("initialize", data_dir = ?config.data_dir).entered();

    std::fs::create_dir_all(&config.data_dir)?;

    let storage = config
        .backends
        .iter()
        .fold(StorageModule::default(), |storage, kind| match kind {
            BackendKind::Cookie => {
                storage.with_backend(CookieBackend::new(FileCookieJar::new(config.cookie_path())))
            }
            BackendKind::Fragment => storage.with_backend(FragmentBackend::new(FileLocation::new(
                config.location_path(),
                config.base_url.clone(),
            ))),
        });

    tracing::debug!(backends = ?storage.backend_names(), "storage initialized");
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_with_only_unknown_backends_uses_default_order() {
        let mut map = BTreeMap::new();
        map.insert("backends".to_string(), "floppy, ,tape".to_string());

        let config = Config::from_map(&map);
        assert_eq!(config.backends, vec![BackendKind::Cookie, BackendKind::Fragment]);
    }

    #[test]
    fn unknown_backends_are_skipped() {
        let mut map = BTreeMap::new();
        map.insert("backends".to_string(), "floppy,url".to_string());
        assert_eq!(Config::from_map(&map).backends, vec![BackendKind::Fragment]);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            backends = ["fragment"]
            data_dir = "/var/stash"
            cookie_file = "/elsewhere/jar"
            base_url = "https://app.test/"
            trace_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.backends, vec![BackendKind::Fragment]);
        assert_eq!(config.cookie_path(), PathBuf::from("/elsewhere/jar"));
        assert_eq!(config.location_path(), PathBuf::from("/var/stash/location.txt"));
        assert_eq!(config.base_url, "https://app.test/");
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = Config::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ProjstashError::Config(_)));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ProjstashError::Config(_)));
    }

    #[test]
    fn initialize_builds_backends_in_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            backends: vec![BackendKind::Fragment, BackendKind::Cookie],
            data_dir: dir.path().join("data"),
            ..Default::default()
        };

        let storage = initialize(&config).unwrap();

        assert_eq!(storage.backend_names(), vec!["fragment", "cookie"]);
        assert!(config.data_dir.is_dir());
    }
}
