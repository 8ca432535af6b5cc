//! File-backed media.
//!
//! These let the storage layer run outside a browser: the cookie jar string or
//! the location href is kept in a small text file that survives restarts.
//! Writes go to a temporary file first and are then renamed over the target,
//! so a crash never leaves a half-written medium behind.
//!
//! A missing file is treated as an empty medium, not an error.

use crate::domain::error::{ProjstashError, Result};
use crate::medium::cookie_jar::{CookieJar, CookieStore};
use crate::medium::location::{with_fragment, Location};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Cookie jar persisted as a single jar string in a text file.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CookieJar for FileCookieJar {
    fn cookie_string(&self) -> Result<String> {
        Ok(read_or_empty(&self.path)?.unwrap_or_default())
    }

    fn set_cookie(&self, cookie: &str) -> Result<()> {
        let _guard = lock(&self.write_lock)?;

        let mut store = CookieStore::parse(&read_or_empty(&self.path)?.unwrap_or_default());
        store.apply(cookie)?;

        tracing::trace!(path = ?self.path, "writing cookie jar");
        write_atomic(&self.path, &store.to_cookie_string())
    }
}

/// Location persisted as an href in a text file.
///
/// Until the first write the location reports `default_href`.
#[derive(Debug)]
pub struct FileLocation {
    path: PathBuf,
    default_href: String,
    write_lock: Mutex<()>,
}

impl FileLocation {
    pub fn new(path: impl Into<PathBuf>, default_href: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_href: default_href.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Location for FileLocation {
    fn href(&self) -> Result<String> {
        Ok(read_or_empty(&self.path)?.unwrap_or_else(|| self.default_href.clone()))
    }

    fn set_fragment(&self, fragment: &str) -> Result<()> {
        let _guard = lock(&self.write_lock)?;

        let href = with_fragment(&self.href()?, fragment);
        tracing::trace!(path = ?self.path, "writing location");
        write_atomic(&self.path, &href)
    }
}

fn lock(mutex: &Mutex<()>) -> Result<std::sync::MutexGuard<'_, ()>> {
    mutex
        .lock()
        .map_err(|e| ProjstashError::MediumUnavailable(format!("medium lock poisoned: {e}")))
}

/// Reads the file with its trailing newline trimmed, `None` if it does not exist.
fn read_or_empty(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents.trim_end_matches(['\r', '\n']).to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ProjstashError::MediumUnavailable(format!(
            "cannot read {}: {e}",
            path.display()
        ))),
    }
}

/// Temporary sibling named after the full file name, so `state.jar` and
/// `state.url` never share one.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to `path` via a temporary sibling file and a rename.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
