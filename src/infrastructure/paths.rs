//! Path utilities for locating file-backed media and trace output.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PROJSTASH_DATA_DIR";

/// Returns the default data directory.
///
/// Resolution order:
/// 1. `$PROJSTASH_DATA_DIR`
/// 2. `$HOME/.local/share/projstash`
/// 3. `.projstash` relative to the working directory
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map_or_else(
            || PathBuf::from(".projstash"),
            |home| PathBuf::from(home).join(".local").join("share").join("projstash"),
        )
}

/// Expands a leading `~` to `$HOME`. Paths without one are returned unchanged.
///
/// # Examples
///
/// ```
/// use projstash::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative"), "relative");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, std::env::var("HOME").ok().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string(),
        Some(home) if path.starts_with("~/") => path.replacen('~', home, 1),
        _ => path.to_string(),
    }
}

/// Resolves `path` against `base` after tilde expansion. Absolute paths win.
#[must_use]
pub fn resolve_in(base: &Path, path: &str) -> PathBuf {
    let expanded = PathBuf::from(expand_tilde(path));
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
