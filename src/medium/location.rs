//! Location medium.
//!
//! A [`Location`] models the browser's current URL. Only the fragment (the text
//! after `#`) is used for storage; the rest of the href is preserved across
//! writes.

use crate::domain::error::{ProjstashError, Result};
use std::sync::{Arc, Mutex};

/// A URL whose fragment can be read and replaced.
pub trait Location: Send {
    /// Returns the full URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProjstashError::MediumUnavailable`] if the location cannot be read.
    fn href(&self) -> Result<String>;

    /// Replaces the fragment, keeping the rest of the URL.
    ///
    /// `fragment` is given without the leading `#`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written.
    fn set_fragment(&self, fragment: &str) -> Result<()>;

    /// Returns the fragment without the leading `#`, or an empty string.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Location::href`].
    fn fragment(&self) -> Result<String> {
        Ok(fragment_of(&self.href()?).to_string())
    }
}

/// Returns the part of `href` after the first `#`.
#[must_use]
pub fn fragment_of(href: &str) -> &str {
    href.split_once('#').map_or("", |(_, fragment)| fragment)
}

/// Returns `href` with its fragment replaced. An empty fragment drops the `#`.
#[must_use]
pub fn with_fragment(href: &str, fragment: &str) -> String {
    let base = href.split_once('#').map_or(href, |(base, _)| base);
    if fragment.is_empty() {
        base.to_string()
    } else {
        format!("{base}#{fragment}")
    }
}

/// In-process location. Clones share the same URL.
///
/// # Examples
///
/// ```
/// use projstash::medium::{Location, MemoryLocation};
///
/// let location = MemoryLocation::new("https://example.test/app#old");
/// location.set_fragment("new").unwrap();
/// assert_eq!(location.href().unwrap(), "https://example.test/app#new");
/// assert_eq!(location.fragment().unwrap(), "new");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    href: Arc<Mutex<String>>,
    disabled: bool,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Arc::new(Mutex::new(href.into())),
            disabled: false,
        }
    }

    /// Creates a location that fails every access.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            href: Arc::default(),
            disabled: true,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, String>> {
        if self.disabled {
            return Err(ProjstashError::MediumUnavailable("location is disabled".to_string()));
        }
        self.href
            .lock()
            .map_err(|e| ProjstashError::MediumUnavailable(format!("location lock poisoned: {e}")))
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> Result<String> {
        Ok(self.lock()?.clone())
    }

    fn set_fragment(&self, fragment: &str) -> Result<()> {
        let mut href = self.lock()?;
        *href = with_fragment(&href, fragment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_of_handles_missing_hash() {
        assert_eq!(fragment_of("https://a.test/"), "");
        assert_eq!(fragment_of("https://a.test/#"), "");
        assert_eq!(fragment_of("https://a.test/#x=1&y=2"), "x=1&y=2");
    }

    #[test]
    fn with_fragment_replaces_only_the_fragment() {
        assert_eq!(with_fragment("https://a.test/p?q=1#old", "new"), "https://a.test/p?q=1#new");
        assert_eq!(with_fragment("https://a.test/p", "new"), "https://a.test/p#new");
        assert_eq!(with_fragment("https://a.test/p#old", ""), "https://a.test/p");
    }

    #[test]
    fn disabled_location_reports_unavailable() {
        let location = MemoryLocation::disabled();
        assert!(matches!(
            location.fragment(),
            Err(ProjstashError::MediumUnavailable(_))
        ));
        assert!(location.set_fragment("a=b").is_err());
    }

    #[test]
    fn default_location_has_empty_fragment() {
        assert_eq!(MemoryLocation::default().fragment().unwrap(), "");
    }
}
