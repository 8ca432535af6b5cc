//! Cookie jar medium.
//!
//! A [`CookieJar`] exposes the same two-sided surface as `document.cookie`:
//! reading returns every cookie as `name=value` pairs joined by `"; "`, and
//! writing takes a single `name=value[; attribute...]` string that adds or
//! replaces one cookie.

use crate::domain::error::{ProjstashError, Result};
use std::sync::{Arc, Mutex};

/// Maximum size of a single cookie's `name=value`, matching common browser limits.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Separator between cookies in the jar string.
pub const COOKIE_SEPARATOR: &str = "; ";

/// A cookie storage medium.
///
/// Implementations must treat `set_cookie` as a single atomic read-modify-write
/// of the jar so concurrent readers never observe a half-applied update.
pub trait CookieJar: Send {
    /// Returns all cookies as `name=value` pairs joined by `"; "`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjstashError::MediumUnavailable`] if the jar cannot be read.
    fn cookie_string(&self) -> Result<String>;

    /// Adds or replaces one cookie.
    ///
    /// Attributes after the first `;` are ignored except `Max-Age`, where a
    /// value of zero or less deletes the cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the jar is unavailable, the cookie has no `=`, or
    /// the cookie exceeds [`MAX_COOKIE_BYTES`].
    fn set_cookie(&self, cookie: &str) -> Result<()>;
}

/// Ordered cookie list shared by the jar implementations.
///
/// New cookies are appended; replacing an existing name keeps its position,
/// which is how browsers order `document.cookie`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CookieStore {
    entries: Vec<(String, String)>,
}

impl CookieStore {
    /// Parses a jar string. Segments without `=` are kept with an empty name,
    /// the way browsers expose nameless cookies.
    pub(crate) fn parse(raw: &str) -> Self {
        let entries = raw
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (String::new(), segment.to_string()),
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn apply(&mut self, cookie: &str) -> Result<()> {
        let mut parts = cookie.split(';');
        let pair = parts.next().unwrap_or_default().trim();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| ProjstashError::Decode(format!("cookie has no '=': {pair}")))?;

        if pair.len() > MAX_COOKIE_BYTES {
            return Err(ProjstashError::MediumRejected(format!(
                "cookie '{name}' is {} bytes, limit is {MAX_COOKIE_BYTES}",
                pair.len()
            )));
        }

        let expired = parts.filter_map(|attr| attr.trim().split_once('=')).any(|(key, val)| {
            key.trim().eq_ignore_ascii_case("max-age")
                && val.trim().parse::<i64>().is_ok_and(|age| age <= 0)
        });

        let existing = self.entries.iter().position(|(n, _)| n == name);
        match (existing, expired) {
            (Some(index), true) => {
                self.entries.remove(index);
            }
            (None, true) => {}
            (Some(index), false) => self.entries[index].1 = value.to_string(),
            (None, false) => self.entries.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub(crate) fn to_cookie_string(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| {
                if name.is_empty() {
                    value.clone()
                } else {
                    format!("{name}={value}")
                }
            })
            .collect::<Vec<_>>()
            .join(COOKIE_SEPARATOR)
    }
}

/// In-process cookie jar.
///
/// Clones share the same underlying jar, so a test (or a UI layer) can hold one
/// handle while a backend owns another.
///
/// # Examples
///
/// ```
/// use projstash::medium::{CookieJar, MemoryCookieJar};
///
/// let jar = MemoryCookieJar::new();
/// jar.set_cookie("theme=dark").unwrap();
/// jar.set_cookie("lang=en; path=/").unwrap();
/// assert_eq!(jar.cookie_string().unwrap(), "theme=dark; lang=en");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    store: Arc<Mutex<CookieStore>>,
    disabled: bool,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jar pre-populated from a raw jar string, bypassing size checks.
    #[must_use]
    pub fn from_cookie_string(raw: &str) -> Self {
        Self {
            store: Arc::new(Mutex::new(CookieStore::parse(raw))),
            disabled: false,
        }
    }

    /// Creates a jar that fails every access, as if cookies were disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            store: Arc::default(),
            disabled: true,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CookieStore>> {
        if self.disabled {
            return Err(ProjstashError::MediumUnavailable("cookie jar is disabled".to_string()));
        }
        self.store
            .lock()
            .map_err(|e| ProjstashError::MediumUnavailable(format!("cookie jar lock poisoned: {e}")))
    }
}

impl CookieJar for MemoryCookieJar {
    fn cookie_string(&self) -> Result<String> {
        Ok(self.lock()?.to_cookie_string())
    }

    fn set_cookie(&self, cookie: &str) -> Result<()> {
        self.lock()?.apply(cookie)
    }
}
