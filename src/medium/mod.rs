//! Storage media consumed by the backends.
//!
//! The browser exposes its cookie jar and location as process-wide globals.
//! Here they are explicit, injectable resources: each backend is handed the
//! medium it works on and never reaches for anything ambient. That makes every
//! backend testable against an in-memory fake.
//!
//! # Modules
//!
//! - [`cookie_jar`]: `document.cookie`-style jar trait and in-memory jar
//! - [`location`]: URL/fragment trait and in-memory location
//! - [`file`]: file-backed jar and location with atomic writes

pub mod cookie_jar;
pub mod file;
pub mod location;

pub use cookie_jar::{CookieJar, MemoryCookieJar, MAX_COOKIE_BYTES};
pub use file::{FileCookieJar, FileLocation};
pub use location::{Location, MemoryLocation};
