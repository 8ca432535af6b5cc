//! Storage layer: backends and the aggregator that combines them.
//!
//! This module provides the [`Backend`] contract, the two reference backends,
//! and [`StorageModule`], which fans operations out over an ordered list of
//! backends.
//!
//! # Modules
//!
//! - `backend`: Backend trait and the soft-failure helper
//! - `codec`: Percent-encoded JSON entries shared by the backends
//! - `cookie`: One cookie per project
//! - `fragment`: Single project in the URL fragment
//! - `aggregator`: Broadcast save, fallback fetch, merged list

pub mod aggregator;
pub mod backend;
pub mod codec;
pub mod cookie;
pub mod fragment;

pub use aggregator::{dedup_by_id, StorageModule};
pub use backend::Backend;
pub use cookie::CookieBackend;
pub use fragment::FragmentBackend;
