//! Tracing setup with OTLP JSON export to a local file.
//!
//! Backends report their soft failures through `tracing`. This module wires
//! those spans and events into OpenTelemetry and writes them as OTLP JSON
//! lines to `projstash-otlp.json` in the data directory, so failed saves can
//! be diagnosed after the fact without any collector running.
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk → OtlpFileExporter → rotating file
//! ```
//!
//! The filter comes from `Config::trace_level` (default `"info"`).
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `exporter`: Span exporter and size-rotated file
//! - `otlp`: Span to OTLP JSON conversion

mod exporter;
mod init;
mod otlp;

pub use init::{init_tracing, TRACE_FILE_NAME};
