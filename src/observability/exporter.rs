//! Span exporter writing OTLP JSON lines to a size-rotated file.

use super::otlp;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Size at which the trace file is rotated (10 MiB).
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated files kept next to the live one.
const KEEP_ROTATED: usize = 3;

/// Append-only line writer that rotates by size.
///
/// A full file is renamed to `<name>.<unix-millis>` and a fresh one is
/// started. Only the newest [`KEEP_ROTATED`] rotated files are kept.
#[derive(Debug)]
struct RotatingFile {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl RotatingFile {
    const fn new(path: PathBuf) -> Self {
        Self {
            path,
            handle: Mutex::new(None),
        }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("lock poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > ROTATE_AT_BYTES) {
            *handle = None;
            self.rotate()?;
        }

        let file = match handle.take() {
            Some(file) => file,
            None => OpenOptions::new().create(true).append(true).open(&self.path)?,
        };
        let file = handle.insert(file);

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn rotate(&self) -> std::io::Result<()> {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("trace")
            .to_string();

        if self.path.exists() {
            fs::rename(&self.path, self.free_rotated_path(&file_name))?;
        }

        if let Some(dir) = self.path.parent() {
            prune_rotated(dir, &file_name);
        }
        Ok(())
    }

    /// Returns `<name>.<unix-millis>`, bumping the stamp past any existing backup.
    fn free_rotated_path(&self, file_name: &str) -> PathBuf {
        let mut stamp = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        loop {
            let candidate = self.path.with_file_name(format!("{file_name}.{stamp}"));
            if !candidate.exists() {
                return candidate;
            }
            stamp = stamp.saturating_add(1);
        }
    }
}

/// Deletes all but the newest rotated copies of `file_name` in `dir`.
fn prune_rotated(dir: &Path, file_name: &str) {
    let prefix = format!("{file_name}.");
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut rotated: Vec<(u64, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let stamp = name.strip_prefix(&prefix)?.parse::<u64>().ok()?;
            Some((stamp, entry.path()))
        })
        .collect();

    rotated.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, stale) in rotated.into_iter().skip(KEEP_ROTATED) {
        let _ = fs::remove_file(stale);
    }
}

/// OpenTelemetry exporter that appends each batch as one OTLP JSON line.
#[derive(Debug)]
struct OtlpFileExporter {
    file: RotatingFile,
    resource: Resource,
    shut_down: bool,
}

impl SpanExporter for OtlpFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.shut_down {
            Err(TraceError::from("exporter is shut down"))
        } else {
            let line = otlp::batch_to_json(&self.resource, &batch).to_string();
            self.file
                .append_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Builds a tracer provider that exports every finished span to `path`.
pub fn tracer_provider(path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = OtlpFileExporter {
        file: RotatingFile::new(path),
        resource: resource.clone(),
        shut_down: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
