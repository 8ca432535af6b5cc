//! Subscriber initialization.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace output inside the data directory.
pub const TRACE_FILE_NAME: &str = "projstash-otlp.json";

const SERVICE_NAME: &str = "projstash";

/// Installs the global tracing subscriber.
///
/// Does nothing if the data directory cannot be created: tracing is optional
/// and storage must keep working without it. Calling it again after a
/// subscriber is installed is a no-op.
///
/// # Example
///
/// ```rust
/// use projstash::observability::init_tracing;
/// use projstash::Config;
///
/// let config = Config {
///     data_dir: std::env::temp_dir().join("projstash-doc-tracing"),
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = exporter::tracer_provider(config.data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
