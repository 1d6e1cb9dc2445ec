//! Logging and optional OpenTelemetry trace export.
use miette::{IntoDiagnostic, WrapErr};
use opentelemetry::InstrumentationScope;
use opentelemetry::trace::TracerProvider;
use opentelemetry_resource_detectors::{HostResourceDetector, OsResourceDetector};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::resource::{EnvResourceDetector, ResourceDetector};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, TracingConfig};

/// The filter used when `RUST_LOG` isn't set.
const DEFAULT_FILTER: &str = "ordkort=info,cooljugator=info";

/// Returns a list of resource detectors to use to enrich OTel attributes.
fn otel_resource_detectors() -> Vec<Box<dyn ResourceDetector>> {
    vec![
        Box::new(EnvResourceDetector::default()),
        Box::new(OsResourceDetector),
        Box::new(HostResourceDetector::default()),
    ]
}

/// Builds a tracer provider that batches spans to the OTLP HTTP endpoint configured through the
/// standard `OTEL_EXPORTER_OTLP_*` environment variables.
fn otlp_provider() -> miette::Result<SdkTracerProvider> {
    let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .build()
        .into_diagnostic()
        .wrap_err("building otlp http exporter failed")?;
    let res_detectors = otel_resource_detectors();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(otlp_exporter)
        .with_resource(
            Resource::builder_empty()
                .with_service_name(env!("CARGO_PKG_NAME"))
                .with_detectors(&res_detectors)
                .build(),
        )
        .build())
}

/// Installs the global subscriber: an env filter, a stdout layer in the configured format and,
/// if enabled, an OTLP export layer.
///
/// Returns the tracer provider when OTLP export is enabled so it can be flushed with
/// [`shutdown`] before exiting.
///
/// # Errors
///
/// Returns an error if the exporter can't be built or a global subscriber is already set.
pub fn try_init(tracing: &TracingConfig) -> miette::Result<Option<SdkTracerProvider>> {
    let provider = if tracing.enabled {
        Some(otlp_provider()?)
    } else {
        None
    };

    let telemetry_layer = provider.as_ref().map(|provider| {
        let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schema_url("https://opentelemetry.io/schema/1.0.0")
            .build();
        let tracer = provider.tracer_with_scope(scope);

        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    let stdout_layer = match tracing.format {
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(telemetry_layer)
        .with(stdout_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    debug!(format = %tracing.format, otlp = tracing.enabled, "tracing initialized");

    Ok(provider)
}

/// Flushes and shuts down the tracer provider, if any.
pub fn shutdown(provider: Option<SdkTracerProvider>) {
    let Some(provider) = provider else {
        return;
    };

    if let Err(err) = provider.shutdown() {
        warn!(%err, "could not shut down tracer provider");
    }
}
