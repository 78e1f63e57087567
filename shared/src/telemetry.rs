use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// RAII guard that flushes and shuts down the OpenTelemetry tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<opentelemetry_sdk::trace::SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown tracer provider: {e}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Logging/tracing settings, normally read from the environment.
#[derive(Debug, Clone)]
struct TelemetryConfig {
    service_name: String,
    log_format: LogFormat,
    otlp_endpoint: Option<String>,
}

impl TelemetryConfig {
    /// Reads `LOG_FORMAT` and `OTEL_EXPORTER_OTLP_ENDPOINT`.
    fn from_env(service_name: &str) -> Self {
        let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
        let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty());

        Self {
            service_name: service_name.to_owned(),
            log_format: LogFormat::parse(&log_format),
            otlp_endpoint,
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` drives filtering (defaults to `info`). Log lines are plain text
/// unless `LOG_FORMAT=json`. Spans are exported over OTLP/HTTP only when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(service_name: &str) -> TelemetryGuard {
    init_with(TelemetryConfig::from_env(service_name))
}

fn init_with(config: TelemetryConfig) -> TelemetryGuard {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    let registry = Registry::default().with(env_filter).with(fmt_layer);

    match config.otlp_endpoint.as_deref() {
        Some(endpoint) => match build_otel_layer(&config.service_name, endpoint) {
            Ok((otel_layer, provider)) => {
                registry.with(otel_layer).init();
                TelemetryGuard {
                    provider: Some(provider),
                }
            }
            Err(e) => {
                registry.init();
                tracing::warn!(error = %e, "OTLP exporter unavailable, continuing with local logs only");
                TelemetryGuard { provider: None }
            }
        },
        None => {
            registry.init();
            TelemetryGuard { provider: None }
        }
    }
}

type OtelLayer<S> = tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>;

fn build_otel_layer<S>(
    service_name: &str,
    endpoint: &str,
) -> Result<(OtelLayer<S>, opentelemetry_sdk::trace::SdkTracerProvider), opentelemetry_otlp::ExporterBuildError>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()?;

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_service_name(service_name.to_owned())
                .build(),
        )
        .build();

    let tracer = provider.tracer(service_name.to_owned());
    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok((tracing_opentelemetry::layer().with_tracer(tracer), provider))
}
