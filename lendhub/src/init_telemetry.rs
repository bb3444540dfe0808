use anyhow::Result;
use init_tracing_opentelemetry::tracing_subscriber_ext::build_logger_text;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::Tracer;
use tracing::{info, Subscriber};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, Layer};
use tracing_subscriber::{registry, EnvFilter};

pub fn build_otel_layer<S>() -> Result<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use init_tracing_opentelemetry::{init_propagator, otlp, resource::DetectResource};
    use opentelemetry::global;
    let otel_rsrc = DetectResource::default()
        .with_fallback_service_name(env!("CARGO_PKG_NAME"))
        .with_fallback_service_version(env!("CARGO_PKG_VERSION"))
        .build();
    let tracerprovider = otlp::traces::init_tracerprovider(otel_rsrc, otlp::traces::identity)?;
    init_propagator()?;
    let layer = tracing_opentelemetry::layer()
        .with_error_records_to_exceptions(true)
        .with_tracer(tracerprovider.tracer(""));
    global::set_tracer_provider(tracerprovider);
    Ok(layer)
}

pub fn build_reduced_logger_text<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if cfg!(debug_assertions) {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_thread_names(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
                .event_format(tracing_subscriber::fmt::format().compact()),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true),
        )
    }
}

pub fn build_loglevel_filter_layer() -> tracing_subscriber::filter::EnvFilter {
    std::env::set_var(
        "RUST_LOG",
        format!(
            // `otel::tracing` should be a level info to emit opentelemetry trace & span
            // Filter out verbose HTTP request details from axum tracing
            "{},otel::tracing=trace,otel=debug,axum_tracing_opentelemetry=error",
            std::env::var("RUST_LOG")
                .or_else(|_| std::env::var("OTEL_LOG_LEVEL"))
                .unwrap_or_else(|_| "warn".to_string())
        ),
    );
    EnvFilter::from_default_env()
}

pub fn init_telemetry_and_tracing(settings: &Option<String>) -> Result<()> {
    // temporary subscriber to log output during setup
    let subscriber = registry()
        .with(build_loglevel_filter_layer())
        .with(build_logger_text());
    let _guard = tracing::subscriber::set_default(subscriber);
    info!("init logging & tracing");

    let mut tracing_enabled = false;

    if let Some(settings) = settings {
        let splitted = settings.to_lowercase();
        let splitted: Vec<&str> = splitted.split(',').collect();

        tracing_enabled = splitted.contains(&"traces");
    }

    match tracing_enabled {
        true => {
            let subscriber = tracing_subscriber::registry()
                .with(build_otel_layer()?)
                .with(build_loglevel_filter_layer())
                .with(build_reduced_logger_text());
            tracing::subscriber::set_global_default(subscriber)?;

            Ok(())
        }
        false => {
            let subscriber = registry()
                .with(build_loglevel_filter_layer())
                .with(build_reduced_logger_text());
            tracing::subscriber::set_global_default(subscriber)?;

            Ok(())
        }
    }
}
