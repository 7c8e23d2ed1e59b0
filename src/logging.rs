use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "info,credential_schema=debug";

/// Initialize tracing with stdout and Sentry layers.
///
/// - Stdout: compact human-readable output, or one JSON object per line
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs
/// - Default level: INFO (DEBUG for this crate), override via RUST_LOG env
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (compact_layer, json_layer) = match format {
        LogFormat::Compact => (
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_current_span(false))),
    };

    // Routes existing tracing::error!/warn! calls to Sentry automatically.
    // No-op when Sentry DSN is not configured.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(compact_layer)
        .with(json_layer)
        .with(sentry_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(?format, "Tracing initialized");
    }
}
