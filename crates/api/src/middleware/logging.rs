//! Tracing subscriber setup for the report service.
//!
//! Shared by the API server and the batch sync CLI so log output from both
//! lands in the same shape.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Default directives for the configured level.
///
/// sqlx logs every statement at INFO, which would drown report queries and
/// sync batches, so it is capped at WARN unless RUST_LOG overrides it.
fn base_filter(level: &str) -> String {
    format!("{level},sqlx::query=warn")
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. The `json` format is
/// meant for production log shipping; anything else gets a compact
/// human-readable format for local runs.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(base_filter(&config.level)));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let json_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            subscriber.with(json_layer).init();
        }
        _ => {
            let compact_layer = fmt::layer()
                .compact()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true);
            subscriber.with(compact_layer).init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_filter_caps_sqlx_statement_logging() {
        assert_eq!(base_filter("info"), "info,sqlx::query=warn");
        assert_eq!(base_filter("debug"), "debug,sqlx::query=warn");
    }
}
