use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// - `EnvFilter` for dynamic log levels (`RUST_LOG`).
/// - Compact human-readable output, or JSON lines when `LOG_FORMAT=json`.
///
/// Logs go to stderr so `run` and `actors` can print results on stdout.
pub fn init() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actor_console=debug"));

    let compact_layer = (!json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .compact()
    });
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(compact_layer)
        .with(json_layer)
        .init();
}
