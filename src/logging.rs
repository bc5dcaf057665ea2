use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr so stdout stays reserved for CSV output. `RUST_LOG`
/// overrides the level, otherwise `debug` when `verbose` is set and `info`
/// when it isn't.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
