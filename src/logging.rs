use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber for standalone use of the harvester.
///
/// Host processes that already carry their own `tracing` subscriber should
/// skip this and let the harvester's spans flow into theirs.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    // try_init so a second call (or a host-installed subscriber) is not fatal
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
