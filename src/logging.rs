use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "TRAYTODO_LOG";

fn default_directives(verbose: bool) -> &'static str {
    if verbose { "traytodo=debug,warn" } else { "warn" }
}

/// Install the stderr subscriber. `TRAYTODO_LOG` wins over `verbose`.
/// Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
