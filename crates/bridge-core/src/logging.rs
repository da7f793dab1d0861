use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `default_directive` when set. Returns `false` if a
/// global subscriber was already installed, which makes repeated calls
/// harmless.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
