use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "crud_sqlgen=warn";
const VERBOSE_FILTER: &str = "crud_sqlgen=debug";

/// Install the global fmt subscriber on stderr. `RUST_LOG` wins over
/// `verbose` when set. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}
