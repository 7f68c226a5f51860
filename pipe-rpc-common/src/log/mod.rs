use std::io;

use tracing_subscriber::EnvFilter;

// filter directive for the process-wide subscriber, e.g. PIPE_RPC_LOG=debug
pub const LOG_ENV: &str = "PIPE_RPC_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs the fmt subscriber on stderr so stdout only carries program output.
///
/// Safe to call more than once, later calls keep the first subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn test_init_twice() {
        init();
        init();

        tracing::debug!("subscriber installed");
    }
}
