use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the compact stdout subscriber used by hosts of this crate.
///
/// `RUST_LOG` takes precedence over `default_level`. Returns `false` when a
/// global subscriber was already installed.
pub fn init_logging(default_level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .compact()
        .try_init()
        .is_ok()
}
