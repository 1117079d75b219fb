//! Logging setup for the rock/paper/scissors server and its tools.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive: `default_log_level` for every listed target.
///
/// Target names are crate names, so dashes are normalised to underscores.
pub fn default_filter(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level applies to every crate in `targets` (e.g. the library crate and the binary).
/// `RUST_LOG` takes precedence when set.
///
/// # Examples
///
/// ```no_run
/// use rps_shared::logger::setup_logger;
///
/// setup_logger(&["rps_server", "rps-server"], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Like [`setup_logger`], but tolerates an already-installed global subscriber.
///
/// Integration tests start several servers in one process; only the first call installs.
pub fn try_setup_test_logger(targets: &[&str], default_log_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
