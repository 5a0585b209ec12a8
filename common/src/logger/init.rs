use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber. Safe to call more than once;
/// only the first call wins.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        // Quiet sqlx by default; RUST_LOG still overrides everything.
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .init();

        tracing::debug!(service = service_name, "logger initialized");
    });
}
