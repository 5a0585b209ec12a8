#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the school API, including the `/api` prefix.
    pub api_base_url: String,

    /// SQLite connection string for the durable session copy.
    ///
    /// `mode=rwc` so a first run creates the file next to wherever the
    /// CLI is invoked from; point CAMPUS_SESSION_DB somewhere stable for
    /// a real install.
    pub session_db_url: String,

    /// Per-request timeout in milliseconds.
    ///
    /// Requests run to completion or to this bound; the CLI performs no
    /// automatic retry.
    pub request_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("CAMPUS_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());

        let session_db_url = std::env::var("CAMPUS_SESSION_DB")
            .unwrap_or_else(|_| "sqlite://campus_session.db?mode=rwc".to_string());

        let request_timeout_ms = std::env::var("CAMPUS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Self {
            api_base_url,
            session_db_url,
            request_timeout_ms,
        }
    }
}
