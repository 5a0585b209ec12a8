/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// The channel through which request failures become visible to the user.
/// A graphical front-end pops toasts here; the CLI routes notices into the
/// log stream.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that forwards notices to the tracing pipeline.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!(target: "notice", "{message}"),
            NoticeLevel::Warning => tracing::warn!(target: "notice", "{message}"),
            NoticeLevel::Error => tracing::error!(target: "notice", "{message}"),
        }
    }
}
