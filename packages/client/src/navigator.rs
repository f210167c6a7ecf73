//! Client-side navigation hook.

/// Performs client-side navigation, e.g. to the sign-in page after the
/// session could not be refreshed.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator for hosts without a page router: records the navigation in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(path, "navigating");
    }
}
