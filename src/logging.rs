use std::fmt;

/// Logging handle scoped to one reconciliation run.
///
/// Every record carries the `workspace_id` field so output from several
/// workspaces processed by the same process can be told apart.
///
/// ```
/// use admin_reconcile::RunLog;
///
/// let log = RunLog::new("ws-123");
/// log.info(format_args!("Adding {} administrator(s)", 2));
/// assert_eq!(log.workspace_id(), "ws-123");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RunLog<'a> {
    workspace_id: &'a str,
}

impl<'a> RunLog<'a> {
    /// Creates a log handle for `workspace_id`.
    pub fn new(workspace_id: &'a str) -> Self {
        Self { workspace_id }
    }

    /// Returns the workspace ID stamped on every record.
    pub fn workspace_id(&self) -> &str {
        self.workspace_id
    }

    /// Logs an info-level message.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(workspace_id = %self.workspace_id, "{}", args);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(workspace_id = %self.workspace_id, "{}", args);
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(workspace_id = %self.workspace_id, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(workspace_id = %self.workspace_id, "{}", args);
    }
}
