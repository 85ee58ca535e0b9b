use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Two handlers claimed the same registry key. Treated as a startup bug.
    #[error("command '{key}' is registered more than once")]
    DuplicateCommand { key: String },
    #[error("{method} in {group} cannot be used as a console command: {reason}")]
    InvalidHandlerShape { group: String, method: String, reason: String },
    #[error("command not found: '{input}'")]
    NotFound { input: String },
    #[error("command '{command}' failed: {source}")]
    HandlerFault {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CommandError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CommandError::NotFound { .. })
    }
}
