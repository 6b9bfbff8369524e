//! Console error handling

use thiserror::Error;

use infra_http::HttpConfigError;

use crate::session::SessionError;

/// Errors that end a console session
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Service configuration error: {0}")]
    Service(#[from] HttpConfigError),

    #[error("Session refused: {0}")]
    Session(#[from] SessionError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
