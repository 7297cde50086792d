use std::io;

use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// The transactions query could not be served.
    #[error("query failed: {0}")]
    QueryFailed(String),
}
