use error_common::PracticeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid redaction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Logger initialization failed: {0}")]
    Init(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;

impl From<LoggerError> for PracticeError {
    fn from(err: LoggerError) -> Self {
        PracticeError::Config(err.to_string())
    }
}
