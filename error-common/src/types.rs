use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::codes;

/// Error shared across the practice engine crates
#[derive(Error, Debug)]
pub enum PracticeError {
    /// Input rejected, keyed by field name
    #[error("Validation error: {}", format_field_errors(.errors))]
    Validation { errors: BTreeMap<String, String> },

    /// Patient lookup failed
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    /// Any other record lookup failed
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Backing store errors
    #[error("Repository error: {0}")]
    Repository(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PracticeError {
    /// Build a validation error from `(field, message)` pairs
    pub fn validation<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Validation {
            errors: errors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Stable error code for API and CLI responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => codes::validation::INVALID_INPUT,
            Self::PatientNotFound(_) => codes::not_found::PATIENT,
            Self::NotFound(_) => codes::not_found::RECORD,
            Self::Repository(_) => codes::repository::QUERY_FAILED,
            Self::Config(_) => codes::config::LOAD_FAILED,
            Self::Serialization(_) => codes::system::SERIALIZATION,
            Self::Other(_) => codes::system::INTERNAL,
        }
    }

    /// Whether the caller can fix the failure by changing its input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::PatientNotFound(_) | Self::NotFound(_)
        )
    }

    /// Serializable body for reporting the error to a caller
    pub fn to_report(&self) -> ErrorReport {
        let fields = match self {
            Self::Validation { errors } => errors.clone(),
            _ => BTreeMap::new(),
        };
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            fields,
        }
    }
}

/// Error as reported to a caller
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Result type alias for practice engine operations
pub type Result<T> = std::result::Result<T, PracticeError>;

fn format_field_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Log an error together with its code
pub fn log_error(context: &str, error: &PracticeError) {
    if error.is_client_error() {
        tracing::warn!(context = context, error_code = error.code(), error = %error, "Request rejected");
    } else {
        tracing::error!(context = context, error_code = error.code(), error = %error, "Practice engine error");
    }
}
