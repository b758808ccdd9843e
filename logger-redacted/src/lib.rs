//! Logging for the practice engine with automatic PHI/PII redaction
//!
//! Structured fields (ids, amounts, counts) are logged through `tracing` as
//! usual. Free-text messages that may carry patient data (names, benefits
//! notes, authorization numbers typed by front-desk staff) go through the
//! [`redacted_info!`] / [`redacted_warn!`] macros, which pass the formatted
//! message through the process-wide [`PiiRedactor`] before emitting it.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: `jane@example.com` → `EMAIL[hash]`
//! - **Phone Numbers**: `(555) 123-4567` → `PHONE[hash]`
//! - **SSN**: `123-45-6789` → `SSN[hash]`
//! - **Card Numbers**: `4111 1111 1111 1111` → `CARD[hash]`
//! - **Member IDs**: `XYZ123456789` → `MEMBER[hash]`
//! - **Authorization Numbers**: `authorization 20240001`, `AUTH-98765` → `AUTH[hash]`
//! - **Custom Patterns**: configured per practice
//!
//! With `hash_for_correlation` enabled the same value always hashes to the
//! same tag, so log lines about one patient can still be correlated.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init, redacted_info, LoggerConfig};
//!
//! init(&LoggerConfig::default()).expect("logging initialised");
//! let patient_id = 42;
//! redacted_info!(patient_id = patient_id; "Benefits note: call jane@example.com before visit");
//! ```

pub mod config;
pub mod error;
pub mod macros;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use subscriber::*;

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
