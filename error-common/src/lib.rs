//! Common error handling utilities for the practice engine
//!
//! Every service crate keeps its own `thiserror` enum close to the code that
//! raises it. At crate boundaries those errors convert into [`PracticeError`],
//! which carries a stable, machine-readable error code so callers (the CLI,
//! a future HTTP layer) can report failures consistently.
//!
//! # Error Categories
//!
//! - **Validation**: rejected input, collected per field
//! - **NotFound**: a patient, referral or benefits record is missing
//! - **Repository**: the backing store failed
//! - **Config**: configuration could not be loaded or is invalid
//! - **Serialization**: JSON input/output failures
//! - **Other**: anything else, wrapped from `anyhow`
//!
//! # Example
//!
//! ```rust
//! use error_common::{PracticeError, codes};
//!
//! let err = PracticeError::validation([("coinsurance_percent", "must be between 0 and 100")]);
//! assert_eq!(err.code(), codes::validation::INVALID_INPUT);
//! ```

pub mod codes;
pub mod types;

pub use types::*;
