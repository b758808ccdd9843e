//! Billing Service for patient payments
//!
//! Provides:
//! - Payment and refund recording
//! - Per-patient payment aggregates for year-end and tax statements

pub mod error;
pub mod models;
pub mod reporting;
pub mod repository;
pub mod service;

pub use error::*;
pub use models::*;
pub use reporting::*;
pub use repository::*;
pub use service::*;
