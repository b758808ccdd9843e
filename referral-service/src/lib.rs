//! Referral Service
//!
//! Tracks how much of each referral a patient has used:
//! - Visits used and remaining against the referral's visit limit
//! - Expiration and exhaustion state
//! - Default ("best") referral selection for a new visit

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod usage;

pub use error::*;
pub use models::*;
pub use repository::*;
pub use service::*;
pub use usage::*;
