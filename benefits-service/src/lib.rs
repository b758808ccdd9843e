//! Insurance Benefits Service
//!
//! Decides what to collect from a patient at a visit:
//! - Collection-amount calculation (deductible, coinsurance, out-of-pocket max)
//! - Default copay fallback when no benefits are on file
//! - Plan-year periods (calendar or custom start date)
//! - Benefits validation and accumulator updates

pub mod calculator;
pub mod error;
pub mod models;
pub mod plan_year;
pub mod repository;
pub mod service;
pub mod validation;

pub use calculator::*;
pub use error::*;
pub use models::*;
pub use plan_year::*;
pub use repository::*;
pub use service::*;
