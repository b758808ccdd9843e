//! Practice command line
//!
//! Reads patients, benefits, referrals, visits and payments as JSON files and
//! prints the calculated results as JSON.
//!
//! ```bash
//! practice collect --patient patient.json --benefits benefits.json --as-of 2024-04-02
//! practice referrals --referrals referrals.json --visits visits.json
//! practice statement --payments payments.json --year 2024
//! ```

pub mod cli;
pub mod commands;
pub mod input;
pub mod report;

pub use cli::*;
pub use commands::*;
