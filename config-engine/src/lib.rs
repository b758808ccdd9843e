//! Configuration loading for the practice engine
//!
//! Configuration is layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`EngineConfig::default`])
//! 2. A YAML or TOML file (`practice.yaml` unless told otherwise)
//! 3. Environment variables prefixed with `PRACTICE_`, using `__` to reach
//!    nested keys (`PRACTICE_LOGGING__LEVEL=debug`)
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::{ConfigEngine, ConfigSource};
//!
//! let config = ConfigEngine::new()
//!     .add_source(ConfigSource::file("practice.yaml"))
//!     .add_source(ConfigSource::env())
//!     .load()?;
//! println!("warn {} days before a referral expires", config.referrals.expiring_soon_days);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod engine;
pub mod error;
pub mod providers;
pub mod validation;

pub use engine::*;
pub use error::*;
pub use providers::*;
