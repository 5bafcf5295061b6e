//! Policy configuration.
//!
//! Consumers construct a [`Policy`](crate::policy::Policy) with `Default`,
//! adjust fields (the CLI maps its flags onto them), and hand it to
//! [`NicSwap`](crate::NicSwap).

pub mod config;
pub mod types;

pub use config::Policy;
pub use types::{CleanupPolicy, StartWait};
