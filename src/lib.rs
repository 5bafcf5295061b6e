#![forbid(unsafe_code)]
//! nicswap: move a private IP identity between two Azure VMs, transactionally.
//!
//! Model highlights:
//! - Every forward step is a remote call; once it succeeds its inverse is recorded
//!   in an in-memory `Ledger`.
//! - The first failing step stops the run and the ledger is undone tail-to-head.
//! - If an inverse fails too, the steps that were never undone are listed for the
//!   operator, oldest last.
//! - Remote calls go through the `CloudClient` trait; `AzCliClient` implements it
//!   over the `az` CLI.

pub mod adapters;
pub mod api;
pub mod constants;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
