//! Shared crate-wide constants for nicswap.
//!
//! Centralizes magic values and default labels used across modules.

/// Subsystem label attached to every emitted fact.
pub const SUBSYSTEM: &str = "nicswap";

/// Version of the facts envelope (`schema_version` field).
pub const SCHEMA_VERSION: i64 = 1;

/// UUIDv5 namespace tag for deterministic plan/action IDs.
pub const NS_TAG: &str = "https://zerto-tools/nicswap";

/// Default infix for the generated alternate NIC name.
/// Example: `zca-vm01-nicswap-alt-1a2b3c4d`.
pub const DEFAULT_ALT_NIC_PREFIX: &str = "nicswap-alt";

/// Number of hex characters taken from a v4 UUID for the alternate NIC suffix.
pub const ALT_NIC_SUFFIX_LEN: usize = 8;

/// Azure CLI executable used by `AzCliClient` unless overridden.
pub const DEFAULT_AZ_BIN: &str = "az";

/// Name of the binary, used when printing the literal revert command.
pub const BIN_NAME: &str = "nicswap";
