//! The three private addresses a swap operates on.
//!
//! Parsing accepts dotted-quad IPv4 only. All three addresses must be
//! pairwise distinct; both checks run before any remote call is made.
use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::errors::{Error, ErrorKind, Result};

/// Parse a strict dotted-quad IPv4 address (`a.b.c.d`, each octet 0-255).
///
/// # Errors
/// Returns `ErrorKind::InvalidAddress` for anything else, including short
/// forms like `10.0.0`, extra octets like `10.0.0.1.1` and surrounding
/// whitespace.
pub fn parse_ipv4(label: &str, raw: &str) -> Result<Ipv4Addr> {
    raw.parse::<Ipv4Addr>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidAddress,
            format!("{label}: '{raw}' is not a valid IPv4 address"),
        )
    })
}

/// Validated address triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SwapAddresses {
    /// Address the ZCA VM holds before the swap; the appliance takes it over.
    pub original_zca: Ipv4Addr,
    /// Address of the ZVM appliance VM; never moves.
    pub appliance: Ipv4Addr,
    /// Address the ZCA VM is reachable at after the swap.
    pub alternate: Ipv4Addr,
}

impl SwapAddresses {
    /// # Errors
    /// Returns `ErrorKind::DuplicateAddress` when any two addresses are equal.
    pub fn new(original_zca: Ipv4Addr, appliance: Ipv4Addr, alternate: Ipv4Addr) -> Result<Self> {
        let pairs = [
            ("original ZCA", original_zca, "ZVM appliance", appliance),
            ("original ZCA", original_zca, "alternative ZCA", alternate),
            ("ZVM appliance", appliance, "alternative ZCA", alternate),
        ];
        for (la, a, lb, b) in pairs {
            if a == b {
                return Err(Error::new(
                    ErrorKind::DuplicateAddress,
                    format!("{la} and {lb} addresses are both {a}; all three must differ"),
                ));
            }
        }
        Ok(Self {
            original_zca,
            appliance,
            alternate,
        })
    }

    /// Parse and validate the three raw CLI strings.
    ///
    /// # Errors
    /// See [`parse_ipv4`] and [`SwapAddresses::new`].
    pub fn parse(original_zca: &str, appliance: &str, alternate: &str) -> Result<Self> {
        Self::new(
            parse_ipv4("original ZCA", original_zca)?,
            parse_ipv4("ZVM appliance", appliance)?,
            parse_ipv4("alternative ZCA", alternate)?,
        )
    }
}

/// The three addresses as given on the command line, not yet validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapInput {
    pub original_zca: String,
    pub appliance: String,
    pub alternate: String,
}

impl SwapInput {
    /// # Errors
    /// See [`SwapAddresses::parse`].
    pub fn parse(&self) -> Result<SwapAddresses> {
        SwapAddresses::parse(&self.original_zca, &self.appliance, &self.alternate)
    }
}

impl fmt::Display for SwapAddresses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "original={} appliance={} alternate={}",
            self.original_zca, self.appliance, self.alternate
        )
    }
}
