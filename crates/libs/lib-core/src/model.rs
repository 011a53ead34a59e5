//! # Domain Model
//!
//! The wallet session and the client's view of the shared color record.

use serde::{Deserialize, Serialize};

/// Proof that a wallet authorized this client to read its public identity.
///
/// Lives in memory only; a page reload starts without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    /// Base58 public address of the connected wallet.
    pub address: String,
}

impl Session {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// One submitted color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    /// Color code exactly as submitted, e.g. `#ff0000`.
    pub color_code: String,
    /// Base58 address of the wallet that submitted it.
    pub submitter: String,
}

impl ColorEntry {
    pub fn new(color_code: impl Into<String>, submitter: impl Into<String>) -> Self {
        Self {
            color_code: color_code.into(),
            submitter: submitter.into(),
        }
    }
}

/// Client-observable state of the shared record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "entries", rename_all = "lowercase")]
pub enum RecordState {
    /// Not fetched yet.
    #[default]
    Unknown,
    /// The account does not exist (or could not be decoded).
    Uninitialized,
    /// The account exists; entries in on-chain order.
    Populated(Vec<ColorEntry>),
}

impl RecordState {
    /// Entries, if the record is populated.
    pub fn entries(&self) -> Option<&[ColorEntry]> {
        match self {
            RecordState::Populated(entries) => Some(entries),
            _ => None,
        }
    }
}
