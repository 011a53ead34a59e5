//! Application constants

/// Signature status polls before a submission is reported unconfirmed.
pub const CONFIRMATION_POLL_LIMIT: u32 = 30;
pub const CONFIRMATION_POLL_INTERVAL_MS: u32 = 1000;

// Deployment descriptor, produced when the program is deployed
pub const IDL_JSON: &str = include_str!("../../deploy/idl.json");
pub const KEYPAIR_JSON: &str = include_str!("../../deploy/keypair.json");

// UI
pub const COLOR_PLACEHOLDER: &str = "#ff8800";
