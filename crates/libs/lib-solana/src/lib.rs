//! # Solana Library
//!
//! Wallet sessions, request contexts and the record client for the rainbow
//! program, plus the ledger seam they talk through.
//!
//! ## Modules
//!
//! - [`wallet`]: injected wallet capability and session ownership
//! - [`context`]: per-operation endpoint, commitment and signer
//! - [`record`]: fetch / initialize / append against the shared record
//! - [`program`]: Anchor instruction and account encoding
//! - [`ledger`]: async ledger trait; [`rpc`] (native) and [`jsonrpc`] payloads (browser)
//! - [`config`]: program id and record keypair resolved from the deployment descriptor

pub mod config;
pub mod context;
pub mod jsonrpc;
pub mod ledger;
pub mod program;
pub mod record;
pub mod wallet;
pub mod wire;

#[cfg(not(target_arch = "wasm32"))]
pub mod rpc;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types from root for convenience
pub use config::{AppConfig, ProgramConfig};
pub use context::{Endpoint, RequestContext};
pub use ledger::{Ledger, LedgerAccount};
pub use record::RecordClient;
pub use wallet::{InjectedWallet, WalletAdapter, WalletError, WalletGateway};
