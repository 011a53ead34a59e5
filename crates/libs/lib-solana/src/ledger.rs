//! # Ledger Seam
//!
//! The remote ledger as the record client sees it: account reads, a recent
//! blockhash, and send-and-confirm. Implementations:
//!
//! - [`crate::rpc::RpcLedger`]: native, `solana-client` nonblocking RPC
//! - the browser front-end's JSON-RPC ledger over `fetch`
//! - [`crate::testing::FakeLedger`]: in-memory program emulation for tests
//!
//! Every method receives the [`Endpoint`] of the current request context;
//! implementations must not cache a connection across contexts.

use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use lib_core::error::Result;

use crate::context::Endpoint;

/// Account state returned by a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

#[async_trait(?Send)]
pub trait Ledger {
    /// Read an account. `Ok(None)` when it does not exist.
    async fn get_account(&self, endpoint: &Endpoint, address: &Pubkey) -> Result<Option<LedgerAccount>>;

    /// Blockhash to stamp the next transaction with.
    async fn latest_blockhash(&self, endpoint: &Endpoint) -> Result<Hash>;

    /// Submit a fully signed transaction and wait until it reaches the
    /// endpoint's commitment level.
    async fn send_and_confirm(&self, endpoint: &Endpoint, transaction: &Transaction) -> Result<Signature>;
}
