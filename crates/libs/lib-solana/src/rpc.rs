//! # Solana RPC Ledger
//!
//! Native [`Ledger`] backed by the official nonblocking `solana_client` RPC client.
//!
//! A client is created per call from the request context's endpoint and
//! commitment. The connection is lazy, so this costs nothing until the request
//! is actually made.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_solana::rpc::RpcLedger;
//! use lib_solana::context::Endpoint;
//! use lib_solana::ledger::Ledger;
//! use lib_core::config::Commitment;
//! use solana_sdk::pubkey::Pubkey;
//!
//! # async fn example() -> lib_core::Result<()> {
//! let ledger = RpcLedger::new();
//! let endpoint = Endpoint {
//!     url: "https://api.devnet.solana.com".to_string(),
//!     commitment: Commitment::Processed,
//! };
//!
//! let account = ledger.get_account(&endpoint, &Pubkey::new_unique()).await?;
//! assert!(account.is_none());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::{info, warn};

use lib_core::config::Commitment;
use lib_core::error::{AppError, Result};

use crate::context::Endpoint;
use crate::ledger::{Ledger, LedgerAccount};

/// Map the configured commitment to the RPC client's type.
pub fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

/// Ledger over JSON-RPC using `solana_client`.
#[derive(Debug, Clone, Default)]
pub struct RpcLedger;

impl RpcLedger {
    pub fn new() -> Self {
        Self
    }

    fn client(endpoint: &Endpoint) -> RpcClient {
        RpcClient::new_with_commitment(endpoint.url.clone(), commitment_config(endpoint.commitment))
    }
}

#[async_trait(?Send)]
impl Ledger for RpcLedger {
    async fn get_account(&self, endpoint: &Endpoint, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        let rpc = Self::client(endpoint);

        let response = rpc
            .get_account_with_commitment(address, commitment_config(endpoint.commitment))
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("RPC error: {}", e)))?;

        Ok(response.value.map(|account| LedgerAccount {
            owner: account.owner,
            data: account.data,
        }))
    }

    async fn latest_blockhash(&self, endpoint: &Endpoint) -> Result<Hash> {
        Self::client(endpoint)
            .get_latest_blockhash()
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("Failed to get latest blockhash: {}", e)))
    }

    async fn send_and_confirm(&self, endpoint: &Endpoint, transaction: &Transaction) -> Result<Signature> {
        let rpc = Self::client(endpoint);

        match rpc.send_and_confirm_transaction(transaction).await {
            Ok(signature) => {
                info!("Transaction confirmed: {}", signature);
                Ok(signature)
            }
            Err(e) => {
                warn!("Transaction failed: {}", e);
                Err(AppError::SubmissionFailed(format!("Failed to send transaction: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_mapping() {
        assert_eq!(commitment_config(Commitment::Processed), CommitmentConfig::processed());
        assert_eq!(commitment_config(Commitment::Confirmed), CommitmentConfig::confirmed());
        assert_eq!(commitment_config(Commitment::Finalized), CommitmentConfig::finalized());
    }

    // Nothing listens on port 1, so every call fails at the transport.
    fn unreachable() -> Endpoint {
        Endpoint {
            url: "http://127.0.0.1:1".to_string(),
            commitment: Commitment::Processed,
        }
    }

    #[tokio::test]
    async fn test_get_account_transport_failure() {
        let err = RpcLedger::new()
            .get_account(&unreachable(), &Pubkey::new_unique())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(msg) if msg.starts_with("RPC error")));
    }

    #[tokio::test]
    async fn test_latest_blockhash_transport_failure() {
        let err = RpcLedger::new().latest_blockhash(&unreachable()).await.unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(msg) if msg.starts_with("Failed to get latest blockhash")));
    }

    #[tokio::test]
    async fn test_send_and_confirm_transport_failure() {
        let transaction = Transaction::new_with_payer(&[], Some(&Pubkey::new_unique()));
        let err = RpcLedger::new()
            .send_and_confirm(&unreachable(), &transaction)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(msg) if msg.starts_with("Failed to send transaction")));
    }
}
