//! Browser ledger: Solana JSON-RPC over `fetch`.
//!
//! Confirmation polls `getSignatureStatuses` until the endpoint's commitment is
//! reached or the poll budget runs out.

use async_trait::async_trait;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use lib_core::error::{AppError, Result};
use lib_solana::jsonrpc::{self, JsonRpcRequest, SignatureStatus};
use lib_solana::{wire, Endpoint, Ledger, LedgerAccount};

use crate::utils::constants::{CONFIRMATION_POLL_INTERVAL_MS, CONFIRMATION_POLL_LIMIT};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRpcLedger;

impl JsonRpcLedger {
    async fn call(endpoint: &Endpoint, request: &JsonRpcRequest) -> Result<String> {
        let response = Request::post(&endpoint.url)
            .json(request)
            .map_err(|e| AppError::Decoding(format!("{}: {}", request.method, e)))?
            .send()
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("{}: {}", request.method, e)))?;

        response
            .text()
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("{}: {}", request.method, e)))
    }
}

#[async_trait(?Send)]
impl Ledger for JsonRpcLedger {
    async fn get_account(&self, endpoint: &Endpoint, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        let body = Self::call(endpoint, &jsonrpc::get_account_info(address, endpoint.commitment)).await?;
        jsonrpc::parse_account_info(&body)
    }

    async fn latest_blockhash(&self, endpoint: &Endpoint) -> Result<Hash> {
        let body = Self::call(endpoint, &jsonrpc::get_latest_blockhash(endpoint.commitment)).await?;
        jsonrpc::parse_latest_blockhash(&body)
    }

    async fn send_and_confirm(&self, endpoint: &Endpoint, transaction: &Transaction) -> Result<Signature> {
        let encoded = wire::encode_transaction(transaction)?;
        let body = Self::call(endpoint, &jsonrpc::send_transaction(&encoded, endpoint.commitment)).await?;
        let signature = jsonrpc::parse_send_transaction(&body)?;
        log::info!("Sent transaction {}", signature);

        for _ in 0..CONFIRMATION_POLL_LIMIT {
            let body = Self::call(endpoint, &jsonrpc::get_signature_statuses(&signature)).await?;

            match jsonrpc::parse_signature_status(&body, endpoint.commitment)? {
                SignatureStatus::Confirmed => return Ok(signature),
                SignatureStatus::Failed(err) => {
                    return Err(AppError::SubmissionFailed(format!("Transaction {} failed: {}", signature, err)))
                }
                SignatureStatus::Pending => TimeoutFuture::new(CONFIRMATION_POLL_INTERVAL_MS).await,
            }
        }

        Err(AppError::SubmissionFailed(format!(
            "Transaction {} not confirmed at {} commitment",
            signature,
            endpoint.commitment.as_str()
        )))
    }
}
