//! # Solana JSON-RPC Payloads
//!
//! Request bodies and response parsing for the four RPC methods the browser
//! ledger needs. Transport-free: the caller posts [`JsonRpcRequest`] as JSON and
//! hands the response text to the matching `parse_*` function.
//!
//! | Method | Parsed into |
//! |---|---|
//! | `getAccountInfo` (base64 encoding) | `Option<LedgerAccount>` |
//! | `getLatestBlockhash` | [`Hash`] |
//! | `sendTransaction` (base64 encoding) | [`Signature`] |
//! | `getSignatureStatuses` | [`SignatureStatus`] |

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature};

use lib_core::config::Commitment;
use lib_core::error::{AppError, Result};
use lib_utils::b64_decode;

use crate::ledger::LedgerAccount;
use crate::wire;

/// JSON-RPC 2.0 request body.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    pub method: &'static str,
    params: Vec<serde_json::Value>,
}

impl JsonRpcRequest {
    fn new(method: &'static str, params: Vec<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by most account-level methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct UiAccount {
    owner: String,
    /// `[payload, encoding]`
    data: (String, String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiBlockhash {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSignatureStatus {
    confirmation_status: Option<Commitment>,
    err: Option<serde_json::Value>,
}

/// Outcome of one signature status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Unknown to the node or below the requested commitment.
    Pending,
    /// Reached the requested commitment.
    Confirmed,
    /// Landed, but the transaction failed.
    Failed(String),
}

fn parse_result<T: DeserializeOwned>(method: &str, body: &str) -> Result<T> {
    let response: JsonRpcResponse<T> = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        return Err(AppError::SubmissionFailed(format!(
            "{} failed ({}): {}",
            method, error.code, error.message
        )));
    }

    response
        .result
        .ok_or_else(|| AppError::Decoding(format!("{} returned neither result nor error", method)))
}

// region:    --- Requests

pub fn get_account_info(address: &Pubkey, commitment: Commitment) -> JsonRpcRequest {
    JsonRpcRequest::new(
        "getAccountInfo",
        vec![
            json!(address.to_string()),
            json!({ "encoding": "base64", "commitment": commitment.as_str() }),
        ],
    )
}

pub fn get_latest_blockhash(commitment: Commitment) -> JsonRpcRequest {
    JsonRpcRequest::new(
        "getLatestBlockhash",
        vec![json!({ "commitment": commitment.as_str() })],
    )
}

/// `encoded` is the base64 wire transaction from [`wire::encode_transaction`].
pub fn send_transaction(encoded: &str, commitment: Commitment) -> JsonRpcRequest {
    JsonRpcRequest::new(
        "sendTransaction",
        vec![
            json!(encoded),
            json!({ "encoding": "base64", "preflightCommitment": commitment.as_str() }),
        ],
    )
}

pub fn get_signature_statuses(signature: &Signature) -> JsonRpcRequest {
    JsonRpcRequest::new("getSignatureStatuses", vec![json!([signature.to_string()])])
}

// endregion: --- Requests

// region:    --- Responses

pub fn parse_account_info(body: &str) -> Result<Option<LedgerAccount>> {
    let response: WithContext<Option<UiAccount>> = parse_result("getAccountInfo", body)?;

    let Some(account) = response.value else {
        return Ok(None);
    };

    let (payload, encoding) = account.data;
    if encoding != "base64" {
        return Err(AppError::Decoding(format!("Unexpected account encoding '{}'", encoding)));
    }

    let owner = Pubkey::from_str(&account.owner)
        .map_err(|e| AppError::Decoding(format!("Invalid owner '{}': {}", account.owner, e)))?;
    let data = b64_decode(&payload)
        .map_err(|e| AppError::Decoding(format!("Invalid account data: {}", e)))?;

    Ok(Some(LedgerAccount { owner, data }))
}

pub fn parse_latest_blockhash(body: &str) -> Result<Hash> {
    let response: WithContext<UiBlockhash> = parse_result("getLatestBlockhash", body)?;

    Hash::from_str(&response.value.blockhash)
        .map_err(|e| AppError::Decoding(format!("Invalid blockhash: {}", e)))
}

pub fn parse_send_transaction(body: &str) -> Result<Signature> {
    let signature: String = parse_result("sendTransaction", body)?;
    wire::parse_signature(&signature)
}

/// Status of the single signature queried, judged against `commitment`.
pub fn parse_signature_status(body: &str, commitment: Commitment) -> Result<SignatureStatus> {
    let response: WithContext<Vec<Option<UiSignatureStatus>>> =
        parse_result("getSignatureStatuses", body)?;

    let Some(Some(status)) = response.value.into_iter().next() else {
        return Ok(SignatureStatus::Pending);
    };

    if let Some(err) = status.err {
        return Ok(SignatureStatus::Failed(err.to_string()));
    }

    match status.confirmation_status {
        Some(reached) if commitment.is_satisfied_by(reached) => Ok(SignatureStatus::Confirmed),
        _ => Ok(SignatureStatus::Pending),
    }
}

// endregion: --- Responses

#[cfg(test)]
mod tests {
    use super::*;
    use lib_utils::b64_encode;

    #[test]
    fn test_get_account_info_request_shape() {
        let address = Pubkey::new_unique();
        let body: serde_json::Value =
            serde_json::from_str(&get_account_info(&address, Commitment::Processed).to_json().unwrap()).unwrap();

        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "getAccountInfo");
        assert_eq!(body["params"][0], address.to_string());
        assert_eq!(body["params"][1]["encoding"], "base64");
        assert_eq!(body["params"][1]["commitment"], "processed");
    }

    #[test]
    fn test_parse_missing_account() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":5},"value":null}}"#;
        assert_eq!(parse_account_info(body).unwrap(), None);
    }

    #[test]
    fn test_parse_existing_account() {
        let owner = Pubkey::new_unique();
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{{"context":{{"slot":5}},"value":{{"owner":"{}","data":["{}","base64"],"lamports":1000,"executable":false,"rentEpoch":0}}}}}}"#,
            owner,
            b64_encode([1u8, 2, 3])
        );

        let account = parse_account_info(&body).unwrap().unwrap();
        assert_eq!(account.owner, owner);
        assert_eq!(account.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_rpc_error_is_submission_failed_with_remote_message() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"Transaction simulation failed: custom program error: 0x0"}}"#;

        let err = parse_send_transaction(body).unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(msg) if msg.contains("custom program error: 0x0")));
    }

    #[test]
    fn test_parse_blockhash() {
        let hash = Hash::new_from_array([4u8; 32]);
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{{"context":{{"slot":1}},"value":{{"blockhash":"{}","lastValidBlockHeight":200}}}}}}"#,
            hash
        );
        assert_eq!(parse_latest_blockhash(&body).unwrap(), hash);
    }

    #[test]
    fn test_signature_status_against_commitment() {
        let status = |confirmation: &str| {
            format!(
                r#"{{"jsonrpc":"2.0","id":1,"result":{{"context":{{"slot":1}},"value":[{{"slot":1,"confirmations":0,"err":null,"confirmationStatus":"{}"}}]}}}}"#,
                confirmation
            )
        };

        assert_eq!(
            parse_signature_status(&status("processed"), Commitment::Processed).unwrap(),
            SignatureStatus::Confirmed
        );
        assert_eq!(
            parse_signature_status(&status("processed"), Commitment::Confirmed).unwrap(),
            SignatureStatus::Pending
        );
        assert_eq!(
            parse_signature_status(&status("finalized"), Commitment::Confirmed).unwrap(),
            SignatureStatus::Confirmed
        );

        let unknown = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":[null]}}"#;
        assert_eq!(
            parse_signature_status(unknown, Commitment::Processed).unwrap(),
            SignatureStatus::Pending
        );
    }

    #[test]
    fn test_failed_transaction_status() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":[{"slot":1,"err":{"InstructionError":[0,{"Custom":0}]},"confirmationStatus":"processed"}]}}"#;

        assert!(matches!(
            parse_signature_status(body, Commitment::Processed).unwrap(),
            SignatureStatus::Failed(msg) if msg.contains("InstructionError")
        ));
    }
}
