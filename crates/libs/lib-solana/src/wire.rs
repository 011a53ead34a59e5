//! # Transaction Wire Format
//!
//! Transactions cross two boundaries as base64 text: into the browser wallet for
//! signing, and to the RPC node in `sendTransaction`. Both expect the legacy
//! wire layout, which is what `bincode` produces for [`Transaction`].

use std::str::FromStr;

use solana_sdk::{signature::Signature, transaction::Transaction};

use lib_core::error::{AppError, Result};
use lib_utils::{b64_decode, b64_encode};

/// Serialize `transaction` to base64 wire bytes.
pub fn encode_transaction(transaction: &Transaction) -> Result<String> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| AppError::Decoding(format!("Failed to serialize transaction: {}", e)))?;
    Ok(b64_encode(bytes))
}

/// Parse base64 wire bytes back into a transaction.
pub fn decode_transaction(encoded: &str) -> Result<Transaction> {
    let bytes = b64_decode(encoded)
        .map_err(|e| AppError::Decoding(format!("Invalid transaction base64: {}", e)))?;

    bincode::deserialize(&bytes)
        .map_err(|e| AppError::Decoding(format!("Failed to deserialize transaction: {}", e)))
}

/// Parse a base58 signature string as returned by RPC nodes and wallets.
pub fn parse_signature(encoded: &str) -> Result<Signature> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| AppError::Decoding(format!("Invalid signature '{}': {}", encoded, e)))?;

    if bytes.len() != 64 {
        return Err(AppError::Decoding(format!(
            "Signature must be 64 bytes, got {}",
            bytes.len()
        )));
    }

    Signature::from_str(encoded).map_err(|e| AppError::Decoding(format!("Invalid signature: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        hash::Hash,
        message::Message,
        pubkey::Pubkey,
        signature::{Keypair, Signer},
    };

    use crate::program;

    #[test]
    fn test_signed_transaction_survives_the_wire() {
        let payer = Keypair::new_from_array([7u8; 32]);
        let ix = program::add_color(&Pubkey::new_unique(), &Pubkey::new_unique(), &payer.pubkey(), "#abc");
        let message = Message::new(&[ix], Some(&payer.pubkey()));
        let tx = Transaction::new(&[&payer], message, Hash::new_from_array([3u8; 32]));

        let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();

        assert_eq!(decoded, tx);
        assert!(decoded.verify().is_ok());
    }

    #[test]
    fn test_garbage_is_decoding_error() {
        assert!(matches!(decode_transaction("not base64!"), Err(AppError::Decoding(_))));
        assert!(matches!(decode_transaction("AAAA"), Err(AppError::Decoding(_))));
    }

    #[test]
    fn test_parse_signature() {
        let sig = Signature::from([9u8; 64]);
        assert_eq!(parse_signature(&sig.to_string()).unwrap(), sig);
        assert!(parse_signature("3xyz").is_err());
    }
}
