//! Injected Solana wallet (`window.solana`) via wasm-bindgen.
//!
//! Transactions cross into JavaScript as base64 wire bytes and are rebuilt with
//! `@solana/web3.js` (`window.solanaWeb3`) before being handed to the wallet,
//! which keeps any signature already present.

use async_trait::async_trait;
use solana_sdk::transaction::Transaction;
use wasm_bindgen::prelude::*;

use lib_solana::{wire, InjectedWallet, WalletAdapter, WalletError};

/// JSON-RPC error code wallets use for "user rejected the request".
const USER_REJECTED_CODE: f64 = 4001.0;

#[wasm_bindgen(inline_js = "
export function hasSolanaWallet() {
    return !!(window.solana && window.solana.isPhantom);
}

export async function connectSolanaWallet(onlyIfTrusted) {
    const response = onlyIfTrusted
        ? await window.solana.connect({ onlyIfTrusted: true })
        : await window.solana.connect();
    return response.publicKey.toString();
}

export async function signSolanaTransaction(base64Tx) {
    if (typeof window.solanaWeb3 === 'undefined') {
        throw new Error('Solana Web3.js not loaded');
    }
    if (!window.solana.signTransaction) {
        throw new Error('Wallet does not support transaction signing');
    }

    const txBuffer = Uint8Array.from(atob(base64Tx), c => c.charCodeAt(0));
    const tx = window.solanaWeb3.Transaction.from(txBuffer);
    const signedTx = await window.solana.signTransaction(tx);

    const serialized = signedTx.serialize({ requireAllSignatures: true, verifySignatures: true });
    let binary = '';
    serialized.forEach(byte => binary += String.fromCharCode(byte));
    return btoa(binary);
}
")]
extern "C" {
    fn hasSolanaWallet() -> bool;

    #[wasm_bindgen(catch)]
    async fn connectSolanaWallet(only_if_trusted: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn signSolanaTransaction(base64_tx: &str) -> Result<JsValue, JsValue>;
}

fn error_message(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn is_user_rejection(err: &JsValue) -> bool {
    js_sys::Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        == Some(USER_REJECTED_CODE)
}

/// Phantom-compatible wallet injected at `window.solana`.
pub struct PhantomWallet;

impl PhantomWallet {
    /// Probe the page once for an injected wallet.
    pub fn detect() -> InjectedWallet {
        if hasSolanaWallet() {
            log::info!("Phantom wallet found");
            InjectedWallet::present(PhantomWallet)
        } else {
            log::warn!("Solana object not found! Get a Phantom Wallet");
            InjectedWallet::Absent
        }
    }
}

#[async_trait(?Send)]
impl WalletAdapter for PhantomWallet {
    async fn connect(&self, only_if_trusted: bool) -> Result<String, WalletError> {
        let address = connectSolanaWallet(only_if_trusted)
            .await
            .map_err(|e| WalletError::Rejected(error_message(&e)))?;

        address
            .as_string()
            .ok_or_else(|| WalletError::Unavailable("Wallet returned no public key".to_string()))
    }

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError> {
        let encoded = wire::encode_transaction(&transaction).map_err(|e| WalletError::Signing(e.to_string()))?;

        let signed = signSolanaTransaction(&encoded).await.map_err(|e| {
            if is_user_rejection(&e) {
                WalletError::Rejected(error_message(&e))
            } else {
                WalletError::Signing(error_message(&e))
            }
        })?;

        let signed = signed
            .as_string()
            .ok_or_else(|| WalletError::Signing("Wallet returned no transaction".to_string()))?;
        wire::decode_transaction(&signed).map_err(|e| WalletError::Signing(e.to_string()))
    }
}
