//! # Test Doubles
//!
//! In-memory [`WalletAdapter`] and [`Ledger`] implementations.
//!
//! [`FakeLedger`] emulates the rainbow program: it verifies transaction
//! signatures, decodes the program's instructions, creates the record on
//! `startStuffOff` (failing if it already exists, as the real program does) and
//! appends on `addColor`. Handles are cheap clones sharing one state, so a test
//! can keep a handle while the client owns another.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use lib_core::error::{AppError, Result};

use crate::config::ProgramConfig;
use crate::context::Endpoint;
use crate::ledger::{Ledger, LedgerAccount};
use crate::program::{BaseAccount, ItemStruct, RainbowInstruction};
use crate::wallet::{WalletAdapter, WalletError};

/// Program config with a fixed program id and record keypair, so separate
/// clients built from it share one record.
pub fn test_program_config() -> ProgramConfig {
    ProgramConfig::new(
        Pubkey::new_from_array([7u8; 32]),
        Keypair::new_from_array([42u8; 32]),
    )
}

/// Completes on the second poll, so concurrent callers interleave.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

// region:    --- FakeWallet

/// Wallet backed by a local keypair.
pub struct FakeWallet {
    keypair: Keypair,
    reported_address: Option<String>,
    trusted: bool,
    reject_connect: bool,
    reject_sign: bool,
}

impl Default for FakeWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWallet {
    /// An untrusted wallet that approves explicit requests.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            reported_address: None,
            trusted: false,
            reject_connect: false,
            reject_sign: false,
        }
    }

    /// Approves only-if-trusted connects.
    pub fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    pub fn rejecting_connect(mut self) -> Self {
        self.reject_connect = true;
        self
    }

    pub fn rejecting_sign(mut self) -> Self {
        self.reject_sign = true;
        self
    }

    /// Report `address` on connect instead of the keypair's public key.
    pub fn reporting(mut self, address: &str) -> Self {
        self.reported_address = Some(address.to_string());
        self
    }

    pub fn address(&self) -> String {
        self.reported_address
            .clone()
            .unwrap_or_else(|| self.keypair.pubkey().to_string())
    }
}

#[async_trait(?Send)]
impl WalletAdapter for FakeWallet {
    async fn connect(&self, only_if_trusted: bool) -> std::result::Result<String, WalletError> {
        if only_if_trusted && !self.trusted {
            return Err(WalletError::Rejected("User has not trusted this app".to_string()));
        }
        if self.reject_connect {
            return Err(WalletError::Rejected("User rejected the request.".to_string()));
        }
        Ok(self.address())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> std::result::Result<Transaction, WalletError> {
        if self.reject_sign {
            return Err(WalletError::Rejected("User rejected the request.".to_string()));
        }

        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}

// endregion: --- FakeWallet

// region:    --- FakeLedger

#[derive(Default)]
struct FakeLedgerState {
    accounts: HashMap<Pubkey, LedgerAccount>,
    read_failure: Option<String>,
    send_failure: Option<String>,
    sent: usize,
    blockhashes: u8,
    endpoints: Vec<Endpoint>,
}

/// In-memory ledger emulating the rainbow program.
#[derive(Clone)]
pub struct FakeLedger {
    program_id: Pubkey,
    state: Rc<RefCell<FakeLedgerState>>,
}

impl FakeLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: Rc::new(RefCell::new(FakeLedgerState::default())),
        }
    }

    /// Seed an account directly.
    pub fn insert_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.state
            .borrow_mut()
            .accounts
            .insert(address, LedgerAccount { owner, data });
    }

    /// Seed a record holding `entries` (color, submitter).
    pub fn seed_record(&self, address: Pubkey, entries: &[(&str, Pubkey)]) {
        let account = BaseAccount {
            color_list: entries
                .iter()
                .map(|(color, user)| ItemStruct {
                    color_code: color.to_string(),
                    user_address: user.to_bytes(),
                })
                .collect(),
        };
        self.insert_account(address, self.program_id, account.encode());
    }

    /// Every read fails with `message` until cleared.
    pub fn fail_reads(&self, message: &str) {
        self.state.borrow_mut().read_failure = Some(message.to_string());
    }

    /// Every send fails with `message` until cleared.
    pub fn fail_sends(&self, message: &str) {
        self.state.borrow_mut().send_failure = Some(message.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.borrow_mut();
        state.read_failure = None;
        state.send_failure = None;
    }

    /// Number of transactions submitted (accepted or not).
    pub fn sent_transactions(&self) -> usize {
        self.state.borrow().sent
    }

    /// Endpoints seen by every call, in order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.state.borrow().endpoints.clone()
    }

    fn execute(&self, state: &mut FakeLedgerState, transaction: &Transaction) -> Result<()> {
        if transaction.verify().is_err() {
            return Err(AppError::SubmissionFailed(
                "Transaction signature verification failure".to_string(),
            ));
        }

        let keys = &transaction.message.account_keys;
        for ix in &transaction.message.instructions {
            if keys[ix.program_id_index as usize] != self.program_id {
                continue;
            }
            let account = |i: usize| keys[ix.accounts[i] as usize];

            match RainbowInstruction::decode(&ix.data) {
                Some(RainbowInstruction::StartStuffOff) => {
                    let record = account(0);
                    if state.accounts.contains_key(&record) {
                        return Err(AppError::SubmissionFailed(format!(
                            "Allocate: account Address {{ address: {}, base: None }} already in use",
                            record
                        )));
                    }
                    state.accounts.insert(
                        record,
                        LedgerAccount {
                            owner: self.program_id,
                            data: BaseAccount::default().encode(),
                        },
                    );
                }
                Some(RainbowInstruction::AddColor { color_code }) => {
                    let record = account(0);
                    let user = account(1);
                    let stored = state.accounts.get_mut(&record).ok_or_else(|| {
                        AppError::SubmissionFailed(
                            "AnchorError: AccountNotInitialized".to_string(),
                        )
                    })?;

                    let mut base = BaseAccount::decode(&stored.data)
                        .map_err(|e| AppError::SubmissionFailed(e.to_string()))?;
                    base.color_list.push(ItemStruct {
                        color_code,
                        user_address: user.to_bytes(),
                    });
                    stored.data = base.encode();
                }
                None => {
                    return Err(AppError::SubmissionFailed(
                        "AnchorError: InstructionFallbackNotFound".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Ledger for FakeLedger {
    async fn get_account(&self, endpoint: &Endpoint, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        YieldOnce(false).await;

        let mut state = self.state.borrow_mut();
        state.endpoints.push(endpoint.clone());
        if let Some(message) = &state.read_failure {
            return Err(AppError::SubmissionFailed(message.clone()));
        }
        Ok(state.accounts.get(address).cloned())
    }

    async fn latest_blockhash(&self, endpoint: &Endpoint) -> Result<Hash> {
        let mut state = self.state.borrow_mut();
        state.endpoints.push(endpoint.clone());
        state.blockhashes = state.blockhashes.wrapping_add(1);
        Ok(Hash::new_from_array([state.blockhashes; 32]))
    }

    async fn send_and_confirm(&self, endpoint: &Endpoint, transaction: &Transaction) -> Result<Signature> {
        YieldOnce(false).await;

        let mut state = self.state.borrow_mut();
        state.endpoints.push(endpoint.clone());
        state.sent += 1;

        if let Some(message) = &state.send_failure {
            return Err(AppError::SubmissionFailed(message.clone()));
        }

        // Apply atomically: work on a copy, commit on success
        let mut scratch = FakeLedgerState {
            accounts: state.accounts.clone(),
            ..Default::default()
        };
        self.execute(&mut scratch, transaction)?;
        state.accounts = scratch.accounts;

        Ok(transaction.signatures[0])
    }
}

// endregion: --- FakeLedger
