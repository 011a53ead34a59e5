//! # Record Client
//!
//! The two remote operations on the shared color record: fetch it, and submit
//! one of the program's two instructions against it.
//!
//! Both mutating operations are fire-and-confirm: they wait for the transaction
//! to reach the context's commitment level and report nothing beyond the
//! signature. The client never predicts the post-state; callers re-fetch.
//!
//! ## Failure Mapping
//!
//! | Situation | Error |
//! |---|---|
//! | account missing, foreign owner, undecodable data | [`AppError::RecordNotFound`] |
//! | RPC transport failure on read | [`AppError::SubmissionFailed`] |
//! | anything failing on a write (signing, simulation, program error) | [`AppError::SubmissionFailed`] |

use std::sync::Arc;

use solana_sdk::{
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::{info, warn};

use lib_core::error::{AppError, Result};
use lib_core::model::ColorEntry;

use crate::config::ProgramConfig;
use crate::context::RequestContext;
use crate::ledger::Ledger;
use crate::program::{self, BaseAccount};

/// Client for the fixed record account.
pub struct RecordClient<L> {
    ledger: L,
    program: Arc<ProgramConfig>,
}

impl<L: Ledger> RecordClient<L> {
    pub fn new(ledger: L, program: Arc<ProgramConfig>) -> Self {
        Self { ledger, program }
    }

    /// Fixed address of the record account.
    pub fn record_address(&self) -> Pubkey {
        self.program.record_address()
    }

    /// Fetch the record's entries in on-chain order.
    pub async fn fetch_record(&self, ctx: &RequestContext) -> Result<Vec<ColorEntry>> {
        let address = self.record_address();

        let account = self
            .ledger
            .get_account(&ctx.endpoint, &address)
            .await?
            .ok_or_else(|| AppError::RecordNotFound(format!("Account {} does not exist", address)))?;

        if account.owner != self.program.program_id {
            return Err(AppError::RecordNotFound(format!(
                "Account {} is owned by {}, not the rainbow program",
                address, account.owner
            )));
        }

        let record = BaseAccount::decode(&account.data)
            .map_err(|e| AppError::RecordNotFound(format!("Account {}: {}", address, e)))?;

        Ok(record.into_entries())
    }

    /// Create the record account. Fails remotely if it already exists.
    pub async fn initialize_record(&self, ctx: &RequestContext) -> Result<Signature> {
        let user = ctx.user_pubkey()?;
        let ix = program::start_stuff_off(&self.program.program_id, &self.record_address(), &user);

        let signature = self.submit(ctx, &user, ix, true).await?;
        info!("Created record account {} ({})", self.record_address(), signature);
        Ok(signature)
    }

    /// Append `color_code` to the record.
    pub async fn append_color(&self, ctx: &RequestContext, color_code: &str) -> Result<Signature> {
        let user = ctx.user_pubkey()?;
        let ix = program::add_color(&self.program.program_id, &self.record_address(), &user, color_code);

        let signature = self.submit(ctx, &user, ix, false).await?;
        info!("Color {} submitted ({})", color_code, signature);
        Ok(signature)
    }

    /// Build, sign (record keypair if required, then wallet), send and confirm.
    async fn submit(
        &self,
        ctx: &RequestContext,
        payer: &Pubkey,
        instruction: Instruction,
        record_signs: bool,
    ) -> Result<Signature> {
        let blockhash = self.ledger.latest_blockhash(&ctx.endpoint).await?;

        let message = Message::new(&[instruction], Some(payer));
        let mut transaction = Transaction::new_unsigned(message);
        transaction.message.recent_blockhash = blockhash;

        if record_signs {
            transaction
                .try_partial_sign(&[self.program.record_keypair()], blockhash)
                .map_err(|e| AppError::SubmissionFailed(format!("Record keypair signing failed: {}", e)))?;
        }

        let signed = ctx
            .signer()
            .sign_transaction(transaction)
            .await
            .map_err(|e| AppError::SubmissionFailed(e.to_string()))?;

        self.ledger
            .send_and_confirm(&ctx.endpoint, &signed)
            .await
            .inspect_err(|e| warn!("Submission to {} failed: {}", ctx.endpoint.url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use lib_core::config::NetworkConfig;
    use lib_core::model::Session;

    use crate::testing::{FakeLedger, FakeWallet, test_program_config};
    use crate::wallet::WalletAdapter;

    fn context_for(wallet: &Rc<FakeWallet>) -> RequestContext {
        let session = Session::new(wallet.address());
        let signer: Rc<dyn WalletAdapter> = wallet.clone();
        RequestContext::build(Some(&session), &NetworkConfig::default(), signer).unwrap()
    }

    fn client() -> (RecordClient<FakeLedger>, FakeLedger) {
        let program = Arc::new(test_program_config());
        let ledger = FakeLedger::new(program.program_id);
        (RecordClient::new(ledger.clone(), program), ledger)
    }

    #[tokio::test]
    async fn test_missing_account_is_not_an_empty_record() {
        let (client, _) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new()));

        let err = client.fetch_record(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn test_initialize_then_fetch_empty() {
        let (client, ledger) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new()));

        client.initialize_record(&ctx).await.unwrap();

        assert_eq!(client.fetch_record(&ctx).await.unwrap(), vec![]);
        assert_eq!(ledger.sent_transactions(), 1);
        assert!(ledger.endpoints().iter().all(|e| *e == ctx.endpoint));
    }

    #[tokio::test]
    async fn test_second_initialize_fails_remotely() {
        let (client, ledger) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new()));

        client.initialize_record(&ctx).await.unwrap();
        let err = client.initialize_record(&ctx).await.unwrap_err();

        assert!(matches!(err, AppError::SubmissionFailed(msg) if msg.contains("already in use")));
        assert_eq!(ledger.sent_transactions(), 2);
    }

    #[tokio::test]
    async fn test_append_increments_count_by_one() {
        let (client, _) = client();
        let wallet = Rc::new(FakeWallet::new());
        let ctx = context_for(&wallet);
        client.initialize_record(&ctx).await.unwrap();
        client.append_color(&ctx, "#ff0000").await.unwrap();

        let before = client.fetch_record(&ctx).await.unwrap().len();
        client.append_color(&ctx, "#00ff00").await.unwrap();
        let after = client.fetch_record(&ctx).await.unwrap();

        assert_eq!(after.len(), before + 1);
        assert_eq!(after[1], ColorEntry::new("#00ff00", wallet.address()));
    }

    #[tokio::test]
    async fn test_foreign_owner_is_record_not_found() {
        let (client, ledger) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new()));
        ledger.insert_account(
            client.record_address(),
            Pubkey::new_unique(),
            BaseAccount::default().encode(),
        );

        let err = client.fetch_record(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_on_read_is_submission_failed() {
        let (client, ledger) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new()));
        ledger.fail_reads("connection refused");

        let err = client.fetch_record(&ctx).await.unwrap_err();
        assert_eq!(err, AppError::SubmissionFailed("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_wallet_sign_rejection_is_submission_failed() {
        let (client, ledger) = client();
        let ctx = context_for(&Rc::new(FakeWallet::new().rejecting_sign()));

        let err = client.initialize_record(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(_)));
        assert_eq!(ledger.sent_transactions(), 0);
    }

    #[tokio::test]
    async fn test_opaque_session_address_cannot_submit() {
        let (client, ledger) = client();
        let signer: Rc<dyn WalletAdapter> = Rc::new(FakeWallet::new());
        let ctx = RequestContext::build(Some(&Session::new("Addr1")), &NetworkConfig::default(), signer).unwrap();

        let err = client.append_color(&ctx, "#fff").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(ledger.sent_transactions(), 0);
    }
}
