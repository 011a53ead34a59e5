//! # Wallet Gateway
//!
//! Wraps the injected wallet capability and owns the session.
//!
//! The host environment either injects a wallet or it does not; that choice is
//! made once, explicitly, when constructing [`InjectedWallet`], instead of
//! probing for a global on every call.
//!
//! ## Connection Modes
//!
//! - [`WalletGateway::attempt_auto_connect`]: "only if previously trusted". A
//!   decline is the normal first-visit state and leaves the session absent.
//! - [`WalletGateway::connect_explicit`]: prompts the user; a decline is
//!   [`AppError::UserRejected`].
//!
//! Successful connections publish the new [`Session`] on a watch channel so any
//! number of components can observe it.

use std::rc::Rc;

use async_trait::async_trait;
use solana_sdk::transaction::Transaction;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use lib_core::error::{AppError, Result};
use lib_core::model::Session;

/// Errors reported by a wallet implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The user (or the wallet's trust policy) declined the request.
    #[error("Wallet rejected the request: {0}")]
    Rejected(String),

    /// The wallet object is present but not usable (locked, missing method).
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    /// Signing failed for a reason other than a user decline.
    #[error("Signing error: {0}")]
    Signing(String),
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected(msg) => AppError::UserRejected(msg),
            WalletError::Unavailable(_) => AppError::NoWalletFound,
            WalletError::Signing(msg) => AppError::SubmissionFailed(msg),
        }
    }
}

/// Capability exposed by an injected browser wallet.
#[async_trait(?Send)]
pub trait WalletAdapter {
    /// Request a connection; resolves to the wallet's base58 public key.
    ///
    /// With `only_if_trusted` the wallet must not prompt and declines unless the
    /// user approved this site before.
    async fn connect(&self, only_if_trusted: bool) -> std::result::Result<String, WalletError>;

    /// Add the wallet's signature to `transaction`.
    async fn sign_transaction(
        &self,
        transaction: Transaction,
    ) -> std::result::Result<Transaction, WalletError>;
}

/// Wallet as found in the host environment.
#[derive(Clone)]
pub enum InjectedWallet {
    Present(Rc<dyn WalletAdapter>),
    Absent,
}

impl InjectedWallet {
    pub fn present(adapter: impl WalletAdapter + 'static) -> Self {
        InjectedWallet::Present(Rc::new(adapter))
    }
}

/// Establishes and publishes the wallet session.
pub struct WalletGateway {
    wallet: InjectedWallet,
    session: watch::Sender<Option<Session>>,
}

impl WalletGateway {
    pub fn new(wallet: InjectedWallet) -> Self {
        let (session, _) = watch::channel(None);
        Self { wallet, session }
    }

    fn adapter(&self) -> Result<&Rc<dyn WalletAdapter>> {
        match &self.wallet {
            InjectedWallet::Present(adapter) => Ok(adapter),
            InjectedWallet::Absent => Err(AppError::NoWalletFound),
        }
    }

    /// Connect without prompting if the wallet already trusts this client.
    ///
    /// Returns `Ok(None)` when the wallet declines; that is not an error.
    pub async fn attempt_auto_connect(&self) -> Result<Option<String>> {
        let adapter = self.adapter()?;

        match adapter.connect(true).await {
            Ok(address) => {
                info!("Wallet auto-connected: {}", address);
                self.publish(Some(Session::new(address.clone())));
                Ok(Some(address))
            }
            Err(e) => {
                debug!("Wallet did not auto-connect: {}", e);
                Ok(None)
            }
        }
    }

    /// Connect with full user consent. The wallet may prompt.
    pub async fn connect_explicit(&self) -> Result<String> {
        let adapter = self.adapter()?;

        match adapter.connect(false).await {
            Ok(address) => {
                info!("Wallet connected: {}", address);
                self.publish(Some(Session::new(address.clone())));
                Ok(address)
            }
            Err(e) => {
                warn!("Wallet connect failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Forget the current session.
    pub fn disconnect(&self) {
        if self.session.borrow().is_some() {
            info!("Wallet session cleared");
        }
        self.publish(None);
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Signing capability of the injected wallet.
    pub fn signer(&self) -> Result<Rc<dyn WalletAdapter>> {
        self.adapter().cloned()
    }

    fn publish(&self, session: Option<Session>) {
        // send_replace succeeds even with no live receivers
        self.session.send_replace(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWallet;

    #[tokio::test]
    async fn test_absent_wallet_is_reported() {
        let gateway = WalletGateway::new(InjectedWallet::Absent);

        assert_eq!(gateway.attempt_auto_connect().await, Err(AppError::NoWalletFound));
        assert_eq!(gateway.connect_explicit().await, Err(AppError::NoWalletFound));
        assert!(gateway.session().is_none());
    }

    #[tokio::test]
    async fn test_untrusted_auto_connect_stays_silent() {
        let wallet = FakeWallet::new();
        let gateway = WalletGateway::new(InjectedWallet::present(wallet));

        assert_eq!(gateway.attempt_auto_connect().await, Ok(None));
        assert!(gateway.session().is_none());
    }

    #[tokio::test]
    async fn test_trusted_auto_connect_publishes_session() {
        let wallet = FakeWallet::new().trusted();
        let address = wallet.address();
        let gateway = WalletGateway::new(InjectedWallet::present(wallet));
        let mut rx = gateway.subscribe();

        assert_eq!(gateway.attempt_auto_connect().await, Ok(Some(address.clone())));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().clone(), Some(Session::new(address)));
    }

    #[tokio::test]
    async fn test_explicit_rejection_maps_to_user_rejected() {
        let wallet = FakeWallet::new().rejecting_connect();
        let gateway = WalletGateway::new(InjectedWallet::present(wallet));

        let err = gateway.connect_explicit().await.unwrap_err();
        assert!(matches!(err, AppError::UserRejected(_)));
        assert!(gateway.session().is_none());
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let wallet = FakeWallet::new();
        let gateway = WalletGateway::new(InjectedWallet::present(wallet));

        gateway.connect_explicit().await.unwrap();
        assert!(gateway.session().is_some());

        gateway.disconnect();
        assert!(gateway.session().is_none());
    }
}
