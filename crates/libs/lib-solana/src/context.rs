//! # Request Context
//!
//! Everything a single ledger call needs: where to send it, at which commitment,
//! and who signs. A context is a plain value built fresh for every operation,
//! since the wallet behind the signer may change between calls.

use std::rc::Rc;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use lib_core::config::{Commitment, NetworkConfig};
use lib_core::error::{AppError, Result};
use lib_core::model::Session;

use crate::wallet::WalletAdapter;

/// RPC endpoint plus the commitment level used for reads and confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub commitment: Commitment,
}

/// Signing/sending context for one operation.
pub struct RequestContext {
    pub endpoint: Endpoint,
    /// Session address the context was built for.
    pub user: String,
    signer: Rc<dyn WalletAdapter>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl RequestContext {
    /// Build a context for `session` on `network`.
    ///
    /// # Errors
    ///
    /// [`AppError::NoSession`] when no session is established.
    pub fn build(
        session: Option<&Session>,
        network: &NetworkConfig,
        signer: Rc<dyn WalletAdapter>,
    ) -> Result<Self> {
        let session = session.ok_or(AppError::NoSession)?;

        let endpoint = Endpoint {
            url: network.endpoint(),
            commitment: network.commitment,
        };
        debug!("Request context for {} at {} ({})", session.address, endpoint.url, endpoint.commitment.as_str());

        Ok(Self {
            endpoint,
            user: session.address.clone(),
            signer,
        })
    }

    /// The session address as a public key; required to build transactions.
    pub fn user_pubkey(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.user).map_err(|e| {
            AppError::InvalidInput(format!("Session address '{}' is not a public key: {}", self.user, e))
        })
    }

    pub fn signer(&self) -> &dyn WalletAdapter {
        self.signer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWallet;
    use lib_core::config::Cluster;

    fn signer() -> Rc<dyn WalletAdapter> {
        Rc::new(FakeWallet::new())
    }

    #[test]
    fn test_build_requires_session() {
        let err = RequestContext::build(None, &NetworkConfig::default(), signer()).unwrap_err();
        assert_eq!(err, AppError::NoSession);
    }

    #[test]
    fn test_build_is_deterministic() {
        let session = Session::new("Addr1");
        let network = NetworkConfig::new(Cluster::Devnet, Commitment::Processed);

        let a = RequestContext::build(Some(&session), &network, signer()).unwrap();
        let b = RequestContext::build(Some(&session), &network, signer()).unwrap();

        assert_eq!(a.endpoint, b.endpoint);
        assert_eq!(a.user, b.user);
        assert_eq!(a.endpoint.url, "https://api.devnet.solana.com");
        assert_eq!(a.endpoint.commitment, Commitment::Processed);
    }

    #[test]
    fn test_user_pubkey_validates_address() {
        let network = NetworkConfig::default();

        let opaque = RequestContext::build(Some(&Session::new("Addr1")), &network, signer()).unwrap();
        assert!(matches!(opaque.user_pubkey(), Err(AppError::InvalidInput(_))));

        let key = Pubkey::new_unique();
        let real = RequestContext::build(Some(&Session::new(key.to_string())), &network, signer()).unwrap();
        assert_eq!(real.user_pubkey().unwrap(), key);
    }
}
