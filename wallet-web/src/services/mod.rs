//! Browser-side implementations of the wallet and ledger seams.

pub mod rpc;
pub mod wallet;

pub use rpc::JsonRpcLedger;
pub use wallet::PhantomWallet;
