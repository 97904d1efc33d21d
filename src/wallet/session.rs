//! The wallet session seam.
//!
//! Browser wallets expose `{ account, connected, signAndSubmitTransaction }`;
//! this trait is the Rust-side contract for that surface so the orchestrator
//! can run against a real adapter bridge, the simulated wallet, or a test
//! double. The session is passed by reference into each operation rather than
//! held in global state.

use crate::error::LaunchError;
use crate::types::{Address, TxResult};
use crate::wallet::payload::EntryFunctionPayload;
use async_trait::async_trait;

/// Connected-account details as reported by the wallet.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// Canonical address, normalized at the adapter boundary
    pub address: Address,
    /// Wallet product name, e.g. "Petra"
    pub wallet_name: Option<String>,
}

/// Capability surface of a connected wallet.
///
/// `sign_and_submit` opens the wallet's signing flow and resolves once the
/// transaction is submitted. Implementations must not retry on their own;
/// retry policy belongs to the user.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// The connected account, if any.
    fn account(&self) -> Option<AccountInfo>;

    /// Whether a wallet is connected and able to sign.
    fn connected(&self) -> bool;

    /// Sign and submit an entry-function transaction, returning its hash.
    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TxResult, LaunchError>;
}
