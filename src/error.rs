//! Structured error taxonomy for the prompt.fun client.
//!
//! Each failure class gets its own variant so callers and tests can match on
//! them. Display output stays human-readable for surfacing in a UI.

use thiserror::Error;

/// Errors produced by wallet, chain, and marketplace interactions.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Pre-flight failure: no connected wallet or no usable signer.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// The wallet handed back an address in a shape we do not recognize.
    #[error("invalid address format: {0}")]
    InvalidAddressFormat(String),

    /// The duplicate pre-check found an existing record for this symbol.
    #[error("token symbol '{0}' is already launched")]
    DuplicateSymbol(String),

    /// A wallet call did not resolve within the configured ceiling.
    /// Terminal for the whole sequence; the remote submission is not
    /// cancelled and may still land on-chain.
    #[error("timed out waiting for {step}")]
    Timeout { step: &'static str },

    /// The wallet rejected the transaction or the chain reverted it.
    #[error("{step} failed: {reason}")]
    Transaction { step: &'static str, reason: String },

    /// A required field of the launch record is missing or malformed;
    /// nothing was persisted.
    #[error("invalid launch record: {0}")]
    InvalidRecord(String),

    /// The marketplace backend returned a failure.
    #[error("marketplace error: {0}")]
    Marketplace(String),

    /// The chat backend returned a failure.
    #[error("chat error: {0}")]
    Chat(String),

    /// The fullnode returned a non-404 failure status.
    #[error("chain query failed: {0}")]
    Chain(String),

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LaunchError {
    /// Whether the user can fix this by reconnecting the wallet rather than
    /// by retrying the sequence.
    pub fn needs_wallet_action(&self) -> bool {
        matches!(self, LaunchError::WalletNotConnected)
    }
}
