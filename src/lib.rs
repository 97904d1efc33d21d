//! prompt.fun - headless client for launching and trading meme tokens on Aptos
//!
//! This crate drives the chat-styled prompt.fun flows without a browser:
//! entry-function payloads for the on-chain Move modules, the multi-step
//! token-launch orchestration, fullnode REST queries for balances and XP,
//! and thin clients for the marketplace and chat backends.

pub mod chain;
pub mod chat;
pub mod config;
pub mod error;
pub mod launch;
pub mod marketplace;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use config::Config;
pub use error::LaunchError;
pub use launch::{LaunchOrchestrator, LaunchOutcome, LaunchPhase, LaunchWarning};
pub use types::{Address, ChatMessage, DisplayAmount, LaunchRequest, LaunchedToken, TxResult};
