//! Simulated wallet for the demo binary and integration tests.
//!
//! Stands in for a browser wallet extension: resolves submissions after a
//! configurable delay with generated hashes, and can be scripted to reject
//! specific entry functions or to hang (for exercising the timeout path).

use crate::error::LaunchError;
use crate::types::{Address, TxResult};
use crate::wallet::payload::EntryFunctionPayload;
use crate::wallet::session::{AccountInfo, WalletSession};
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// In-process stand-in for a wallet extension.
pub struct SimulatedWallet {
    account: AccountInfo,
    signing_delay: Duration,
    /// Entry functions (short names) that reject when submitted
    rejected_functions: HashSet<String>,
    /// Entry functions that never resolve
    hanging_functions: HashSet<String>,
    /// Fixed hash to return instead of a random one
    fixed_hash: Option<String>,
    /// Every payload submitted, in order
    submitted: Mutex<Vec<EntryFunctionPayload>>,
}

impl SimulatedWallet {
    pub fn new(address: Address) -> Self {
        Self {
            account: AccountInfo {
                address,
                wallet_name: Some("Simulated".to_string()),
            },
            signing_delay: Duration::from_millis(50),
            rejected_functions: HashSet::new(),
            hanging_functions: HashSet::new(),
            fixed_hash: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Resolve every submission with the same hash, for deterministic tests.
    pub fn with_fixed_hash(mut self, hash: &str) -> Self {
        self.fixed_hash = Some(hash.to_string());
        self
    }

    pub fn with_signing_delay(mut self, delay: Duration) -> Self {
        self.signing_delay = delay;
        self
    }

    /// Script a rejection for an entry function, e.g. `launch_token`.
    pub fn reject_function(mut self, function: &str) -> Self {
        self.rejected_functions.insert(function.to_string());
        self
    }

    /// Script an entry function to hang past any client timeout.
    pub fn hang_function(mut self, function: &str) -> Self {
        self.hanging_functions.insert(function.to_string());
        self
    }

    /// Short names of all functions submitted so far, in order.
    pub fn submitted_functions(&self) -> Vec<String> {
        self.submitted
            .lock()
            .expect("submitted lock poisoned")
            .iter()
            .map(|p| p.function_name().to_string())
            .collect()
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().expect("submitted lock poisoned").len()
    }
}

#[async_trait]
impl WalletSession for SimulatedWallet {
    fn account(&self) -> Option<AccountInfo> {
        Some(self.account.clone())
    }

    fn connected(&self) -> bool {
        true
    }

    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TxResult, LaunchError> {
        let function = payload.function_name().to_string();
        self.submitted
            .lock()
            .expect("submitted lock poisoned")
            .push(payload.clone());

        if self.hanging_functions.contains(&function) {
            debug!("simulated wallet hanging on {}", function);
            // Mirrors a signing popup the user never dismisses.
            std::future::pending::<()>().await;
            unreachable!();
        }

        tokio::time::sleep(self.signing_delay).await;

        if self.rejected_functions.contains(&function) {
            info!("simulated wallet rejecting {}", function);
            return Err(LaunchError::Transaction {
                step: "sign_and_submit",
                reason: format!("user rejected {}", function),
            });
        }

        let hash = match &self.fixed_hash {
            Some(hash) => hash.clone(),
            None => format!("0x{:032x}", rand::thread_rng().gen::<u128>()),
        };
        debug!("simulated wallet submitted {} as {}", function, hash);
        Ok(TxResult { hash })
    }
}

/// A session with no connected wallet, for pre-flight failure paths.
pub struct DisconnectedWallet;

#[async_trait]
impl WalletSession for DisconnectedWallet {
    fn account(&self) -> Option<AccountInfo> {
        None
    }

    fn connected(&self) -> bool {
        false
    }

    async fn sign_and_submit(
        &self,
        _payload: &EntryFunctionPayload,
    ) -> Result<TxResult, LaunchError> {
        Err(LaunchError::WalletNotConnected)
    }
}
