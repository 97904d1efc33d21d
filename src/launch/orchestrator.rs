//! The token-launch orchestration sequence.
//!
//! Drives a user-entered token definition from intent to persisted record:
//! registry setup (best-effort), duplicate pre-check, `create_token` on the
//! token module, `launch_token` on the bonding curve, a best-effort XP award,
//! and finally persistence to the marketplace backend. Every wallet call is
//! raced against a client-side timeout; a timeout is terminal for the whole
//! sequence but does not cancel the in-flight signing popup or submission,
//! which may still land on-chain with no client-side record of it.
//!
//! There is no automatic retry and no checkpointing of partial progress: a
//! failed sequence is re-run from the top by the user, which re-executes the
//! setup and duplicate-check steps even if an earlier attempt already created
//! the token on-chain.

use crate::config::Config;
use crate::error::LaunchError;
use crate::marketplace::MarketplaceStore;
use crate::types::{Address, LaunchRequest, LaunchedToken, TxResult};
use crate::wallet::payload::{EntryFunctionPayload, PayloadBuilder};
use crate::wallet::session::WalletSession;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// XP granted for a successful token creation.
const LAUNCH_XP: u64 = 100;

/// Where the sequence currently is. Any phase can transition to `Failed`;
/// `Failed` is only left by the user re-invoking the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Idle,
    CheckingDuplicate,
    LaunchingToken,
    LaunchingCurve,
    AwardingXp,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchPhase::Idle => "idle",
            LaunchPhase::CheckingDuplicate => "checking-duplicate",
            LaunchPhase::LaunchingToken => "launching-token",
            LaunchPhase::LaunchingCurve => "launching-curve",
            LaunchPhase::AwardingXp => "awarding-xp",
            LaunchPhase::Persisting => "persisting",
            LaunchPhase::Done => "done",
            LaunchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A non-fatal degradation during an otherwise successful launch. Surfaced
/// instead of swallowed so callers and tests can assert on
/// degraded-but-completed states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchWarning {
    /// A registry init call failed; the store is assumed already initialized.
    StoreInit { step: &'static str, reason: String },
    /// The XP award did not go through; the token launch itself stands.
    XpAward { reason: String },
}

impl fmt::Display for LaunchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchWarning::StoreInit { step, reason } => {
                write!(f, "{} skipped (assumed initialized): {}", step, reason)
            }
            LaunchWarning::XpAward { reason } => write!(f, "XP award failed: {}", reason),
        }
    }
}

/// Result of a completed launch sequence.
#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    /// Every step, including the best-effort ones, succeeded.
    Success { record: LaunchedToken },
    /// The token is live and persisted, but best-effort side effects failed.
    PartialSuccess {
        record: LaunchedToken,
        warnings: Vec<LaunchWarning>,
    },
}

impl LaunchOutcome {
    pub fn record(&self) -> &LaunchedToken {
        match self {
            LaunchOutcome::Success { record } => record,
            LaunchOutcome::PartialSuccess { record, .. } => record,
        }
    }

    pub fn warnings(&self) -> &[LaunchWarning] {
        match self {
            LaunchOutcome::Success { .. } => &[],
            LaunchOutcome::PartialSuccess { warnings, .. } => warnings,
        }
    }
}

/// Sequences the launch steps against a wallet session and a marketplace
/// store, both borrowed for the orchestrator's lifetime.
pub struct LaunchOrchestrator<'a, W: WalletSession, M: MarketplaceStore> {
    wallet: &'a W,
    marketplace: &'a M,
    payloads: PayloadBuilder,
    tx_timeout: Duration,
    phase: Mutex<LaunchPhase>,
    /// Serializes launches from this client so a double-submitting caller
    /// cannot race itself past the duplicate pre-check. Concurrent launches
    /// from different clients remain unguarded; the backend's uniqueness
    /// check is the only cross-client protection.
    in_flight: tokio::sync::Mutex<()>,
}

impl<'a, W: WalletSession, M: MarketplaceStore> LaunchOrchestrator<'a, W, M> {
    pub fn new(config: &Config, wallet: &'a W, marketplace: &'a M) -> Self {
        Self {
            wallet,
            marketplace,
            payloads: PayloadBuilder::new(config.contract_address.clone()),
            tx_timeout: config.tx_timeout,
            phase: Mutex::new(LaunchPhase::Idle),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// The phase the most recent sequence reached.
    pub fn phase(&self) -> LaunchPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    fn set_phase(&self, phase: LaunchPhase) {
        debug!("launch phase -> {}", phase);
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }

    fn fail(&self, error: LaunchError) -> LaunchError {
        self.set_phase(LaunchPhase::Failed);
        error
    }

    /// Race a wallet call against the configured timeout. The pending wallet
    /// future is dropped on timeout; the remote side is not cancelled.
    async fn submit_with_timeout(
        &self,
        step: &'static str,
        call: impl Future<Output = Result<TxResult, LaunchError>>,
    ) -> Result<TxResult, LaunchError> {
        match tokio::time::timeout(self.tx_timeout, call).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(LaunchError::Transaction { reason, .. })) => {
                Err(LaunchError::Transaction { step, reason })
            }
            Ok(Err(e)) => Err(LaunchError::Transaction {
                step,
                reason: e.to_string(),
            }),
            Err(_) => Err(LaunchError::Timeout { step }),
        }
    }

    /// Best-effort registry setup; a failure is assumed to mean "already
    /// initialized" and is demoted to a warning.
    async fn try_init(
        &self,
        step: &'static str,
        payload: EntryFunctionPayload,
        warnings: &mut Vec<LaunchWarning>,
    ) {
        match self.submit_with_timeout(step, self.wallet.sign_and_submit(&payload)).await {
            Ok(result) => debug!("{} submitted: {}", step, result.hash),
            Err(e) => {
                warn!("{} failed, assuming already initialized: {}", step, e);
                warnings.push(LaunchWarning::StoreInit {
                    step,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Run the full launch sequence for one request.
    #[instrument(skip(self), fields(symbol = %request.symbol))]
    pub async fn run(&self, request: &LaunchRequest) -> Result<LaunchOutcome, LaunchError> {
        let _guard = self.in_flight.lock().await;
        self.set_phase(LaunchPhase::Idle);

        request.validate().map_err(|e| self.fail(e))?;

        // Pre-flight: a connected wallet with a usable account, or nothing.
        if !self.wallet.connected() {
            return Err(self.fail(LaunchError::WalletNotConnected));
        }
        let account = self
            .wallet
            .account()
            .ok_or_else(|| self.fail(LaunchError::WalletNotConnected))?;
        let creator: Address = account.address;

        let mut warnings = Vec::new();

        // Duplicate pre-check against the marketplace, before any chain
        // interaction (including registry setup). The gap between this check
        // and the final persist is not transactional; concurrent launchers
        // of the same symbol can both pass it.
        self.set_phase(LaunchPhase::CheckingDuplicate);
        if let Some(existing) = self
            .marketplace
            .fetch_symbol(&request.symbol)
            .await
            .map_err(|e| self.fail(e))?
        {
            info!("symbol {} already launched ({})", existing.symbol, existing.tx_hash);
            return Err(self.fail(LaunchError::DuplicateSymbol(request.symbol.clone())));
        }

        // Registry setup. Both calls are idempotent on-chain and fail when
        // the store already exists, so failures are non-fatal.
        self.try_init("init_store", self.payloads.init_store(&creator), &mut warnings)
            .await;
        self.try_init(
            "init_curve_store",
            self.payloads.init_curve_store(&creator),
            &mut warnings,
        )
        .await;

        // Step A: create the token. No hash means no Step B.
        self.set_phase(LaunchPhase::LaunchingToken);
        let create_payload =
            self.payloads
                .create_token(&creator, &request.name, &request.symbol, request.supply);
        let created = self
            .submit_with_timeout("create_token", self.wallet.sign_and_submit(&create_payload))
            .await
            .map_err(|e| self.fail(e))?;
        if created.hash.trim().is_empty() {
            return Err(self.fail(LaunchError::Transaction {
                step: "create_token",
                reason: "submitted but no hash received".into(),
            }));
        }
        info!("create_token submitted: {}", created.hash);

        // Step B: launch on the bonding curve. A failure here leaves the
        // created token on-chain with no curve; that partial state is not
        // rolled back and nothing is persisted.
        self.set_phase(LaunchPhase::LaunchingCurve);
        let curve_payload =
            self.payloads
                .launch_token(&creator, &request.symbol, request.base_price);
        let launched = self
            .submit_with_timeout(
                "launch_token (bonding curve)",
                self.wallet.sign_and_submit(&curve_payload),
            )
            .await
            .map_err(|e| self.fail(e))?;
        if launched.hash.trim().is_empty() {
            return Err(self.fail(LaunchError::Transaction {
                step: "launch_token (bonding curve)",
                reason: "submitted but no hash received".into(),
            }));
        }
        info!("launch_token submitted: {}", launched.hash);

        // Best-effort XP award for the creator.
        self.set_phase(LaunchPhase::AwardingXp);
        let xp_payload = self.payloads.add_xp(&creator, &creator, LAUNCH_XP);
        if let Err(e) = self
            .submit_with_timeout("add_xp", self.wallet.sign_and_submit(&xp_payload))
            .await
        {
            warn!("XP award failed (non-blocking): {}", e);
            warnings.push(LaunchWarning::XpAward {
                reason: e.to_string(),
            });
        }

        // Persist only after both chain steps succeeded, and only a
        // fully-formed record.
        self.set_phase(LaunchPhase::Persisting);
        let record = LaunchedToken {
            symbol: request.symbol.clone(),
            name: request.name.clone(),
            tx_hash: created.hash,
            creator: Some(creator),
            supply: Some(request.supply),
            base_price: Some(request.base_price),
        };
        record.validate().map_err(|e| self.fail(e))?;
        let stored = self
            .marketplace
            .store_launched(&record)
            .await
            .map_err(|e| self.fail(e))?;

        self.set_phase(LaunchPhase::Done);
        info!("launch complete for {} ({})", stored.symbol, stored.tx_hash);
        if warnings.is_empty() {
            Ok(LaunchOutcome::Success { record: stored })
        } else {
            Ok(LaunchOutcome::PartialSuccess {
                record: stored,
                warnings,
            })
        }
    }

    /// Buy on the bonding curve: one signed transaction, same timeout
    /// discipline as the launch steps.
    #[instrument(skip(self))]
    pub async fn buy(
        &self,
        symbol: &str,
        amount: u64,
        payment: u64,
    ) -> Result<TxResult, LaunchError> {
        let account = self.wallet.account().ok_or(LaunchError::WalletNotConnected)?;
        let payload = self
            .payloads
            .buy_token(&account.address, symbol, amount, payment);
        self.submit_with_timeout("buy_token", self.wallet.sign_and_submit(&payload))
            .await
    }

    /// Sell on the bonding curve.
    #[instrument(skip(self))]
    pub async fn sell(&self, symbol: &str, amount: u64) -> Result<TxResult, LaunchError> {
        let account = self.wallet.account().ok_or(LaunchError::WalletNotConnected)?;
        let payload = self.payloads.sell_token(&account.address, symbol, amount);
        self.submit_with_timeout("sell_token", self.wallet.sign_and_submit(&payload))
            .await
    }
}
