//! Integration tests for the token-launch orchestration sequence.
//!
//! Runs the orchestrator against the simulated wallet and an in-memory
//! marketplace, asserting the sequencing and partial-failure rules: no
//! persistence without both chain hashes, no chain calls on a duplicate
//! symbol, timeouts as terminal failures, and best-effort side effects
//! surfaced as warnings rather than swallowed.

use async_trait::async_trait;
use prompt_fun::error::LaunchError;
use prompt_fun::launch::{LaunchOrchestrator, LaunchOutcome, LaunchPhase, LaunchWarning};
use prompt_fun::marketplace::MarketplaceStore;
use prompt_fun::types::{Address, LaunchRequest, LaunchedToken};
use prompt_fun::wallet::{DisconnectedWallet, SimulatedWallet};
use prompt_fun::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory marketplace that counts every store call.
#[derive(Default)]
struct RecordingMarketplace {
    records: Mutex<Vec<LaunchedToken>>,
    store_calls: AtomicUsize,
}

impl RecordingMarketplace {
    fn with_existing(record: LaunchedToken) -> Self {
        Self {
            records: Mutex::new(vec![record]),
            store_calls: AtomicUsize::new(0),
        }
    }

    fn stored(&self) -> Vec<LaunchedToken> {
        self.records.lock().unwrap().clone()
    }

    fn store_call_count(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketplaceStore for RecordingMarketplace {
    async fn store_launched(&self, record: &LaunchedToken) -> Result<LaunchedToken, LaunchError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.symbol == record.symbol) {
            return Err(LaunchError::Marketplace(format!(
                "symbol {} already stored",
                record.symbol
            )));
        }
        records.push(record.clone());
        Ok(record.clone())
    }

    async fn fetch_launched(&self) -> Result<Vec<LaunchedToken>, LaunchError> {
        Ok(self.stored())
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<LaunchedToken>, LaunchError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.symbol == symbol)
            .cloned())
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    // Keep the timeout path fast in tests; production default is 30s.
    config.tx_timeout = Duration::from_millis(200);
    config
}

fn creator_address() -> Address {
    Address::from_hex("0xabc123abc123abc123abc123abc123abc123abc1").unwrap()
}

fn fast_wallet() -> SimulatedWallet {
    SimulatedWallet::new(creator_address())
        .with_signing_delay(Duration::from_millis(1))
        .with_fixed_hash("0xabc")
}

fn moon_request() -> LaunchRequest {
    LaunchRequest {
        name: "Moon".to_string(),
        symbol: "MOON".to_string(),
        supply: 1000,
        base_price: 1,
    }
}

#[tokio::test]
async fn test_successful_launch_persists_exactly_one_full_record() {
    let wallet = fast_wallet();
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let outcome = orchestrator.run(&moon_request()).await.expect("launch succeeds");

    assert!(matches!(outcome, LaunchOutcome::Success { .. }));
    assert_eq!(orchestrator.phase(), LaunchPhase::Done);
    assert_eq!(marketplace.store_call_count(), 1);

    let stored = marketplace.stored();
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.symbol, "MOON");
    assert_eq!(record.name, "Moon");
    assert_eq!(record.tx_hash, "0xabc");
    assert_eq!(record.creator, Some(creator_address()));
    assert_eq!(record.supply, Some(1000));
    assert_eq!(record.base_price, Some(1));

    // Both registry inits, both launch steps, and the XP award went through
    // the wallet, in order.
    assert_eq!(
        wallet.submitted_functions(),
        vec![
            "init_store",
            "init_curve_store",
            "create_token",
            "launch_token",
            "add_xp"
        ]
    );
}

#[tokio::test]
async fn test_curve_failure_aborts_before_persistence() {
    let wallet = fast_wallet().reject_function("launch_token");
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let err = orchestrator.run(&moon_request()).await.unwrap_err();

    assert!(err.to_string().contains("curve"), "error names the curve step: {}", err);
    assert_eq!(orchestrator.phase(), LaunchPhase::Failed);
    // Nothing persisted; the created token's on-chain effect is not rolled
    // back, it just has no marketplace record.
    assert_eq!(marketplace.store_call_count(), 0);
    assert!(marketplace.stored().is_empty());
    // create_token was submitted, add_xp never was.
    let functions = wallet.submitted_functions();
    assert!(functions.contains(&"create_token".to_string()));
    assert!(!functions.contains(&"add_xp".to_string()));
}

#[tokio::test]
async fn test_duplicate_symbol_submits_no_chain_transactions() {
    let wallet = fast_wallet();
    let marketplace = RecordingMarketplace::with_existing(LaunchedToken {
        symbol: "MOON".to_string(),
        name: "Old Moon".to_string(),
        tx_hash: "0x111".to_string(),
        creator: None,
        supply: None,
        base_price: None,
    });
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let err = orchestrator.run(&moon_request()).await.unwrap_err();

    assert!(matches!(err, LaunchError::DuplicateSymbol(ref s) if s == "MOON"));
    assert_eq!(wallet.submission_count(), 0);
    assert_eq!(marketplace.store_call_count(), 0);
}

#[tokio::test]
async fn test_wallet_not_connected_fails_pre_flight() {
    let wallet = DisconnectedWallet;
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let err = orchestrator.run(&moon_request()).await.unwrap_err();

    assert!(matches!(err, LaunchError::WalletNotConnected));
    assert_eq!(marketplace.store_call_count(), 0);
}

#[tokio::test]
async fn test_timeout_is_terminal_not_hung() {
    let wallet = fast_wallet().hang_function("create_token");
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let err = orchestrator.run(&moon_request()).await.unwrap_err();

    assert!(matches!(err, LaunchError::Timeout { step: "create_token" }));
    assert_eq!(orchestrator.phase(), LaunchPhase::Failed);
    assert_eq!(marketplace.store_call_count(), 0);
    // launch_token is never attempted without a create_token hash.
    assert!(!wallet
        .submitted_functions()
        .contains(&"launch_token".to_string()));
}

#[tokio::test]
async fn test_xp_failure_yields_partial_success_with_warning() {
    let wallet = fast_wallet().reject_function("add_xp");
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let outcome = orchestrator.run(&moon_request()).await.expect("launch completes");

    match &outcome {
        LaunchOutcome::PartialSuccess { record, warnings } => {
            assert_eq!(record.symbol, "MOON");
            assert_eq!(warnings.len(), 1);
            assert!(matches!(warnings[0], LaunchWarning::XpAward { .. }));
        }
        LaunchOutcome::Success { .. } => panic!("expected PartialSuccess"),
    }
    // The record is still persisted despite the degraded side effect.
    assert_eq!(marketplace.store_call_count(), 1);
}

#[tokio::test]
async fn test_store_init_failure_is_downgraded_to_warning() {
    let wallet = fast_wallet()
        .reject_function("init_store")
        .reject_function("init_curve_store");
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let outcome = orchestrator.run(&moon_request()).await.expect("launch completes");

    let warnings = outcome.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|w| matches!(w, LaunchWarning::StoreInit { .. })));
    assert_eq!(marketplace.store_call_count(), 1);
}

#[tokio::test]
async fn test_double_submission_is_serialized_within_one_client() {
    let wallet = fast_wallet();
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let request = moon_request();
    let (first, second) = tokio::join!(orchestrator.run(&request), orchestrator.run(&request));

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(LaunchError::DuplicateSymbol(_))))
        .count();

    // Exactly one launch wins; the other is stopped by the pre-check because
    // the sequences cannot interleave within a single client.
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(marketplace.store_call_count(), 1);
}

#[tokio::test]
async fn test_buy_and_sell_submit_single_transactions() {
    let wallet = fast_wallet();
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let buy = orchestrator.buy("MOON", 50, 100).await.expect("buy succeeds");
    assert_eq!(buy.hash, "0xabc");
    let sell = orchestrator.sell("MOON", 25).await.expect("sell succeeds");
    assert_eq!(sell.hash, "0xabc");

    assert_eq!(wallet.submitted_functions(), vec!["buy_token", "sell_token"]);
}

#[tokio::test]
async fn test_invalid_request_rejected_before_any_calls() {
    let wallet = fast_wallet();
    let marketplace = RecordingMarketplace::default();
    let config = test_config();
    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let request = LaunchRequest {
        name: "Moon".to_string(),
        symbol: "".to_string(),
        supply: 1000,
        base_price: 1,
    };
    let err = orchestrator.run(&request).await.unwrap_err();

    assert!(matches!(err, LaunchError::InvalidRecord(_)));
    assert_eq!(wallet.submission_count(), 0);
    assert_eq!(marketplace.store_call_count(), 0);
}
