//! Demo entry point for the prompt.fun client.
//!
//! Runs one token launch end to end against a simulated wallet and an
//! in-memory marketplace, then replays the degraded path where the XP award
//! is rejected.

use anyhow::Result;
use async_trait::async_trait;
use prompt_fun::error::LaunchError;
use prompt_fun::launch::{LaunchOrchestrator, LaunchOutcome};
use prompt_fun::marketplace::MarketplaceStore;
use prompt_fun::types::{Address, LaunchRequest, LaunchedToken};
use prompt_fun::wallet::SimulatedWallet;
use prompt_fun::Config;
use std::sync::Mutex;
use tracing::{info, warn, Level};

/// Marketplace stand-in holding records in memory, mirroring the backend's
/// symbol-uniqueness rule.
#[derive(Default)]
struct InMemoryMarketplace {
    records: Mutex<Vec<LaunchedToken>>,
}

#[async_trait]
impl MarketplaceStore for InMemoryMarketplace {
    async fn store_launched(&self, record: &LaunchedToken) -> Result<LaunchedToken, LaunchError> {
        let mut records = self.records.lock().expect("records lock poisoned");
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
        Ok(self.records.lock().expect("records lock poisoned").clone())
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<LaunchedToken>, LaunchError> {
        Ok(self
            .records
            .lock()
            .expect("records lock poisoned")
            .iter()
            .find(|r| r.symbol == symbol)
            .cloned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting prompt.fun launch demo");

    let config = Config::from_env();
    let marketplace = InMemoryMarketplace::default();
    let wallet = SimulatedWallet::new(Address::from_hex(
        "0xabc123abc123abc123abc123abc123abc123abc1",
    )?);

    let orchestrator = LaunchOrchestrator::new(&config, &wallet, &marketplace);

    let request = LaunchRequest {
        name: "Moon Token".to_string(),
        symbol: "MOON".to_string(),
        supply: 1_000_000,
        base_price: 1,
    };

    match orchestrator.run(&request).await {
        Ok(LaunchOutcome::Success { record }) => {
            info!("launched {} with hash {}", record.symbol, record.tx_hash);
        }
        Ok(LaunchOutcome::PartialSuccess { record, warnings }) => {
            info!("launched {} with degradations:", record.symbol);
            for warning in warnings {
                warn!("  {}", warning);
            }
        }
        Err(e) => {
            warn!("launch failed at phase {}: {}", orchestrator.phase(), e);
        }
    }

    // A second attempt at the same symbol stops at the duplicate pre-check
    // before any chain interaction.
    let before = wallet.submission_count();
    match orchestrator.run(&request).await {
        Err(LaunchError::DuplicateSymbol(symbol)) => {
            info!(
                "duplicate {} rejected with {} wallet calls",
                symbol,
                wallet.submission_count() - before
            );
        }
        other => warn!("unexpected duplicate-launch result: {:?}", other),
    }

    // Degraded path: the XP award is rejected but the launch still persists.
    let rejecting_wallet = SimulatedWallet::new(Address::from_hex(
        "0xdef456def456def456def456def456def456def4",
    )?)
    .reject_function("add_xp");
    let orchestrator = LaunchOrchestrator::new(&config, &rejecting_wallet, &marketplace);
    let request = LaunchRequest {
        name: "Nova".to_string(),
        symbol: "NOVA".to_string(),
        supply: 500_000,
        base_price: 2,
    };
    if let Ok(outcome) = orchestrator.run(&request).await {
        info!(
            "NOVA outcome: {} warning(s), record {}",
            outcome.warnings().len(),
            outcome.record().tx_hash
        );
    }

    let all = marketplace.fetch_launched().await?;
    info!("marketplace now holds {} token(s)", all.len());
    for token in all {
        info!("  {} ({}) by {:?}", token.symbol, token.name, token.creator);
    }

    Ok(())
}
