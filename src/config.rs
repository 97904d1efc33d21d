//! Client configuration.
//!
//! Contract address and endpoint URLs live in one place, with environment
//! overrides for deployments that point elsewhere.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default PromptToken/BondingCurve/XPSystem deployment on Aptos testnet.
pub const DEFAULT_CONTRACT_ADDRESS: &str =
    "0x0dbd9929394bf1a041494101445939f44def4c2d45b12f362b2a518595552e44";

/// Aptos testnet fullnode REST endpoint.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.testnet.aptoslabs.com/v1";

/// Marketplace backend base URL.
pub const DEFAULT_MARKETPLACE_URL: &str = "http://localhost:8000";

/// Chat backend endpoint.
pub const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:8000/chat";

/// Client-side ceiling on each wallet call.
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 30;

/// Endpoint and contract configuration for the whole client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the Move modules are published under
    pub contract_address: String,
    /// Fullnode REST base URL (with `/v1` suffix)
    pub node_url: String,
    /// Marketplace backend base URL (without `/api/marketplace`)
    pub marketplace_url: String,
    /// Chat backend endpoint
    pub chat_url: String,
    /// Per-transaction client-side timeout. The remote call is not cancelled
    /// when this fires; only the local await is abandoned.
    #[serde(with = "timeout_secs")]
    pub tx_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            node_url: DEFAULT_NODE_URL.to_string(),
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            tx_timeout: Duration::from_secs(DEFAULT_TX_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build a config from defaults plus `PROMPT_FUN_*` environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("PROMPT_FUN_CONTRACT_ADDRESS") {
            config.contract_address = addr;
        }
        if let Ok(url) = std::env::var("PROMPT_FUN_NODE_URL") {
            config.node_url = url;
        }
        if let Ok(url) = std::env::var("PROMPT_FUN_MARKETPLACE_URL") {
            config.marketplace_url = url;
        }
        if let Ok(url) = std::env::var("PROMPT_FUN_CHAT_URL") {
            config.chat_url = url;
        }
        if let Ok(secs) = std::env::var("PROMPT_FUN_TX_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.tx_timeout = Duration::from_secs(secs);
            }
        }
        config
    }
}

mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
