//! Core types and data structures for the prompt.fun client.

use crate::error::LaunchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A canonical Aptos account address: `0x`-prefixed lowercase hex.
///
/// Wallet adapters hand addresses back in several shapes (plain hex string,
/// byte array, object wrapping a hex field); everything is normalized at the
/// boundary so the rest of the client only ever sees this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Normalize a raw wallet-provided value into a canonical address.
    ///
    /// Accepted shapes:
    /// - a hex string, with or without `0x`, any case
    /// - a JSON array of bytes
    /// - a JSON object carrying an `address` or `hex` string field
    ///
    /// Anything else is rejected with `InvalidAddressFormat` rather than
    /// best-effort string coercion.
    pub fn normalize(raw: &Value) -> Result<Self, LaunchError> {
        match raw {
            Value::String(s) => Self::from_hex(s),
            Value::Array(bytes) => {
                let mut hex = String::with_capacity(2 + bytes.len() * 2);
                hex.push_str("0x");
                for b in bytes {
                    let b = b
                        .as_u64()
                        .filter(|&b| b <= 0xff)
                        .ok_or_else(|| LaunchError::InvalidAddressFormat(raw.to_string()))?;
                    hex.push_str(&format!("{:02x}", b));
                }
                Self::from_hex(&hex)
            }
            Value::Object(map) => {
                let field = map
                    .get("address")
                    .or_else(|| map.get("hex"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| LaunchError::InvalidAddressFormat(raw.to_string()))?;
                Self::from_hex(field)
            }
            other => Err(LaunchError::InvalidAddressFormat(other.to_string())),
        }
    }

    /// Parse a hex string into a canonical address.
    pub fn from_hex(s: &str) -> Result<Self, LaunchError> {
        let stripped = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LaunchError::InvalidAddressFormat(s.to_string()));
        }
        Ok(Self(format!("0x{}", stripped.to_ascii_lowercase())))
    }

    /// The canonical `0x`-prefixed hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-entered token definition, consumed once by the launch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Display name, e.g. "Moon Token"
    pub name: String,
    /// Ticker symbol, e.g. "MOON"
    pub symbol: String,
    /// Initial supply in whole tokens
    pub supply: u64,
    /// Bonding-curve base price
    pub base_price: u64,
}

impl LaunchRequest {
    /// Reject obviously unusable input before touching the wallet or chain.
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.name.trim().is_empty() {
            return Err(LaunchError::InvalidRecord("token name is empty".into()));
        }
        if self.symbol.trim().is_empty() {
            return Err(LaunchError::InvalidRecord("token symbol is empty".into()));
        }
        if self.supply == 0 {
            return Err(LaunchError::InvalidRecord("supply must be non-zero".into()));
        }
        Ok(())
    }
}

/// Result of a signed-and-submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResult {
    /// Transaction hash returned by the wallet adapter
    pub hash: String,
}

/// Record of a launched token as persisted by the marketplace backend.
/// Field names match the backend's JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchedToken {
    pub symbol: String,
    pub name: String,
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<u64>,
}

impl LaunchedToken {
    /// Required-field check before persistence. A record missing its symbol,
    /// name, or transaction hash must never reach the backend.
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.symbol.trim().is_empty() {
            return Err(LaunchError::InvalidRecord("missing symbol".into()));
        }
        if self.name.trim().is_empty() {
            return Err(LaunchError::InvalidRecord("missing name".into()));
        }
        if self.tx_hash.trim().is_empty() || !self.tx_hash.starts_with("0x") {
            return Err(LaunchError::InvalidRecord(format!(
                "malformed tx hash '{}'",
                self.tx_hash
            )));
        }
        Ok(())
    }
}

/// A chain-derived amount as the UI should display it.
///
/// A 404 on the underlying resource means "not yet initialized" and displays
/// as zero; any other failure displays as the `-` placeholder, which is a
/// distinct state from a zero balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayAmount {
    Value(u64),
    Unavailable,
}

impl DisplayAmount {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DisplayAmount::Value(v) => Some(*v),
            DisplayAmount::Unavailable => None,
        }
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayAmount::Value(v) => write!(f, "{}", v),
            DisplayAmount::Unavailable => f.write_str("-"),
        }
    }
}

/// A single turn of the copilot conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_from_plain_hex() {
        let addr = Address::normalize(&json!("0x0DBD9929394BF1a041494101445939f44def4c2d"))
            .expect("valid hex");
        assert_eq!(addr.as_str(), "0x0dbd9929394bf1a041494101445939f44def4c2d");
    }

    #[test]
    fn test_address_without_prefix() {
        let addr = Address::normalize(&json!("abc123")).expect("valid hex");
        assert_eq!(addr.as_str(), "0xabc123");
    }

    #[test]
    fn test_address_from_byte_array() {
        let addr = Address::normalize(&json!([13, 189, 153])).expect("valid bytes");
        assert_eq!(addr.as_str(), "0x0dbd99");
    }

    #[test]
    fn test_address_from_object() {
        let addr = Address::normalize(&json!({"address": "0xABC"})).expect("valid object");
        assert_eq!(addr.as_str(), "0xabc");
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(matches!(
            Address::normalize(&json!("not-hex")),
            Err(LaunchError::InvalidAddressFormat(_))
        ));
        assert!(matches!(
            Address::normalize(&json!(42)),
            Err(LaunchError::InvalidAddressFormat(_))
        ));
        assert!(matches!(
            Address::normalize(&json!([300])),
            Err(LaunchError::InvalidAddressFormat(_))
        ));
        assert!(matches!(
            Address::normalize(&json!({"foo": "0xabc"})),
            Err(LaunchError::InvalidAddressFormat(_))
        ));
    }

    #[test]
    fn test_launch_request_validation() {
        let good = LaunchRequest {
            name: "Moon".into(),
            symbol: "MOON".into(),
            supply: 1000,
            base_price: 1,
        };
        assert!(good.validate().is_ok());

        let mut bad = good.clone();
        bad.symbol = "  ".into();
        assert!(bad.validate().is_err());

        let mut bad = good;
        bad.supply = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_launched_token_validation() {
        let record = LaunchedToken {
            symbol: "MOON".into(),
            name: "Moon".into(),
            tx_hash: "0xabc".into(),
            creator: None,
            supply: Some(1000),
            base_price: Some(1),
        };
        assert!(record.validate().is_ok());

        let mut bad = record.clone();
        bad.tx_hash = "abc".into();
        assert!(matches!(bad.validate(), Err(LaunchError::InvalidRecord(_))));

        let mut bad = record;
        bad.name = String::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_display_amount_placeholder_distinct_from_zero() {
        assert_eq!(DisplayAmount::Value(0).to_string(), "0");
        assert_eq!(DisplayAmount::Unavailable.to_string(), "-");
        assert_ne!(DisplayAmount::Value(0), DisplayAmount::Unavailable);
    }

    #[test]
    fn test_launched_token_serializes_backend_field_names() {
        let record = LaunchedToken {
            symbol: "MOON".into(),
            name: "Moon".into(),
            tx_hash: "0xabc".into(),
            creator: Some(Address::from_hex("0x1").unwrap()),
            supply: Some(1000),
            base_price: Some(1),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tx_hash"], "0xabc");
        assert_eq!(json["base_price"], 1);
        assert_eq!(json["creator"], "0x1");
    }
}
