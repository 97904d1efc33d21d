//! Fullnode REST adapter for account resources, table items, and balances.
//!
//! Resource types are fully-qualified `<contract_address>::<Module>::<Resource>`
//! strings; table lookups take a `{key_type, value_type, key}` triple matching
//! the on-chain table's declared types. A 404 on any fetch means "not yet
//! initialized" and maps to `None`/zero, never to an error. There is no
//! caching, no retry, and no rate limiting here.

use crate::error::LaunchError;
use crate::types::{Address, DisplayAmount};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// APT coin store resource type on any Aptos network.
const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Typed key triple for a table-item lookup.
#[derive(Debug, Clone, Serialize)]
pub struct TableItemRequest {
    pub key_type: String,
    pub value_type: String,
    pub key: Value,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    sequence_number: String,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    data: Value,
}

/// Read-only client for one fullnode endpoint.
#[derive(Debug, Clone)]
pub struct ChainClient {
    http_client: Client,
    node_url: String,
    contract_address: String,
}

impl ChainClient {
    pub fn new(http_client: Client, node_url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            http_client,
            node_url: node_url.into(),
            contract_address: contract_address.into(),
        }
    }

    /// Fetch an account resource by fully-qualified type.
    /// 404 means the resource does not exist yet and maps to `None`.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn account_resource(
        &self,
        address: &Address,
        resource_type: &str,
    ) -> Result<Option<Value>, LaunchError> {
        let url = format!(
            "{}/accounts/{}/resource/{}",
            self.node_url,
            address,
            encode_resource_type(resource_type)
        );
        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("resource {} not found for {}", resource_type, address);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LaunchError::Chain(format!(
                "resource fetch returned {} for {}",
                status, resource_type
            )));
        }

        let body: ResourceResponse = response.json().await?;
        Ok(Some(body.data))
    }

    /// Look up one item in an on-chain table by handle and typed key.
    /// 404 means the key has no entry and maps to `None`.
    #[instrument(skip(self, request), fields(handle = %handle))]
    pub async fn table_item(
        &self,
        handle: &str,
        request: &TableItemRequest,
    ) -> Result<Option<Value>, LaunchError> {
        let url = format!("{}/tables/{}/item", self.node_url, handle);
        let response = self.http_client.post(&url).json(request).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("table {} has no entry for key", handle);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LaunchError::Chain(format!(
                "table item fetch returned {}",
                status
            )));
        }

        Ok(Some(response.json().await?))
    }

    /// Current sequence number of an account.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn account_sequence_number(&self, address: &Address) -> Result<u64, LaunchError> {
        let url = format!("{}/accounts/{}", self.node_url, address);
        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LaunchError::Chain(format!(
                "account fetch returned {}",
                status
            )));
        }
        let body: AccountInfoResponse = response.json().await?;
        body.sequence_number
            .parse()
            .map_err(|_| LaunchError::Chain("unparseable sequence number".into()))
    }

    /// APT balance for display: 404 is a zero balance, any other failure is
    /// the `-` placeholder.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn apt_balance(&self, address: &Address) -> DisplayAmount {
        let fetched = self.account_resource(address, APT_COIN_STORE).await;
        if let Err(e) = &fetched {
            warn!("balance fetch failed for {}: {}", address, e);
        }
        display_from_resource(fetched, &["coin", "value"])
    }

    /// XP balance for display, read from the `XPSystem::XPStore` points table.
    /// A missing store or missing table entry is zero.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn xp(&self, address: &Address) -> DisplayAmount {
        let store_type = format!("{}::XPSystem::XPStore", self.contract_address);
        let data = match self.account_resource(address, &store_type).await {
            Ok(Some(data)) => data,
            Ok(None) => return DisplayAmount::Value(0),
            Err(e) => {
                warn!("XP store fetch failed for {}: {}", address, e);
                return DisplayAmount::Unavailable;
            }
        };

        let handle = match data
            .get("points")
            .and_then(|p| p.get("handle"))
            .and_then(Value::as_str)
        {
            Some(h) => h.to_string(),
            None => {
                warn!("XP store for {} has no points table handle", address);
                return DisplayAmount::Unavailable;
            }
        };

        let request = TableItemRequest {
            key_type: "address".to_string(),
            value_type: "u64".to_string(),
            key: Value::String(address.as_str().to_string()),
        };
        match self.table_item(&handle, &request).await {
            Ok(Some(value)) => parse_u64_value(&value)
                .map(DisplayAmount::Value)
                .unwrap_or(DisplayAmount::Unavailable),
            // No entry yet: the user simply has no XP.
            Ok(None) => DisplayAmount::Value(0),
            Err(e) => {
                warn!("XP table lookup failed for {}: {}", address, e);
                DisplayAmount::Unavailable
            }
        }
    }

    /// Whether a bonding curve exists for a symbol under the contract's
    /// `BondingCurve::CurveStore` registry.
    #[instrument(skip(self))]
    pub async fn curve_exists(&self, symbol: &str) -> Result<bool, LaunchError> {
        let contract = Address::from_hex(&self.contract_address)?;
        let store_type = format!("{}::BondingCurve::CurveStore", self.contract_address);
        let data = match self.account_resource(&contract, &store_type).await? {
            Some(data) => data,
            None => return Ok(false),
        };

        let handle = data
            .get("curves")
            .and_then(|c| c.get("handle"))
            .and_then(Value::as_str)
            .ok_or_else(|| LaunchError::Chain("curve store has no table handle".into()))?;

        let request = TableItemRequest {
            key_type: "0x1::string::String".to_string(),
            value_type: format!("{}::BondingCurve::Curve", self.contract_address),
            key: Value::String(symbol.to_string()),
        };
        Ok(self.table_item(handle, &request).await?.is_some())
    }
}

/// Percent-encode a resource type string for use as a URL path segment.
/// Only the characters that actually occur in fully-qualified Move type
/// names need escaping.
pub fn encode_resource_type(resource_type: &str) -> String {
    let mut out = String::with_capacity(resource_type.len());
    for c in resource_type.chars() {
        match c {
            ':' => out.push_str("%3A"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            ',' => out.push_str("%2C"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

/// Map a resource-fetch result to a displayable amount: a missing resource
/// (404) is a zero balance, any other failure is the `-` placeholder, and a
/// present resource yields the u64 at `path`.
fn display_from_resource(
    fetched: Result<Option<Value>, LaunchError>,
    path: &[&str],
) -> DisplayAmount {
    match fetched {
        Ok(Some(data)) => parse_u64_field(&data, path)
            .map(DisplayAmount::Value)
            .unwrap_or(DisplayAmount::Unavailable),
        Ok(None) => DisplayAmount::Value(0),
        Err(_) => DisplayAmount::Unavailable,
    }
}

/// Dig a u64 out of a nested JSON object. Fullnodes serialize u64 and u128
/// values as strings.
fn parse_u64_field(data: &Value, path: &[&str]) -> Option<u64> {
    let mut current = data;
    for key in path {
        current = current.get(key)?;
    }
    parse_u64_value(current)
}

fn parse_u64_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
