//! Entry-function payload construction for the on-chain Move modules.
//!
//! The wallet adapter contract takes a payload of the form
//! `{ sender, data: { function: "<addr>::<Module>::<fn>", typeArguments,
//! functionArguments } }` and returns `{ hash }` or throws. The builders here
//! cover every entry function the client invokes on `PromptToken`,
//! `BondingCurve`, and `XPSystem`.

use crate::types::Address;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The `data` half of a wallet submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFunctionData {
    /// Fully-qualified `<contract_address>::<Module>::<fn>`
    pub function: String,
    #[serde(rename = "typeArguments")]
    pub type_arguments: Vec<String>,
    #[serde(rename = "functionArguments")]
    pub function_arguments: Vec<Value>,
}

/// A complete payload for `signAndSubmitTransaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    pub sender: Address,
    pub data: EntryFunctionData,
}

impl EntryFunctionPayload {
    /// Short name of the entry function, e.g. `create_token`.
    pub fn function_name(&self) -> &str {
        self.data
            .function
            .rsplit("::")
            .next()
            .unwrap_or(&self.data.function)
    }

    /// Module the entry function belongs to, e.g. `PromptToken`.
    pub fn module_name(&self) -> &str {
        let mut parts = self.data.function.rsplit("::");
        parts.next();
        parts.next().unwrap_or(&self.data.function)
    }
}

/// Builds payloads against one contract deployment.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    contract_address: String,
}

impl PayloadBuilder {
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
        }
    }

    fn entry(
        &self,
        sender: &Address,
        module: &str,
        function: &str,
        arguments: Vec<Value>,
    ) -> EntryFunctionPayload {
        EntryFunctionPayload {
            sender: sender.clone(),
            data: EntryFunctionData {
                function: format!("{}::{}::{}", self.contract_address, module, function),
                type_arguments: Vec::new(),
                function_arguments: arguments,
            },
        }
    }

    // --- PromptToken ---

    /// Idempotent token-registry setup; fails on-chain if already initialized.
    pub fn init_store(&self, sender: &Address) -> EntryFunctionPayload {
        self.entry(sender, "PromptToken", "init_store", vec![])
    }

    pub fn create_token(
        &self,
        sender: &Address,
        name: &str,
        symbol: &str,
        supply: u64,
    ) -> EntryFunctionPayload {
        self.entry(
            sender,
            "PromptToken",
            "create_token",
            vec![json!(name), json!(symbol), json!(supply)],
        )
    }

    // --- BondingCurve ---

    /// Idempotent curve-registry setup.
    pub fn init_curve_store(&self, sender: &Address) -> EntryFunctionPayload {
        self.entry(sender, "BondingCurve", "init_curve_store", vec![])
    }

    pub fn launch_token(
        &self,
        sender: &Address,
        symbol: &str,
        base_price: u64,
    ) -> EntryFunctionPayload {
        self.entry(
            sender,
            "BondingCurve",
            "launch_token",
            vec![json!(symbol), json!(base_price)],
        )
    }

    pub fn buy_token(
        &self,
        sender: &Address,
        symbol: &str,
        amount: u64,
        payment: u64,
    ) -> EntryFunctionPayload {
        self.entry(
            sender,
            "BondingCurve",
            "buy_token",
            vec![json!(symbol), json!(amount), json!(payment)],
        )
    }

    pub fn sell_token(&self, sender: &Address, symbol: &str, amount: u64) -> EntryFunctionPayload {
        self.entry(
            sender,
            "BondingCurve",
            "sell_token",
            vec![json!(symbol), json!(amount)],
        )
    }

    // --- XPSystem ---

    pub fn init_xp(&self, sender: &Address) -> EntryFunctionPayload {
        self.entry(sender, "XPSystem", "init_xp", vec![])
    }

    pub fn add_xp(&self, sender: &Address, user: &Address, amount: u64) -> EntryFunctionPayload {
        self.entry(
            sender,
            "XPSystem",
            "add_xp",
            vec![json!(user.as_str()), json!(amount)],
        )
    }
}
