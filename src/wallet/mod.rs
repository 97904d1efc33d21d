//! Wallet boundary: entry-function payloads and the signing session seam.

pub mod payload;
pub mod session;
pub mod simulated;

pub use payload::{EntryFunctionData, EntryFunctionPayload, PayloadBuilder};
pub use session::{AccountInfo, WalletSession};
pub use simulated::{DisconnectedWallet, SimulatedWallet};
