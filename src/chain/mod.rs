//! Read-only chain access over the fullnode REST API.

pub mod query;

pub use query::{ChainClient, TableItemRequest};
