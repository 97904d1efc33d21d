//! Token-launch orchestration.

pub mod orchestrator;

pub use orchestrator::{LaunchOrchestrator, LaunchOutcome, LaunchPhase, LaunchWarning};
