pub mod config;
pub mod simulated;
pub mod types;

pub use config::{LedgerConfig, LedgerEnvironment};
pub use simulated::SimulatedLedger;
pub use types::LedgerReference;

use crate::error::StampResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Trait for ledger anchoring implementations
#[async_trait]
pub trait LedgerAnchorer: Send + Sync {
    /// Record a completed run, yielding a display-only reference
    async fn anchor(&self, run_id: Uuid) -> StampResult<LedgerReference>;
}
