use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Environment the anchorer runs against
    pub environment: LedgerEnvironment,

    /// Simulated network delay in milliseconds
    pub delay_ms: u64,

    /// Force every anchor attempt to fail (exercises the failure path)
    pub fail_anchoring: bool,
}

/// Ledger environment
///
/// Only the simulated environment exists; real networks are out of scope
/// and would slot in here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEnvironment {
    /// Simulated implementation (no network, no costs)
    Simulated,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            environment: LedgerEnvironment::Simulated,
            delay_ms: 800,
            fail_anchoring: false,
        }
    }
}
