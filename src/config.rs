use crate::ledger::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and ledger knobs for the studio
///
/// Every delay in the simulation is sourced from here so tests can collapse
/// the cadence without touching the flow logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Delay before each pipeline stage emission, in milliseconds
    pub stage_tick_ms: u64,

    /// Delay before each verify progress emission, in milliseconds
    pub verify_tick_ms: u64,

    /// Progress added per verify emission
    pub verify_step: u8,

    /// Pause between the last verify emission and the outcome, in milliseconds
    pub settle_delay_ms: u64,

    /// Ledger configuration
    pub ledger: LedgerConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            stage_tick_ms: 400,
            verify_tick_ms: 200,
            verify_step: 10,
            settle_delay_ms: 500,
            ledger: LedgerConfig::default(),
        }
    }
}

impl StudioConfig {
    /// All delays collapsed to zero, for tests
    pub fn instant() -> Self {
        let mut config = Self::default();
        config.stage_tick_ms = 0;
        config.verify_tick_ms = 0;
        config.settle_delay_ms = 0;
        config.ledger.delay_ms = 0;
        config
    }

    pub fn stage_tick(&self) -> Duration {
        Duration::from_millis(self.stage_tick_ms)
    }

    pub fn verify_tick(&self) -> Duration {
        Duration::from_millis(self.verify_tick_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
