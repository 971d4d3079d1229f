use super::types::LedgerReference;
use super::{LedgerAnchorer, LedgerConfig, LedgerEnvironment};
use crate::error::{StampError, StampResult};
use crate::logger::LogLevel;
use crate::stamp_log;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

/// Simulated ledger anchorer
///
/// Synthesizes display-only references without any network calls or costs.
/// The run is the product's whole ledger story, so this is the only
/// implementation.
pub struct SimulatedLedger {
    /// Simulated network delay in milliseconds
    delay_ms: u64,

    /// Reject every anchor attempt
    fail_anchoring: bool,
}

impl SimulatedLedger {
    /// Create a simulated ledger with default settings
    pub fn new() -> Self {
        Self {
            delay_ms: 800,
            fail_anchoring: false,
        }
    }

    /// Create a simulated ledger with a custom delay
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            fail_anchoring: false,
        }
    }

    /// Create a simulated ledger with instant responses (no delay)
    pub fn instant() -> Self {
        Self::with_delay(0)
    }

    /// Create a simulated ledger that fails every anchor attempt
    pub fn failing() -> Self {
        Self {
            delay_ms: 0,
            fail_anchoring: true,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        match config.environment {
            LedgerEnvironment::Simulated => Self {
                delay_ms: config.delay_ms,
                fail_anchoring: config.fail_anchoring,
            },
        }
    }
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerAnchorer for SimulatedLedger {
    async fn anchor(&self, run_id: Uuid) -> StampResult<LedgerReference> {
        // Stand-in for network latency
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if self.fail_anchoring {
            stamp_log!(LogLevel::Warn, "Simulated ledger rejected run {}", run_id);
            return Err(StampError::LedgerAnchorFailed(
                "Simulated ledger rejected the anchor".to_string(),
            ));
        }

        let bytes: [u8; 32] = rand::thread_rng().gen();
        let reference = LedgerReference {
            anchored_at: Utc::now(),
            token: format!("0x{}", hex::encode(bytes)),
        };

        stamp_log!(
            LogLevel::Debug,
            "Simulated ledger anchored run {} as {}",
            run_id,
            reference.token
        );

        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anchor_yields_well_formed_token() {
        let ledger = SimulatedLedger::instant();

        let reference = ledger.anchor(Uuid::new_v4()).await.unwrap();

        assert!(reference.is_well_formed());
    }

    #[tokio::test]
    async fn test_anchor_tokens_are_unique() {
        let ledger = SimulatedLedger::instant();

        let first = ledger.anchor(Uuid::new_v4()).await.unwrap();
        let second = ledger.anchor(Uuid::new_v4()).await.unwrap();

        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn test_failing_ledger_errors() {
        let ledger = SimulatedLedger::failing();

        let result = ledger.anchor(Uuid::new_v4()).await;

        assert!(matches!(result, Err(StampError::LedgerAnchorFailed(_))));
    }

    #[tokio::test]
    async fn test_anchor_with_delay() {
        let ledger = SimulatedLedger::with_delay(50);

        let start = std::time::Instant::now();
        let _reference = ledger.anchor(Uuid::new_v4()).await.unwrap();
        let elapsed = start.elapsed();

        // The configured delay is a lower bound on wall time
        assert!(elapsed.as_millis() >= 50);
    }

    #[test]
    fn test_from_config_applies_settings() {
        let config = LedgerConfig {
            environment: LedgerEnvironment::Simulated,
            delay_ms: 5,
            fail_anchoring: true,
        };

        let ledger = SimulatedLedger::from_config(&config);

        assert_eq!(ledger.delay_ms, 5);
        assert!(ledger.fail_anchoring);
    }
}
