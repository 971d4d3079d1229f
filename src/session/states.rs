/// State type definitions for the watermarking state machine
///
/// Every state gets its own type, and whatever data a state needs travels
/// inside that type rather than in optional fields on a shared struct.
use crate::options::WatermarkRequest;
use crate::pipeline::PipelineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Idle state - No run in flight
///
/// This is the initial state and the state after a session is reset.
#[derive(Debug, Clone)]
pub struct Idle;

/// Validating state - Collecting form input into a request
///
/// The option collector is checking the form against the staged file.
#[derive(Debug, Clone)]
pub struct Validating {
    /// When validation started
    pub started_at: DateTime<Utc>,
}

/// Staging state - Running the simulated watermark stages
///
/// The pipeline runner is emitting stage progress on its tick.
#[derive(Debug, Clone)]
pub struct Staging {
    /// When staging started
    pub started_at: DateTime<Utc>,

    /// The request being processed
    pub request: WatermarkRequest,
}

/// Anchoring state - Recording the run to the simulated ledger
///
/// Entered only when the request asked for ledger anchoring.
#[derive(Debug, Clone)]
pub struct Anchoring {
    /// When staging started
    pub started_at: DateTime<Utc>,

    /// When the ledger sub-stage began
    pub anchor_started_at: DateTime<Utc>,

    /// The request being processed
    pub request: WatermarkRequest,
}

/// Complete state - Result ready for presentation
///
/// The run finished; the result carries the applied request, the optional
/// ledger reference and the optional overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complete {
    /// When staging started
    pub started_at: DateTime<Utc>,

    /// When the run completed
    pub completed_at: DateTime<Utc>,

    /// The finished run
    pub result: PipelineResult,
}

/// Failed state - Error occurred
///
/// An error occurred during any phase of the run.
#[derive(Debug, Clone)]
pub struct Failed {
    /// When the failure occurred
    pub failed_at: DateTime<Utc>,

    /// Error message
    pub error: String,

    /// Which phase failed
    pub failed_phase: FailedPhase,
}

/// Phase where failure occurred
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FailedPhase {
    /// Failed while collecting options
    Validating,

    /// Failed while running the stages
    Staging,

    /// Failed while anchoring to the ledger
    Anchoring,
}

impl Idle {
    /// Create a new Idle state
    pub fn new() -> Self {
        Self
    }
}

impl Default for Idle {
    fn default() -> Self {
        Self::new()
    }
}

impl Validating {
    /// Create a new Validating state
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

impl Staging {
    /// Create a new Staging state
    pub fn new(request: WatermarkRequest) -> Self {
        Self {
            started_at: Utc::now(),
            request,
        }
    }

    /// Get staging duration so far
    pub fn duration(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl Anchoring {
    /// Create a new Anchoring state from Staging
    pub fn from_staging(staging: Staging) -> Self {
        Self {
            started_at: staging.started_at,
            anchor_started_at: Utc::now(),
            request: staging.request,
        }
    }
}

impl Complete {
    /// Create a new Complete state
    pub fn new(started_at: DateTime<Utc>, result: PipelineResult) -> Self {
        Self {
            started_at,
            completed_at: Utc::now(),
            result,
        }
    }

    /// Get total time from staging start to completion
    pub fn total_duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}

impl Failed {
    /// Create a new Failed state
    pub fn new(error: String, failed_phase: FailedPhase) -> Self {
        Self {
            failed_at: Utc::now(),
            error,
            failed_phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{TransformAlgorithm, WatermarkKind};

    fn test_request() -> WatermarkRequest {
        WatermarkRequest {
            watermark_kind: WatermarkKind::Text,
            text: Some("Confidential".to_string()),
            algorithm: TransformAlgorithm::Dct,
            anchor_to_ledger: true,
            ar_enabled: false,
            ar_link: None,
            file_name: "contract.pdf".to_string(),
            file_mime: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_idle_creation() {
        let idle = Idle::new();
        assert!(matches!(idle, Idle));
    }

    #[test]
    fn test_validating_creation() {
        let validating = Validating::new();
        assert!(validating.started_at <= Utc::now());
    }

    #[test]
    fn test_staging_duration() {
        let staging = Staging::new(test_request());

        let duration = staging.duration();
        assert!(duration.num_milliseconds() >= 0);
    }

    #[test]
    fn test_anchoring_from_staging() {
        let staging = Staging::new(test_request());
        let started_at = staging.started_at;

        let anchoring = Anchoring::from_staging(staging);

        assert_eq!(anchoring.started_at, started_at);
        assert!(anchoring.anchor_started_at >= started_at);
        assert_eq!(anchoring.request.file_name, "contract.pdf");
    }

    #[test]
    fn test_failed_creation() {
        let failed = Failed::new("anchor rejected".to_string(), FailedPhase::Anchoring);

        assert_eq!(failed.error, "anchor rejected");
        assert!(matches!(failed.failed_phase, FailedPhase::Anchoring));
    }
}
