/// State transition implementations
///
/// Transitions consume the session in its current state and hand back the next
/// one, so a transition the current state does not offer simply does not compile.
use super::states::*;
use super::WatermarkSession;
use crate::options::WatermarkRequest;
use crate::pipeline::PipelineResult;
use uuid::Uuid;

// ============================================================================
// Idle State Transitions
// ============================================================================

impl WatermarkSession<Idle> {
    /// Create a new idle session
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            state: Idle::new(),
        }
    }

    /// Transition to Validating state
    pub fn validate(self) -> WatermarkSession<Validating> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Validating::new(),
        }
    }
}

impl Default for WatermarkSession<Idle> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Validating State Transitions
// ============================================================================

impl WatermarkSession<Validating> {
    /// Transition to Staging state
    pub fn stage(self, request: WatermarkRequest) -> WatermarkSession<Staging> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Staging::new(request),
        }
    }

    /// Transition to Failed state
    pub fn fail(self, error: String) -> WatermarkSession<Failed> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Failed::new(error, FailedPhase::Validating),
        }
    }
}

// ============================================================================
// Staging State Transitions
// ============================================================================

impl WatermarkSession<Staging> {
    /// Transition to Anchoring state
    pub fn anchor(self) -> WatermarkSession<Anchoring> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Anchoring::from_staging(self.state),
        }
    }

    /// Transition to Complete state
    pub fn complete(self, result: PipelineResult) -> WatermarkSession<Complete> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Complete::new(self.state.started_at, result),
        }
    }

    /// Transition to Failed state
    pub fn fail(self, error: String) -> WatermarkSession<Failed> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Failed::new(error, FailedPhase::Staging),
        }
    }
}

// ============================================================================
// Anchoring State Transitions
// ============================================================================

impl WatermarkSession<Anchoring> {
    /// Transition to Complete state
    pub fn complete(self, result: PipelineResult) -> WatermarkSession<Complete> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Complete::new(self.state.started_at, result),
        }
    }

    /// Transition to Failed state
    pub fn fail(self, error: String) -> WatermarkSession<Failed> {
        WatermarkSession {
            session_id: self.session_id,
            created_at: self.created_at,
            state: Failed::new(error, FailedPhase::Anchoring),
        }
    }
}
