/// Type-erased wrapper for WatermarkSession<S>
///
/// The studio has to keep one session behind a mutex no matter which state it
/// is in, so this enum erases the state parameter while the transition methods
/// still route through the typed API underneath.
use super::states::*;
use super::WatermarkSession;
use crate::error::{StampError, StampResult};
use crate::events::{EventEmitter, EventSink};
use crate::options::WatermarkRequest;
use crate::pipeline::PipelineResult;
use uuid::Uuid;

/// Wrapper enum that can hold WatermarkSession in any state
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle(WatermarkSession<Idle>),
    Validating(WatermarkSession<Validating>),
    Staging(WatermarkSession<Staging>),
    Anchoring(WatermarkSession<Anchoring>),
    Complete(WatermarkSession<Complete>),
    Failed(WatermarkSession<Failed>),
}

impl SessionState {
    /// Create a new idle session
    pub fn new() -> Self {
        Self::Idle(WatermarkSession::new())
    }

    /// Get the session ID
    pub fn session_id(&self) -> Uuid {
        match self {
            Self::Idle(s) => s.session_id(),
            Self::Validating(s) => s.session_id(),
            Self::Staging(s) => s.session_id(),
            Self::Anchoring(s) => s.session_id(),
            Self::Complete(s) => s.session_id(),
            Self::Failed(s) => s.session_id(),
        }
    }

    /// Get the current state as a string
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle(_) => "Idle",
            Self::Validating(_) => "Validating",
            Self::Staging(_) => "Staging",
            Self::Anchoring(_) => "Anchoring",
            Self::Complete(_) => "Complete",
            Self::Failed(_) => "Failed",
        }
    }

    /// Check if a run is in flight (not idle, complete, or failed)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Validating(_) | Self::Staging(_) | Self::Anchoring(_)
        )
    }

    /// Transition to Validating state (only from Idle)
    pub fn validate(self, sink: &dyn EventSink) -> StampResult<Self> {
        match self {
            Self::Idle(session) => {
                let session = session.validate();

                // Emit event
                let _ = EventEmitter::session_state_changed(
                    sink,
                    session.session_id(),
                    "Validating",
                );

                Ok(Self::Validating(session))
            }
            _ => Err(StampError::InvalidStateTransition(format!(
                "Cannot validate from {} state",
                self.state_name()
            ))),
        }
    }

    /// Transition to Staging state (only from Validating)
    pub fn stage(self, request: WatermarkRequest, sink: &dyn EventSink) -> StampResult<Self> {
        match self {
            Self::Validating(session) => {
                let session = session.stage(request);

                // Emit event
                let _ =
                    EventEmitter::session_state_changed(sink, session.session_id(), "Staging");

                Ok(Self::Staging(session))
            }
            _ => Err(StampError::InvalidStateTransition(format!(
                "Cannot stage from {} state",
                self.state_name()
            ))),
        }
    }

    /// Transition to Anchoring state (only from Staging)
    pub fn anchor(self, sink: &dyn EventSink) -> StampResult<Self> {
        match self {
            Self::Staging(session) => {
                let session = session.anchor();

                // Emit event
                let _ =
                    EventEmitter::session_state_changed(sink, session.session_id(), "Anchoring");

                Ok(Self::Anchoring(session))
            }
            _ => Err(StampError::InvalidStateTransition(format!(
                "Cannot anchor from {} state",
                self.state_name()
            ))),
        }
    }

    /// Transition to Complete state (from Staging or Anchoring)
    pub fn complete(self, result: PipelineResult, sink: &dyn EventSink) -> StampResult<Self> {
        match self {
            Self::Staging(session) => {
                let session = session.complete(result);

                // Emit event
                let _ =
                    EventEmitter::session_state_changed(sink, session.session_id(), "Complete");

                Ok(Self::Complete(session))
            }
            Self::Anchoring(session) => {
                let session = session.complete(result);

                // Emit event
                let _ =
                    EventEmitter::session_state_changed(sink, session.session_id(), "Complete");

                Ok(Self::Complete(session))
            }
            _ => Err(StampError::InvalidStateTransition(format!(
                "Cannot complete from {} state",
                self.state_name()
            ))),
        }
    }

    /// Transition to Failed state (from any state)
    pub fn fail(self, error: String, sink: &dyn EventSink) -> Self {
        let failed_session = match self {
            Self::Idle(session) => Self::Failed(WatermarkSession {
                session_id: session.session_id,
                created_at: session.created_at,
                state: Failed::new(error, FailedPhase::Validating),
            }),
            Self::Validating(session) => Self::Failed(session.fail(error)),
            Self::Staging(session) => Self::Failed(session.fail(error)),
            Self::Anchoring(session) => Self::Failed(session.fail(error)),
            Self::Complete(session) => Self::Failed(WatermarkSession {
                session_id: session.session_id,
                created_at: session.created_at,
                state: Failed::new(error, FailedPhase::Anchoring),
            }),
            Self::Failed(session) => Self::Failed(session), // Already failed
        };

        // Emit event
        let _ = EventEmitter::session_state_changed(
            sink,
            failed_session.session_id(),
            "Failed",
        );

        failed_session
    }

    /// Transition back to Idle state (legal from every state)
    ///
    /// The fresh session gets a new ID.
    pub fn reset(self, sink: &dyn EventSink) -> Self {
        let session = match self {
            Self::Idle(s) => s.reset(),
            Self::Validating(s) => s.reset(),
            Self::Staging(s) => s.reset(),
            Self::Anchoring(s) => s.reset(),
            Self::Complete(s) => s.reset(),
            Self::Failed(s) => s.reset(),
        };

        // Emit event
        let _ = EventEmitter::session_state_changed(sink, session.session_id(), "Idle");

        Self::Idle(session)
    }

    /// Get the request if a run is in flight
    pub fn request(&self) -> Option<&WatermarkRequest> {
        match self {
            Self::Staging(s) => Some(&s.state.request),
            Self::Anchoring(s) => Some(&s.state.request),
            _ => None,
        }
    }

    /// Get the result if completed
    pub fn result(&self) -> Option<&PipelineResult> {
        match self {
            Self::Complete(s) => Some(&s.state.result),
            _ => None,
        }
    }

    /// Get the error message if failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(s) => Some(&s.state.error),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
