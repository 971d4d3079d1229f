/// State Machine for Watermarking Sessions
///
/// This module implements a type-safe state machine that enforces valid state
/// transitions at compile time. Invalid states and transitions are impossible
/// to represent.
///
/// # States
///
/// - `Idle` - No run in flight
/// - `Validating` - Collecting form input into a request
/// - `Staging` - Running the simulated watermark stages
/// - `Anchoring` - Recording the run to the simulated ledger
/// - `Complete` - Result ready for presentation
/// - `Failed` - Error occurred
///
/// Reset is legal from every state and always yields a fresh `Idle` session
/// with a new session ID, so a late result from a previous run can never be
/// mistaken for the current one.
///
/// # Example
///
/// ```ignore
/// use shadowstamp::session::WatermarkSession;
///
/// let session = WatermarkSession::new();
/// let session = session.validate();
/// let session = session.stage(request);
/// let session = session.anchor();
/// let session = session.complete(result);
/// let session = session.reset();
/// ```
pub mod states;
pub mod transitions;
pub mod wrapper;

pub use states::*;
pub use wrapper::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Watermarking session with type-safe state
///
/// The parameter `S` names the state the session is currently in, so the
/// compiler only accepts the operations that state actually supports.
#[derive(Debug, Clone)]
pub struct WatermarkSession<S> {
    /// Unique session identifier
    pub session_id: Uuid,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// State-specific payload for the current state
    pub state: S,
}

impl<S> WatermarkSession<S> {
    /// Get the session ID
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Get the session creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reset to a fresh Idle session
    ///
    /// Legal from every state. The new session gets a new ID so anything
    /// still holding the old one is recognizably stale.
    pub fn reset(self) -> WatermarkSession<states::Idle> {
        WatermarkSession {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: states::Idle::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_access() {
        let session = WatermarkSession {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: states::Idle,
        };

        assert_eq!(session.session_id(), session.session_id);
        assert!(session.created_at() <= Utc::now());
    }

    #[test]
    fn test_reset_issues_new_session_id() {
        let session = WatermarkSession {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: states::Idle,
        };
        let original_id = session.session_id();

        let session = session.reset();

        assert_ne!(session.session_id(), original_id);
    }
}
