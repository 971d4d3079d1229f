use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter shared between the studio and in-flight runs
///
/// Selecting or removing a file bumps the generation; every emission point
/// re-checks its ticket against it, so a reset mid-run silences the rest of
/// the run instead of letting stale callbacks land on fresh state.
#[derive(Debug, Clone, Default)]
pub struct ResetHandle {
    generation: Arc<AtomicU64>,
}

impl ResetHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every outstanding ticket
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Snapshot the current generation for a new run
    pub fn ticket(&self) -> RunTicket {
        RunTicket {
            generation: Arc::clone(&self.generation),
            issued_at: self.generation.load(Ordering::SeqCst),
        }
    }
}

/// The generation a run was started under
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: Arc<AtomicU64>,
    issued_at: u64,
}

impl RunTicket {
    /// True once a reset happened after this ticket was issued
    pub fn is_stale(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ticket_is_current() {
        let handle = ResetHandle::new();
        let ticket = handle.ticket();
        assert!(!ticket.is_stale());
    }

    #[test]
    fn test_reset_invalidates_outstanding_tickets() {
        let handle = ResetHandle::new();
        let ticket = handle.ticket();

        handle.reset();

        assert!(ticket.is_stale());
    }

    #[test]
    fn test_ticket_issued_after_reset_is_current() {
        let handle = ResetHandle::new();
        handle.reset();

        let ticket = handle.ticket();

        assert!(!ticket.is_stale());
    }

    #[test]
    fn test_clones_share_the_generation() {
        let handle = ResetHandle::new();
        let ticket = handle.ticket();

        handle.clone().reset();

        assert!(ticket.is_stale());
    }
}
