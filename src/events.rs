use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Event names, kept in one place so emitters and listeners agree
pub mod event_names {
    pub const SESSION_STATE_CHANGED: &str = "session:state-changed";
    pub const PIPELINE_STARTED: &str = "pipeline:started";
    pub const PIPELINE_PROGRESS: &str = "pipeline:progress";
    pub const PIPELINE_COMPLETED: &str = "pipeline:completed";
    pub const PIPELINE_FAILED: &str = "pipeline:failed";
    pub const LEDGER_ANCHOR_STARTED: &str = "ledger:anchor-started";
    pub const LEDGER_ANCHOR_COMPLETED: &str = "ledger:anchor-completed";
    pub const LEDGER_ANCHOR_FAILED: &str = "ledger:anchor-failed";
    pub const VERIFY_PROGRESS: &str = "verify:progress";
    pub const VERIFY_COMPLETED: &str = "verify:completed";
}

/// Destination for core events.
///
/// UI shells plug in whatever transport they have (a desktop IPC bridge, a
/// test buffer, a channel); the core only knows this trait.
pub trait EventSink: Send + Sync {
    fn emit(&self, name: &str, payload: Value) -> Result<(), String>;
}

/// A named event as delivered to a sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub payload: Value,
}

/// Sink that drops every event, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _name: &str, _payload: Value) -> Result<(), String> {
        Ok(())
    }
}

/// Sink that collects events in memory, in emission order
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn records(&self) -> Vec<EventRecord> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Drain the buffer, returning the events in emission order
    pub fn take(&self) -> Vec<EventRecord> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

impl EventSink for BufferSink {
    fn emit(&self, name: &str, payload: Value) -> Result<(), String> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| "Event buffer lock poisoned".to_string())?;
        events.push(EventRecord {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}

/// Sink that forwards events over a tokio channel
pub struct ChannelSink {
    sender: tokio::sync::mpsc::UnboundedSender<EventRecord>,
}

impl ChannelSink {
    pub fn new(sender: tokio::sync::mpsc::UnboundedSender<EventRecord>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, name: &str, payload: Value) -> Result<(), String> {
        self.sender
            .send(EventRecord {
                name: name.to_string(),
                payload,
            })
            .map_err(|_| "Event channel closed".to_string())
    }
}

/// Session state change event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateChangedEvent {
    pub session_id: Uuid,
    pub state: String, // "Idle", "Validating", "Staging", "Anchoring", "Complete", "Failed"
    pub timestamp: String,
}

/// Pipeline started event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStartedEvent {
    pub run_id: Uuid,
    pub file_name: String,
    pub total_stages: usize,
    pub timestamp: String,
}

/// Pipeline progress event (one per stage emission)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineProgressEvent {
    pub run_id: Uuid,
    pub stage_label: String,
    pub progress: u8,
    pub timestamp: String,
}

/// Pipeline completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineCompletedEvent {
    pub run_id: Uuid,
    pub total_duration_ms: u64,
    pub ledger_anchored: bool,
    pub timestamp: String,
}

/// Pipeline failed event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFailedEvent {
    pub run_id: Uuid,
    pub failed_stage: String,
    pub error: String,
    pub timestamp: String,
}

/// Ledger anchor started event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAnchorStartedEvent {
    pub run_id: Uuid,
    pub timestamp: String,
}

/// Ledger anchor completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAnchorCompletedEvent {
    pub run_id: Uuid,
    pub reference: String,
    pub timestamp: String,
}

/// Ledger anchor failed event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAnchorFailedEvent {
    pub run_id: Uuid,
    pub error: String,
    pub timestamp: String,
}

/// Verify progress event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyProgressEvent {
    pub verify_id: Uuid,
    pub progress: u8,
    pub timestamp: String,
}

/// Verify completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCompletedEvent {
    pub verify_id: Uuid,
    pub authentic: bool,
    pub timestamp: String,
}

fn emit<T: Serialize>(sink: &dyn EventSink, name: &str, event: T) -> Result<(), String> {
    let payload = serde_json::to_value(event)
        .map_err(|e| format!("Failed to serialize {} event: {}", name, e))?;
    sink.emit(name, payload)
}

/// Typed emission helpers for every event the studio produces
pub struct EventEmitter;

impl EventEmitter {
    /// Emit session state changed event
    pub fn session_state_changed(
        sink: &dyn EventSink,
        session_id: Uuid,
        state: &str,
    ) -> Result<(), String> {
        let event = SessionStateChangedEvent {
            session_id,
            state: state.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::SESSION_STATE_CHANGED, event)
    }

    /// Emit pipeline started event
    pub fn pipeline_started(
        sink: &dyn EventSink,
        run_id: Uuid,
        file_name: &str,
        total_stages: usize,
    ) -> Result<(), String> {
        let event = PipelineStartedEvent {
            run_id,
            file_name: file_name.to_string(),
            total_stages,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::PIPELINE_STARTED, event)
    }

    /// Emit pipeline progress event
    pub fn pipeline_progress(
        sink: &dyn EventSink,
        run_id: Uuid,
        stage_label: &str,
        progress: u8,
    ) -> Result<(), String> {
        let event = PipelineProgressEvent {
            run_id,
            stage_label: stage_label.to_string(),
            progress,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::PIPELINE_PROGRESS, event)
    }

    /// Emit pipeline completed event
    pub fn pipeline_completed(
        sink: &dyn EventSink,
        run_id: Uuid,
        total_duration_ms: u64,
        ledger_anchored: bool,
    ) -> Result<(), String> {
        let event = PipelineCompletedEvent {
            run_id,
            total_duration_ms,
            ledger_anchored,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::PIPELINE_COMPLETED, event)
    }

    /// Emit pipeline failed event
    pub fn pipeline_failed(
        sink: &dyn EventSink,
        run_id: Uuid,
        failed_stage: &str,
        error: &str,
    ) -> Result<(), String> {
        let event = PipelineFailedEvent {
            run_id,
            failed_stage: failed_stage.to_string(),
            error: error.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::PIPELINE_FAILED, event)
    }

    /// Emit ledger anchor started event
    pub fn ledger_anchor_started(sink: &dyn EventSink, run_id: Uuid) -> Result<(), String> {
        let event = LedgerAnchorStartedEvent {
            run_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::LEDGER_ANCHOR_STARTED, event)
    }

    /// Emit ledger anchor completed event
    pub fn ledger_anchor_completed(
        sink: &dyn EventSink,
        run_id: Uuid,
        reference: &str,
    ) -> Result<(), String> {
        let event = LedgerAnchorCompletedEvent {
            run_id,
            reference: reference.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::LEDGER_ANCHOR_COMPLETED, event)
    }

    /// Emit ledger anchor failed event
    pub fn ledger_anchor_failed(
        sink: &dyn EventSink,
        run_id: Uuid,
        error: &str,
    ) -> Result<(), String> {
        let event = LedgerAnchorFailedEvent {
            run_id,
            error: error.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::LEDGER_ANCHOR_FAILED, event)
    }

    /// Emit verify progress event
    pub fn verify_progress(
        sink: &dyn EventSink,
        verify_id: Uuid,
        progress: u8,
    ) -> Result<(), String> {
        let event = VerifyProgressEvent {
            verify_id,
            progress,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::VERIFY_PROGRESS, event)
    }

    /// Emit verify completed event
    pub fn verify_completed(
        sink: &dyn EventSink,
        verify_id: Uuid,
        authentic: bool,
    ) -> Result<(), String> {
        let event = VerifyCompletedEvent {
            verify_id,
            authentic,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        emit(sink, event_names::VERIFY_COMPLETED, event)
    }
}
