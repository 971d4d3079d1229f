use super::cancel::RunTicket;
use super::plan::{
    self, StagePlan, COMPLETE_STAGE_LABEL, COMPLETE_STAGE_PROGRESS, LEDGER_STAGE_LABEL,
    LEDGER_STAGE_PROGRESS,
};
use super::sequencer::{SequenceOutcome, StageSequencer};
use crate::error::StampResult;
use crate::events::{EventEmitter, EventSink};
use crate::intake::FileInput;
use crate::ledger::{LedgerAnchorer, LedgerReference};
use crate::logger::{LogLevel, LOGGER};
use crate::options::WatermarkRequest;
use crate::overlay::{self, DataUrl};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

/// Everything a completed run hands to the presenter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub applied_request: WatermarkRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_reference: Option<LedgerReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<DataUrl>,
    pub completed_at: DateTime<Utc>,
}

/// How a call to `execute` ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Ran to completion; the result is ready for presentation
    Completed(PipelineResult),
    /// A reset invalidated the run mid-flight; everything after it was
    /// discarded silently
    Aborted,
}

/// Drives one watermarking run end to end
///
/// Owns nothing across runs: a request goes in, stage emissions flow to the
/// sink, and a `PipelineResult` comes out. Resubmission gating lives in the
/// studio, not here.
pub struct PipelineRunner {
    tick: Duration,
    ledger: Arc<dyn LedgerAnchorer>,
}

impl PipelineRunner {
    pub fn new(tick: Duration, ledger: Arc<dyn LedgerAnchorer>) -> Self {
        Self { tick, ledger }
    }

    /// Run the staged simulation for one request
    ///
    /// For image inputs the illustrative overlay is rendered up front, so an
    /// undecodable image fails the run before any stage is emitted. The
    /// ledger sub-stage runs only when the request asks for anchoring; its
    /// delay takes the place of the final tick.
    pub async fn execute(
        &self,
        request: WatermarkRequest,
        file: &FileInput,
        ticket: &RunTicket,
        sink: &dyn EventSink,
    ) -> StampResult<RunOutcome> {
        let run_id = Uuid::new_v4();
        let run_start = Instant::now();

        let mut stages = plan::base_plan(request.algorithm);
        if !request.anchor_to_ledger {
            stages.push(StagePlan::new(COMPLETE_STAGE_LABEL, COMPLETE_STAGE_PROGRESS));
        }
        let total_stages = stages.len() + if request.anchor_to_ledger { 2 } else { 0 };

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "Starting watermark run {} for '{}' ({} emissions)",
                run_id, request.file_name, total_stages
            ),
            "pipeline",
        );
        let _ = EventEmitter::pipeline_started(sink, run_id, &request.file_name, total_stages);

        let overlay = if file.is_image() {
            match overlay::render(file, &request) {
                Ok(url) => Some(url),
                Err(e) => {
                    LOGGER.log(
                        LogLevel::Error,
                        &format!("Run {} failed to render overlay: {}", run_id, e),
                        "pipeline",
                    );
                    let _ = EventEmitter::pipeline_failed(
                        sink,
                        run_id,
                        "Analyzing file",
                        &e.to_string(),
                    );
                    return Err(e);
                }
            }
        } else {
            None
        };

        let sequencer = StageSequencer::new(self.tick);
        let outcome = sequencer
            .run(&stages, ticket, |stage| {
                let _ = EventEmitter::pipeline_progress(
                    sink,
                    run_id,
                    &stage.label,
                    stage.target_progress,
                );
            })
            .await?;

        if outcome == SequenceOutcome::Aborted {
            return Ok(RunOutcome::Aborted);
        }

        let mut ledger_reference: Option<LedgerReference> = None;
        if request.anchor_to_ledger {
            sleep(self.tick).await;
            if ticket.is_stale() {
                LOGGER.log(
                    LogLevel::Info,
                    &format!("Run {} aborted by reset before ledger sub-stage", run_id),
                    "pipeline",
                );
                return Ok(RunOutcome::Aborted);
            }

            let _ = EventEmitter::pipeline_progress(
                sink,
                run_id,
                LEDGER_STAGE_LABEL,
                LEDGER_STAGE_PROGRESS,
            );
            let _ = EventEmitter::ledger_anchor_started(sink, run_id);

            match self.ledger.anchor(run_id).await {
                Ok(reference) => {
                    if ticket.is_stale() {
                        LOGGER.log(
                            LogLevel::Info,
                            &format!("Run {} aborted by reset; anchor {} discarded",
                                run_id, reference.token),
                            "pipeline",
                        );
                        return Ok(RunOutcome::Aborted);
                    }
                    let _ =
                        EventEmitter::ledger_anchor_completed(sink, run_id, &reference.token);
                    ledger_reference = Some(reference);
                }
                Err(e) => {
                    LOGGER.log(
                        LogLevel::Error,
                        &format!("Run {} failed to anchor: {}", run_id, e),
                        "pipeline",
                    );
                    let _ = EventEmitter::ledger_anchor_failed(sink, run_id, &e.to_string());
                    let _ = EventEmitter::pipeline_failed(
                        sink,
                        run_id,
                        LEDGER_STAGE_LABEL,
                        &e.to_string(),
                    );
                    return Err(e);
                }
            }

            let _ = EventEmitter::pipeline_progress(
                sink,
                run_id,
                COMPLETE_STAGE_LABEL,
                COMPLETE_STAGE_PROGRESS,
            );
        }

        let total_duration = run_start.elapsed();
        let mut context = HashMap::new();
        context.insert("run_id".to_string(), json!(run_id));
        context.insert("emissions".to_string(), json!(total_stages));
        context.insert("duration_ms".to_string(), json!(total_duration.as_millis() as u64));
        context.insert("anchored".to_string(), json!(ledger_reference.is_some()));
        LOGGER.log_with_context(
            LogLevel::Info,
            &format!("Watermark run {} completed", run_id),
            "pipeline",
            context,
        );

        let _ = EventEmitter::pipeline_completed(
            sink,
            run_id,
            total_duration.as_millis() as u64,
            ledger_reference.is_some(),
        );

        Ok(RunOutcome::Completed(PipelineResult {
            run_id,
            applied_request: request,
            ledger_reference,
            overlay,
            completed_at: Utc::now(),
        }))
    }
}
