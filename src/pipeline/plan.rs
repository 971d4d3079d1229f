use crate::error::{StampError, StampResult};
use crate::options::TransformAlgorithm;
use serde::{Deserialize, Serialize};

/// Label of the ledger sub-stage appended when a run anchors
pub const LEDGER_STAGE_LABEL: &str = "Recording to ledger";
pub const LEDGER_STAGE_PROGRESS: u8 = 95;

/// Label of the final emission of every run
pub const COMPLETE_STAGE_LABEL: &str = "Complete";
pub const COMPLETE_STAGE_PROGRESS: u8 = 100;

/// A single simulated stage: a display label and the progress it lands on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StagePlan {
    pub label: String,
    pub target_progress: u8,
}

impl StagePlan {
    pub fn new(label: impl Into<String>, target_progress: u8) -> Self {
        Self {
            label: label.into(),
            target_progress,
        }
    }
}

/// Fixed base plan for an embed run, ending at Finalize(90)
///
/// The transform label interpolates the chosen algorithm acronym. Cosmetic
/// only, no real transform runs.
pub fn base_plan(algorithm: TransformAlgorithm) -> Vec<StagePlan> {
    vec![
        StagePlan::new("Analyzing file", 10),
        StagePlan::new("Preparing watermark payload", 25),
        StagePlan::new(format!("Applying {} transform", algorithm.acronym()), 40),
        StagePlan::new("Embedding watermark", 60),
        StagePlan::new("Verifying watermark", 75),
        StagePlan::new("Finalizing output", 90),
    ]
}

/// Check plan invariants before any emission
///
/// A plan must be non-empty, stay within 100% and climb strictly.
pub fn validate(stages: &[StagePlan]) -> StampResult<()> {
    if stages.is_empty() {
        return Err(StampError::InvalidStagePlan("plan is empty".to_string()));
    }

    let mut previous: Option<&StagePlan> = None;
    for stage in stages {
        if stage.target_progress > 100 {
            return Err(StampError::InvalidStagePlan(format!(
                "stage '{}' targets {}%",
                stage.label, stage.target_progress
            )));
        }
        if let Some(prev) = previous {
            if stage.target_progress <= prev.target_progress {
                return Err(StampError::InvalidStagePlan(format!(
                    "stage '{}' at {}% does not climb past '{}' at {}%",
                    stage.label, stage.target_progress, prev.label, prev.target_progress
                )));
            }
        }
        previous = Some(stage);
    }

    Ok(())
}
