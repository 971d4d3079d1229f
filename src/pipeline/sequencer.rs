use super::cancel::RunTicket;
use super::plan::{self, StagePlan};
use crate::error::StampResult;
use crate::logger::{LogLevel, LOGGER};
use tokio::time::{sleep, Duration};

/// How a sequence run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every stage was emitted in order
    Completed,
    /// A reset invalidated the ticket; remaining stages were discarded
    Aborted,
}

/// Drives an ordered stage plan on a fixed cadence
///
/// Emissions are strictly in plan order, one per tick, with the tick slept
/// before each emission. Simulated stages perform no work, so the only early
/// exit is cancellation.
pub struct StageSequencer {
    tick: Duration,
}

impl StageSequencer {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Emit every stage in order, sleeping `tick` before each emission
    ///
    /// The plan is validated before the first sleep; an invalid plan emits
    /// nothing. The ticket is re-checked after every sleep so a reset lands
    /// before the next emission, never between label and progress.
    pub async fn run<F>(
        &self,
        stages: &[StagePlan],
        ticket: &RunTicket,
        mut on_progress: F,
    ) -> StampResult<SequenceOutcome>
    where
        F: FnMut(&StagePlan),
    {
        plan::validate(stages)?;

        for (index, stage) in stages.iter().enumerate() {
            sleep(self.tick).await;

            if ticket.is_stale() {
                LOGGER.log(
                    LogLevel::Info,
                    &format!(
                        "Sequence aborted by reset before stage {}/{}: {}",
                        index + 1,
                        stages.len(),
                        stage.label
                    ),
                    "pipeline",
                );
                return Ok(SequenceOutcome::Aborted);
            }

            LOGGER.log(
                LogLevel::Debug,
                &format!(
                    "Stage {}/{}: {} at {}%",
                    index + 1,
                    stages.len(),
                    stage.label,
                    stage.target_progress
                ),
                "pipeline",
            );

            on_progress(stage);
        }

        Ok(SequenceOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StampError;
    use crate::options::TransformAlgorithm;
    use crate::pipeline::cancel::ResetHandle;

    fn collect_run(
        stages: Vec<StagePlan>,
    ) -> impl std::future::Future<Output = (StampResult<SequenceOutcome>, Vec<(String, u8)>)>
    {
        async move {
            let sequencer = StageSequencer::new(Duration::ZERO);
            let ticket = ResetHandle::new().ticket();
            let mut emitted = Vec::new();
            let outcome = sequencer
                .run(&stages, &ticket, |stage| {
                    emitted.push((stage.label.clone(), stage.target_progress));
                })
                .await;
            (outcome, emitted)
        }
    }

    #[tokio::test]
    async fn test_emits_every_stage_in_order() {
        let stages = plan::base_plan(TransformAlgorithm::Dct);
        let (outcome, emitted) = collect_run(stages.clone()).await;

        assert_eq!(outcome.unwrap(), SequenceOutcome::Completed);
        assert_eq!(emitted.len(), stages.len());
        for (stage, (label, progress)) in stages.iter().zip(&emitted) {
            assert_eq!(&stage.label, label);
            assert_eq!(stage.target_progress, *progress);
        }
    }

    #[tokio::test]
    async fn test_invalid_plan_emits_nothing() {
        let stages = vec![StagePlan::new("First", 50), StagePlan::new("Second", 50)];
        let (outcome, emitted) = collect_run(stages).await;

        assert!(matches!(outcome, Err(StampError::InvalidStagePlan(_))));
        assert!(emitted.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_one_tick_before_each_emission() {
        let sequencer = StageSequencer::new(Duration::from_millis(400));
        let ticket = ResetHandle::new().ticket();
        let stages = vec![
            StagePlan::new("First", 10),
            StagePlan::new("Second", 20),
            StagePlan::new("Third", 30),
        ];

        let start = tokio::time::Instant::now();
        let mut offsets = Vec::new();
        sequencer
            .run(&stages, &ticket, |_| {
                offsets.push(start.elapsed());
            })
            .await
            .unwrap();

        assert_eq!(
            offsets,
            vec![
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_millis(1200),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_sequence_discards_remaining_stages() {
        let sequencer = StageSequencer::new(Duration::from_millis(400));
        let handle = ResetHandle::new();
        let ticket = handle.ticket();
        let stages = plan::base_plan(TransformAlgorithm::Dct);

        let emitted = std::sync::Mutex::new(Vec::new());
        let (outcome, _) = tokio::join!(
            sequencer.run(&stages, &ticket, |stage| {
                emitted.lock().unwrap().push(stage.target_progress);
            }),
            async {
                // Between the second emission (800ms) and the third (1200ms)
                sleep(Duration::from_millis(1000)).await;
                handle.reset();
            }
        );

        assert_eq!(outcome.unwrap(), SequenceOutcome::Aborted);
        assert_eq!(*emitted.lock().unwrap(), vec![10, 25]);
    }
}
