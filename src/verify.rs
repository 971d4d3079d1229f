//! Simulated verification flow
//!
//! Independent of the embed flow: a candidate file is "checked" by climbing
//! a progress bar on a steady tick and then drawing the outcome at random.
//! A real verifier would extract the candidate's watermark and compare it
//! against the original record; the simulation deliberately does not guess
//! at that algorithm and keeps the draw as the one source of the outcome.

use crate::config::StudioConfig;
use crate::error::StampResult;
use crate::events::{EventEmitter, EventSink};
use crate::intake::FileInput;
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::RunTicket;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};
use uuid::Uuid;

/// Draws strictly above this are reported authentic (~70% of them)
pub const AUTHENTIC_THRESHOLD: f64 = 0.3;

/// What the verification claims about the candidate file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationOutcome {
    Authentic,
    Tampered,
}

impl VerificationOutcome {
    /// Map a uniform draw from [0, 1) to an outcome
    pub fn from_draw(draw: f64) -> Self {
        if draw > AUTHENTIC_THRESHOLD {
            Self::Authentic
        } else {
            Self::Tampered
        }
    }

    pub fn is_authentic(&self) -> bool {
        matches!(self, Self::Authentic)
    }

    /// Result panel headline
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Authentic => "Document is authentic ✓",
            Self::Tampered => "Document has been tampered! ⚠",
        }
    }

    /// Result panel detail line
    pub fn detail(&self) -> &'static str {
        match self {
            Self::Authentic => "The watermark verification was successful.",
            Self::Tampered => "The watermark has been corrupted or removed.",
        }
    }
}

/// A finished verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    pub verify_id: Uuid,
    pub file_name: String,
    pub outcome: VerificationOutcome,
    pub completed_at: DateTime<Utc>,
}

/// How a call to `execute` ended
#[derive(Debug)]
pub enum VerifyOutcome {
    Completed(VerifyReport),
    /// A reset invalidated the verification mid-flight
    Aborted,
}

/// Drives one verification end to end
///
/// Progress starts at 0 immediately, climbs by `step` per tick until it
/// reaches 100, settles for a beat, then the outcome is drawn.
pub struct VerifyRunner {
    tick: Duration,
    step: u8,
    settle: Duration,
}

impl VerifyRunner {
    /// Create a runner; a zero step is clamped to 1
    pub fn new(tick: Duration, step: u8, settle: Duration) -> Self {
        Self {
            tick,
            step: step.max(1),
            settle,
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.verify_tick(), config.verify_step, config.settle_delay())
    }

    pub async fn execute(
        &self,
        file: &FileInput,
        ticket: &RunTicket,
        sink: &dyn EventSink,
    ) -> StampResult<VerifyOutcome> {
        let verify_id = Uuid::new_v4();

        LOGGER.log(
            LogLevel::Info,
            &format!("Starting verification {} for '{}'", verify_id, file.name),
            "verify",
        );

        let _ = EventEmitter::verify_progress(sink, verify_id, 0);

        let mut progress: u8 = 0;
        while progress < 100 {
            sleep(self.tick).await;

            if ticket.is_stale() {
                LOGGER.log(
                    LogLevel::Info,
                    &format!("Verification {} aborted by reset at {}%", verify_id, progress),
                    "verify",
                );
                return Ok(VerifyOutcome::Aborted);
            }

            progress = progress.saturating_add(self.step).min(100);
            let _ = EventEmitter::verify_progress(sink, verify_id, progress);
        }

        sleep(self.settle).await;
        if ticket.is_stale() {
            LOGGER.log(
                LogLevel::Info,
                &format!("Verification {} aborted by reset before the outcome", verify_id),
                "verify",
            );
            return Ok(VerifyOutcome::Aborted);
        }

        let draw: f64 = rand::thread_rng().gen();
        let outcome = VerificationOutcome::from_draw(draw);

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "Verification {} finished for '{}': {}",
                verify_id,
                file.name,
                outcome.headline()
            ),
            "verify",
        );
        let _ = EventEmitter::verify_completed(sink, verify_id, outcome.is_authentic());

        Ok(VerifyOutcome::Completed(VerifyReport {
            verify_id,
            file_name: file.name.clone(),
            outcome,
            completed_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{event_names, BufferSink};
    use crate::pipeline::ResetHandle;

    fn pdf_file() -> FileInput {
        FileInput::new("contract.pdf", "application/pdf", vec![0x25, 0x50, 0x44])
    }

    fn progress_values(sink: &BufferSink) -> Vec<u8> {
        sink.records()
            .iter()
            .filter(|r| r.name == event_names::VERIFY_PROGRESS)
            .map(|r| r.payload["progress"].as_u64().unwrap() as u8)
            .collect()
    }

    #[test]
    fn test_outcome_from_draw() {
        assert_eq!(
            VerificationOutcome::from_draw(0.0),
            VerificationOutcome::Tampered
        );
        assert_eq!(
            VerificationOutcome::from_draw(0.3),
            VerificationOutcome::Tampered
        );
        assert_eq!(
            VerificationOutcome::from_draw(0.31),
            VerificationOutcome::Authentic
        );
        assert_eq!(
            VerificationOutcome::from_draw(0.99),
            VerificationOutcome::Authentic
        );
    }

    #[test]
    fn test_outcome_messages() {
        assert!(VerificationOutcome::Authentic.headline().contains("authentic"));
        assert!(VerificationOutcome::Tampered.headline().contains("tampered"));
        assert!(VerificationOutcome::Tampered
            .detail()
            .contains("corrupted or removed"));
    }

    #[tokio::test]
    async fn test_progress_climbs_from_zero_to_100() {
        let runner = VerifyRunner::new(Duration::ZERO, 10, Duration::ZERO);
        let sink = BufferSink::new();
        let ticket = ResetHandle::new().ticket();

        let outcome = runner.execute(&pdf_file(), &ticket, &sink).await.unwrap();

        assert_eq!(
            progress_values(&sink),
            vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]
        );
        match outcome {
            VerifyOutcome::Completed(report) => {
                assert_eq!(report.file_name, "contract.pdf");
            }
            VerifyOutcome::Aborted => panic!("verification aborted unexpectedly"),
        }

        let completed: Vec<_> = sink
            .records()
            .into_iter()
            .filter(|r| r.name == event_names::VERIFY_COMPLETED)
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].payload["authentic"].is_boolean());
    }

    #[tokio::test]
    async fn test_uneven_step_still_ends_at_100() {
        let runner = VerifyRunner::new(Duration::ZERO, 33, Duration::ZERO);
        let sink = BufferSink::new();
        let ticket = ResetHandle::new().ticket();

        runner.execute(&pdf_file(), &ticket, &sink).await.unwrap();

        assert_eq!(progress_values(&sink), vec![0, 33, 66, 99, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_cadence() {
        let runner = VerifyRunner::new(Duration::from_millis(200), 50, Duration::from_millis(500));
        let sink = BufferSink::new();
        let ticket = ResetHandle::new().ticket();
        let started = tokio::time::Instant::now();

        runner.execute(&pdf_file(), &ticket, &sink).await.unwrap();

        // Two ticks to 100 plus the settle delay
        assert_eq!(started.elapsed(), Duration::from_millis(900));
        assert_eq!(progress_values(&sink), vec![0, 50, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_verify_aborts_silently() {
        let runner = VerifyRunner::new(Duration::from_millis(200), 10, Duration::from_millis(500));
        let sink = BufferSink::new();
        let handle = ResetHandle::new();
        let ticket = handle.ticket();

        let file = pdf_file();
        let (outcome, _) = tokio::join!(runner.execute(&file, &ticket, &sink), async {
            // Between the 30% emission at 600ms and the 40% one at 800ms
            sleep(Duration::from_millis(700)).await;
            handle.reset();
        });

        assert!(matches!(outcome.unwrap(), VerifyOutcome::Aborted));
        assert_eq!(progress_values(&sink), vec![0, 10, 20, 30]);
        assert!(!sink
            .records()
            .iter()
            .any(|r| r.name == event_names::VERIFY_COMPLETED));
    }

    #[tokio::test]
    async fn test_zero_step_is_clamped() {
        let runner = VerifyRunner::new(Duration::ZERO, 0, Duration::ZERO);
        let sink = BufferSink::new();
        let ticket = ResetHandle::new().ticket();

        let outcome = runner.execute(&pdf_file(), &ticket, &sink).await.unwrap();

        assert!(matches!(outcome, VerifyOutcome::Completed(_)));
        assert_eq!(progress_values(&sink).len(), 101);
    }
}
