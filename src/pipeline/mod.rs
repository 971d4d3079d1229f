//! Staged watermarking pipeline
//!
//! This module drives the simulated watermark-processing run: a fixed plan of
//! named stages with climbing progress targets, emitted on a steady tick, with
//! an optional ledger sub-stage at the end. Cancellation is generation-based:
//! resetting a [`ResetHandle`] invalidates every ticket issued before the
//! reset, and a runner holding a stale ticket stops emitting and reports
//! [`RunOutcome::Aborted`] instead of finishing.
//!
//! # Example
//! ```no_run
//! use shadowstamp::events::NullSink;
//! use shadowstamp::intake::FileInput;
//! use shadowstamp::ledger::SimulatedLedger;
//! use shadowstamp::options::{self, FormState};
//! use shadowstamp::pipeline::{PipelineRunner, ResetHandle, RunOutcome};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn stamp() -> Result<(), shadowstamp::error::StampError> {
//!     let file = FileInput::new("contract.pdf", "application/pdf", vec![0x25, 0x50, 0x44]);
//!
//!     let mut form = FormState::default();
//!     form.text = "Confidential".to_string();
//!     let request = options::collect(&form, &file)?;
//!
//!     let reset = ResetHandle::new();
//!     let runner = PipelineRunner::new(
//!         Duration::from_millis(400),
//!         Arc::new(SimulatedLedger::new()),
//!     );
//!
//!     match runner.execute(request, &file, &reset.ticket(), &NullSink).await? {
//!         RunOutcome::Completed(result) => println!("anchored: {:?}", result.ledger_reference),
//!         RunOutcome::Aborted => println!("reset mid-run"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod plan;
pub mod runner;
pub mod sequencer;

// Re-export main types
pub use cancel::{ResetHandle, RunTicket};
pub use plan::StagePlan;
pub use runner::{PipelineResult, PipelineRunner, RunOutcome};
pub use sequencer::{SequenceOutcome, StageSequencer};
