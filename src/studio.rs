//! Studio coordinator
//!
//! Owns the whole demo surface: the staged file, the session state machine,
//! the pipeline and verify runners, the result view and the secured-files
//! library. All methods take `&self`; mutable state lives behind one mutex
//! that is never held across an await, so a file can be removed while a run
//! is in flight. Removing or re-selecting a file bumps the reset generation,
//! which silently invalidates every in-flight run and verification.

use crate::config::StudioConfig;
use crate::error::{StampError, StampResult};
use crate::events::EventSink;
use crate::intake::{self, FileInput, FileIntake};
use crate::ledger::{LedgerAnchorer, SimulatedLedger};
use crate::library::{LibraryFilter, LibraryRecord, SecuredLibrary};
use crate::logger::LogLevel;
use crate::options::{self, FormState};
use crate::pipeline::{PipelineRunner, ResetHandle, RunOutcome};
use crate::presenter::ViewState;
use crate::session::SessionState;
use crate::stamp_log;
use crate::verify::{VerifyOutcome, VerifyReport, VerifyRunner};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct StudioInner {
    intake: FileIntake,
    session: SessionState,
    view: ViewState,
    library: SecuredLibrary,
    last_verification: Option<VerifyReport>,
    verifying: bool,
}

/// The application core behind the embed and verify flows
pub struct WatermarkStudio {
    config: StudioConfig,
    sink: Arc<dyn EventSink>,
    runner: PipelineRunner,
    verifier: VerifyRunner,
    reset_handle: ResetHandle,
    inner: Mutex<StudioInner>,
}

impl WatermarkStudio {
    pub fn new(config: StudioConfig, sink: Arc<dyn EventSink>) -> Self {
        let ledger = Arc::new(SimulatedLedger::from_config(&config.ledger));
        Self::with_ledger(config, sink, ledger)
    }

    /// Create a studio with a specific ledger anchorer
    pub fn with_ledger(
        config: StudioConfig,
        sink: Arc<dyn EventSink>,
        ledger: Arc<dyn LedgerAnchorer>,
    ) -> Self {
        Self {
            runner: PipelineRunner::new(config.stage_tick(), ledger),
            verifier: VerifyRunner::from_config(&config),
            reset_handle: ResetHandle::new(),
            sink,
            config,
            inner: Mutex::new(StudioInner {
                intake: FileIntake::new(),
                session: SessionState::new(),
                view: ViewState::new(),
                library: SecuredLibrary::new(),
                last_verification: None,
                verifying: false,
            }),
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, StudioInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stage a file for watermarking
    ///
    /// Replaces whatever was staged, invalidates any in-flight run and
    /// clears the result view. Fails on unsupported MIME types without
    /// touching the current state.
    pub fn select_file(&self, file: FileInput) -> StampResult<()> {
        let mut inner = self.lock_inner();
        inner.intake.select(file)?;

        self.reset_handle.reset();
        inner.session = inner.session.clone().reset(self.sink.as_ref());
        inner.view.reset();
        Ok(())
    }

    /// Remove the staged file
    ///
    /// Invalidates any in-flight run and clears the result view.
    pub fn remove_file(&self) {
        let mut inner = self.lock_inner();
        inner.intake.remove();

        self.reset_handle.reset();
        inner.session = inner.session.clone().reset(self.sink.as_ref());
        inner.view.reset();
    }

    /// Run the watermarking pipeline for the staged file
    ///
    /// Collects the form into a request, drives the session through its
    /// states and applies the finished result to the view and the library.
    /// Rejected while another run is active. A reset landing anywhere in the
    /// run discards it silently and yields `RunOutcome::Aborted`.
    pub async fn submit(&self, form: &FormState) -> StampResult<RunOutcome> {
        let (file, ticket) = {
            let mut inner = self.lock_inner();
            if inner.session.is_active() {
                return Err(StampError::RunInProgress);
            }
            let file = inner
                .intake
                .staged()
                .cloned()
                .ok_or(StampError::NoFileStaged)?;

            // A finished or failed session makes way for the next run
            if !matches!(inner.session, SessionState::Idle(_)) {
                inner.session = inner.session.clone().reset(self.sink.as_ref());
            }
            inner.session = inner.session.clone().validate(self.sink.as_ref())?;

            (file, self.reset_handle.ticket())
        };

        stamp_log!(
            LogLevel::Info,
            "Submitting watermark request for '{}'",
            file.name
        );

        let request = match options::collect(form, &file) {
            Ok(request) => request,
            Err(validation) => {
                let err = StampError::from(validation);
                let mut inner = self.lock_inner();
                if ticket.is_stale() {
                    return Ok(RunOutcome::Aborted);
                }
                inner.session = inner.session.clone().fail(err.to_string(), self.sink.as_ref());
                inner.view.record_failure(err.to_string());
                return Err(err);
            }
        };

        {
            let mut inner = self.lock_inner();
            if ticket.is_stale() {
                return Ok(RunOutcome::Aborted);
            }
            inner.session = inner
                .session
                .clone()
                .stage(request.clone(), self.sink.as_ref())?;
        }

        let outcome = self
            .runner
            .execute(request, &file, &ticket, self.sink.as_ref())
            .await;

        let mut inner = self.lock_inner();
        if ticket.is_stale() {
            // The file changed under the run; everything it produced is stale
            return Ok(RunOutcome::Aborted);
        }

        match outcome {
            Ok(RunOutcome::Completed(result)) => {
                if result.ledger_reference.is_some() {
                    inner.session = inner.session.clone().anchor(self.sink.as_ref())?;
                }
                inner.session = inner
                    .session
                    .clone()
                    .complete(result.clone(), self.sink.as_ref())?;
                inner.view.apply_result(&result, &file);
                inner.library.add(LibraryRecord::from_run(&result, &file));
                Ok(RunOutcome::Completed(result))
            }
            Ok(RunOutcome::Aborted) => Ok(RunOutcome::Aborted),
            Err(err) => {
                inner.session = inner.session.clone().fail(err.to_string(), self.sink.as_ref());
                inner.view.record_failure(err.to_string());
                Err(err)
            }
        }
    }

    /// Verify a candidate file
    ///
    /// Independent of the embed flow. One verification at a time; a file
    /// reset mid-verification aborts it silently.
    pub async fn verify_file(&self, file: &FileInput) -> StampResult<VerifyOutcome> {
        if !intake::is_supported_mime(&file.mime) {
            return Err(StampError::UnsupportedFileType(file.mime.clone()));
        }

        let ticket = {
            let mut inner = self.lock_inner();
            if inner.verifying {
                return Err(StampError::RunInProgress);
            }
            inner.verifying = true;
            self.reset_handle.ticket()
        };

        let outcome = self
            .verifier
            .execute(file, &ticket, self.sink.as_ref())
            .await;

        let mut inner = self.lock_inner();
        inner.verifying = false;

        match outcome {
            Ok(VerifyOutcome::Completed(report)) => {
                if ticket.is_stale() {
                    return Ok(VerifyOutcome::Aborted);
                }
                inner.last_verification = Some(report.clone());
                Ok(VerifyOutcome::Completed(report))
            }
            other => other,
        }
    }

    /// Advance the AR preview one step, if one is active
    pub fn advance_ar_preview(&self) {
        let mut inner = self.lock_inner();
        if let Some(ar) = inner.view.ar.as_mut() {
            ar.advance();
        }
    }

    /// Return the AR preview to its first step, if one is active
    pub fn restart_ar_preview(&self) {
        let mut inner = self.lock_inner();
        if let Some(ar) = inner.view.ar.as_mut() {
            ar.restart();
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn is_run_active(&self) -> bool {
        self.lock_inner().session.is_active()
    }

    pub fn session_state_name(&self) -> &'static str {
        self.lock_inner().session.state_name()
    }

    pub fn staged_file(&self) -> Option<FileInput> {
        self.lock_inner().intake.staged().cloned()
    }

    pub fn file_preview(&self) -> Option<String> {
        self.lock_inner().intake.preview().map(str::to_string)
    }

    pub fn view(&self) -> ViewState {
        self.lock_inner().view.clone()
    }

    pub fn library_records(&self, filter: LibraryFilter) -> Vec<LibraryRecord> {
        self.lock_inner().library.records(filter).cloned().collect()
    }

    pub fn last_verification(&self) -> Option<VerifyReport> {
        self.lock_inner().last_verification.clone()
    }
}

impl Default for WatermarkStudio {
    fn default() -> Self {
        Self::new(
            StudioConfig::default(),
            Arc::new(crate::events::NullSink),
        )
    }
}
