use thiserror::Error;

/// Validation failures raised while collecting watermark options.
///
/// These block submission before any pipeline work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Watermark text is required for a text watermark")]
    EmptyWatermarkText,

    #[error("An AR link is required for a link watermark")]
    EmptyArLink,
}

/// Central error type for the ShadowStamp core
#[derive(Error, Debug)]
pub enum StampError {
    // ============================================================================
    // Option Collection Errors
    // ============================================================================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ============================================================================
    // File Intake Errors
    // ============================================================================
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("No file staged for processing")]
    NoFileStaged,

    // ============================================================================
    // Pipeline Errors
    // ============================================================================
    #[error("Another watermarking run is already in progress")]
    RunInProgress,

    #[error("Invalid stage plan: {0}")]
    InvalidStagePlan(String),

    #[error("Failed to decode image for overlay: {0}")]
    OverlayDecodeFailed(String),

    #[error("Failed to encode overlay image: {0}")]
    OverlayEncodeFailed(String),

    // ============================================================================
    // Ledger Errors
    // ============================================================================
    #[error("Failed to anchor to ledger: {0}")]
    LedgerAnchorFailed(String),

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

// Implement conversion to String for UI shells
impl From<StampError> for String {
    fn from(error: StampError) -> Self {
        error.to_string()
    }
}

// Helper type alias for Results
pub type StampResult<T> = Result<T, StampError>;
