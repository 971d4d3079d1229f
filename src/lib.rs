//! ShadowStamp core
//!
//! The engine behind a watermarking demo: stage a file, collect watermark
//! options, run a simulated embedding pipeline with staged progress,
//! optionally anchor the run to a simulated ledger, and verify candidate
//! files. Everything is mimicry by design: no watermark is really embedded,
//! the ledger reference is a random token and verification draws its
//! outcome. What is real is the machinery around the simulation: the typed
//! session state machine, generation-based cancellation, event emission and
//! the secured-files library.
//!
//! [`studio::WatermarkStudio`] ties the pieces together and is the usual
//! entry point.

pub mod ar;
pub mod config;
pub mod error;
pub mod events;
pub mod intake;
pub mod ledger;
pub mod library;
pub mod logger;
pub mod options;
pub mod overlay;
pub mod pipeline;
pub mod presenter;
pub mod session;
pub mod studio;
pub mod verify;

// Re-export the types most callers need
pub use config::StudioConfig;
pub use error::{StampError, StampResult};
pub use studio::WatermarkStudio;
