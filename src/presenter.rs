//! Result presentation
//!
//! Merges a finished run into the view state the front end reads: the
//! applied flag, the displayable ledger reference, the download artifact and
//! the AR preview. Pure state merge, no errors.

use crate::ar::ArPreview;
use crate::intake::FileInput;
use crate::overlay::DataUrl;
use crate::pipeline::PipelineResult;
use serde::{Deserialize, Serialize};

/// What the download affordance hands out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DownloadBody {
    /// Overlay-modified image, already packaged as a data URL
    OverlayDataUrl(DataUrl),
    /// Original bytes unchanged, for inputs with no rendered overlay
    OriginalBytes(Vec<u8>),
}

/// A downloadable result artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime: String,
    pub body: DownloadBody,
}

/// Everything the result view shows
///
/// One instance lives in the studio; runs and failures merge into it and a
/// reset clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub watermark_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ar: Option<ArPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a completed run into the view
    ///
    /// Activates the AR preview iff the applied request asked for it. For
    /// image inputs the download is the overlay data URL; anything else gets
    /// the original bytes back unchanged.
    pub fn apply_result(&mut self, result: &PipelineResult, file: &FileInput) {
        self.failure = None;
        self.watermark_applied = true;
        self.ledger_reference = result.ledger_reference.as_ref().map(|r| r.token.clone());
        self.ar = if result.applied_request.ar_enabled {
            Some(ArPreview::new(result.applied_request.ar_link.clone()))
        } else {
            None
        };
        self.download = Some(match &result.overlay {
            Some(url) if file.is_image() => {
                let stem = file
                    .name
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .unwrap_or(&file.name);
                DownloadArtifact {
                    file_name: format!("{}-watermarked.png", stem),
                    mime: "image/png".to_string(),
                    body: DownloadBody::OverlayDataUrl(url.clone()),
                }
            }
            _ => DownloadArtifact {
                file_name: file.name.clone(),
                mime: file.mime.clone(),
                body: DownloadBody::OriginalBytes(file.bytes.clone()),
            },
        });
    }

    /// Record a run failure; clears anything a previous run left behind
    pub fn record_failure(&mut self, message: impl Into<String>) {
        *self = Self {
            failure: Some(message.into()),
            ..Self::default()
        };
    }

    pub fn ar_active(&self) -> bool {
        self.ar.is_some()
    }

    /// Back to the empty view
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
