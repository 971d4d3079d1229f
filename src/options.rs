use crate::error::ValidationError;
use crate::intake::FileInput;
use serde::{Deserialize, Serialize};

/// Watermark payload kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    Text,
    Image,
    Link,
}

/// Simulated embedding transform
///
/// Cosmetic only: the choice changes a stage label and the analytics
/// display, never the bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransformAlgorithm {
    Dct,
    Dwt,
}

impl TransformAlgorithm {
    /// Short form used in stage labels
    pub fn acronym(&self) -> &'static str {
        match self {
            TransformAlgorithm::Dct => "DCT",
            TransformAlgorithm::Dwt => "DWT",
        }
    }

    /// Full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TransformAlgorithm::Dct => "Discrete Cosine Transform",
            TransformAlgorithm::Dwt => "Discrete Wavelet Transform",
        }
    }
}

/// Mutable option form, as the UI edits it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub watermark_kind: WatermarkKind,
    pub text: String,
    pub algorithm: TransformAlgorithm,
    pub anchor_to_ledger: bool,
    pub ar_enabled: bool,
    pub ar_link: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            watermark_kind: WatermarkKind::Text,
            text: String::new(),
            algorithm: TransformAlgorithm::Dct,
            anchor_to_ledger: true,
            ar_enabled: false,
            ar_link: String::new(),
        }
    }
}

/// Immutable, validated watermarking request
///
/// Created on submission, consumed once by the runner, discarded after the
/// presenter merges the result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkRequest {
    pub watermark_kind: WatermarkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub algorithm: TransformAlgorithm,
    pub anchor_to_ledger: bool,
    pub ar_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ar_link: Option<String>,
    pub file_name: String,
    pub file_mime: String,
}

/// Validate and normalize the option form against the staged file
///
/// Payload fields of non-selected kinds are cleared so a request never
/// carries stale form text. Emptiness is exact; whitespace counts as a
/// payload.
pub fn collect(form: &FormState, file: &FileInput) -> Result<WatermarkRequest, ValidationError> {
    match form.watermark_kind {
        WatermarkKind::Text if form.text.is_empty() => {
            return Err(ValidationError::EmptyWatermarkText)
        }
        WatermarkKind::Link if form.ar_link.is_empty() => return Err(ValidationError::EmptyArLink),
        _ => {}
    }

    let text = match form.watermark_kind {
        WatermarkKind::Text => Some(form.text.clone()),
        _ => None,
    };
    let ar_link = match form.watermark_kind {
        WatermarkKind::Link => Some(form.ar_link.clone()),
        _ => None,
    };

    Ok(WatermarkRequest {
        watermark_kind: form.watermark_kind,
        text,
        algorithm: form.algorithm,
        anchor_to_ledger: form.anchor_to_ledger,
        ar_enabled: form.ar_enabled,
        ar_link,
        file_name: file.name.clone(),
        file_mime: file.mime.clone(),
    })
}
