//! Simulated AR preview flow
//!
//! A three-step walkthrough that pretends to resolve augmented-reality
//! content tied to a watermark: scan a QR code, point the camera at the
//! document, then play the detected content. Nothing is resolved for real;
//! the preview exists so the flow around a watermark with `ar_enabled` can
//! be exercised end to end.

use serde::{Deserialize, Serialize};

/// Current step of the AR preview walkthrough
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ArStep {
    /// Waiting for the QR code to be scanned
    ScanPrompt,
    /// Camera pointed at the watermarked document
    CameraDetect,
    /// Watermark detected, content ready to play
    ContentReady,
}

/// State of an active AR preview
///
/// Constructed only for requests that enabled AR. The optional link is the
/// content the final step claims to have detected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArPreview {
    link: Option<String>,
    step: ArStep,
}

impl ArPreview {
    pub fn new(link: Option<String>) -> Self {
        Self {
            link,
            step: ArStep::ScanPrompt,
        }
    }

    pub fn step(&self) -> ArStep {
        self.step
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.step == ArStep::ContentReady
    }

    /// Advance to the next step; a no-op once content is ready
    pub fn advance(&mut self) {
        self.step = match self.step {
            ArStep::ScanPrompt => ArStep::CameraDetect,
            ArStep::CameraDetect => ArStep::ContentReady,
            ArStep::ContentReady => ArStep::ContentReady,
        };
    }

    /// Return to the first step, keeping the link
    pub fn restart(&mut self) {
        self.step = ArStep::ScanPrompt;
    }

    /// User-facing prompt for the current step
    pub fn prompt(&self) -> String {
        match self.step {
            ArStep::ScanPrompt => {
                "Scan this QR code with the ShadowStamp mobile app".to_string()
            }
            ArStep::CameraDetect => "Point your camera at the watermarked document".to_string(),
            ArStep::ContentReady => match &self.link {
                Some(link) => format!("AR content detected: {}", link),
                None => "AR content ready to play".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkthrough_order() {
        let mut preview = ArPreview::new(Some("https://ar.example/clip".to_string()));
        assert_eq!(preview.step(), ArStep::ScanPrompt);
        assert!(!preview.is_ready());

        preview.advance();
        assert_eq!(preview.step(), ArStep::CameraDetect);

        preview.advance();
        assert_eq!(preview.step(), ArStep::ContentReady);
        assert!(preview.is_ready());

        preview.advance();
        assert_eq!(preview.step(), ArStep::ContentReady);
    }

    #[test]
    fn test_ready_prompt_shows_link() {
        let mut preview = ArPreview::new(Some("https://ar.example/clip".to_string()));
        preview.advance();
        preview.advance();

        assert_eq!(
            preview.prompt(),
            "AR content detected: https://ar.example/clip"
        );
    }

    #[test]
    fn test_ready_prompt_without_link() {
        let mut preview = ArPreview::new(None);
        preview.advance();
        preview.advance();

        assert_eq!(preview.prompt(), "AR content ready to play");
    }

    #[test]
    fn test_restart_keeps_link() {
        let mut preview = ArPreview::new(Some("https://ar.example/clip".to_string()));
        preview.advance();
        preview.advance();

        preview.restart();

        assert_eq!(preview.step(), ArStep::ScanPrompt);
        assert_eq!(preview.link(), Some("https://ar.example/clip"));
    }
}
