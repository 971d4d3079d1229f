//! Secured-files library
//!
//! In-memory listing of completed runs, the backing model for the "My
//! Secured Files" view: every finished run adds one record, and the tabs
//! filter by input type or AR enhancement. Nothing is persisted.

use crate::intake::FileInput;
use crate::options::WatermarkKind;
use crate::pipeline::PipelineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One secured file as shown in the library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRecord {
    pub record_id: Uuid,
    pub file_name: String,
    pub mime: String,
    pub size_bytes: usize,
    pub added_at: DateTime<Utc>,
    pub watermark_kind: WatermarkKind,
    /// The embedded content where one was collected (text payload or AR link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_content: Option<String>,
    pub ledger_anchored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_token: Option<String>,
    pub ar_enabled: bool,
}

impl LibraryRecord {
    /// Build a record from a completed run
    pub fn from_run(result: &PipelineResult, file: &FileInput) -> Self {
        let request = &result.applied_request;
        Self {
            record_id: result.run_id,
            file_name: file.name.clone(),
            mime: file.mime.clone(),
            size_bytes: file.size_bytes(),
            added_at: result.completed_at,
            watermark_kind: request.watermark_kind,
            watermark_content: match request.watermark_kind {
                WatermarkKind::Text => request.text.clone(),
                WatermarkKind::Link => request.ar_link.clone(),
                WatermarkKind::Image => None,
            },
            ledger_anchored: result.ledger_reference.is_some(),
            ledger_token: result.ledger_reference.as_ref().map(|r| r.token.clone()),
            ar_enabled: request.ar_enabled,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }

    /// File size the way the list renders it
    pub fn size_display(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Library tab
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LibraryFilter {
    All,
    Images,
    Pdfs,
    ArEnhanced,
}

/// The in-memory collection behind the library view
#[derive(Debug, Default)]
pub struct SecuredLibrary {
    records: Vec<LibraryRecord>,
}

impl SecuredLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; insertion order is display order
    pub fn add(&mut self, record: LibraryRecord) {
        self.records.push(record);
    }

    /// Records matching a tab, in insertion order
    pub fn records(&self, filter: LibraryFilter) -> impl Iterator<Item = &LibraryRecord> {
        self.records.iter().filter(move |record| match filter {
            LibraryFilter::All => true,
            LibraryFilter::Images => record.is_image(),
            LibraryFilter::Pdfs => record.is_pdf(),
            LibraryFilter::ArEnhanced => record.ar_enabled,
        })
    }

    pub fn find(&self, record_id: Uuid) -> Option<&LibraryRecord> {
        self.records.iter().find(|r| r.record_id == record_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerReference;
    use crate::options::{TransformAlgorithm, WatermarkRequest};

    fn record(
        file_name: &str,
        mime: &str,
        kind: WatermarkKind,
        content: Option<&str>,
        anchored: bool,
        ar: bool,
    ) -> LibraryRecord {
        let request = WatermarkRequest {
            watermark_kind: kind,
            text: (kind == WatermarkKind::Text).then(|| content.unwrap_or_default().to_string()),
            algorithm: TransformAlgorithm::Dct,
            anchor_to_ledger: anchored,
            ar_enabled: ar,
            ar_link: (kind == WatermarkKind::Link).then(|| content.unwrap_or_default().to_string()),
            file_name: file_name.to_string(),
            file_mime: mime.to_string(),
        };
        let result = PipelineResult {
            run_id: Uuid::new_v4(),
            applied_request: request,
            ledger_reference: anchored.then(|| LedgerReference {
                anchored_at: Utc::now(),
                token: format!("0x{}", "cd".repeat(32)),
            }),
            overlay: None,
            completed_at: Utc::now(),
        };
        let file = FileInput::new(file_name, mime, vec![0u8; 1024]);
        LibraryRecord::from_run(&result, &file)
    }

    fn seeded_library() -> SecuredLibrary {
        let mut library = SecuredLibrary::new();
        library.add(record(
            "Company_Logo_Protected.png",
            "image/png",
            WatermarkKind::Text,
            Some("© 2025 Company Name - All Rights Reserved"),
            true,
            false,
        ));
        library.add(record(
            "Contract_Final_Signed.pdf",
            "application/pdf",
            WatermarkKind::Text,
            Some("Legal Document ID: 20250403-A7B25"),
            true,
            false,
        ));
        library.add(record(
            "Product_Brochure.pdf",
            "application/pdf",
            WatermarkKind::Image,
            None,
            true,
            true,
        ));
        library.add(record(
            "Team_Photo.jpg",
            "image/jpeg",
            WatermarkKind::Link,
            Some("https://example.com/ar-content"),
            true,
            true,
        ));
        library
    }

    #[test]
    fn test_record_from_run_maps_request_fields() {
        let record = record(
            "contract.pdf",
            "application/pdf",
            WatermarkKind::Text,
            Some("Confidential"),
            true,
            false,
        );

        assert_eq!(record.watermark_content.as_deref(), Some("Confidential"));
        assert!(record.ledger_anchored);
        assert!(record.ledger_token.as_deref().unwrap().starts_with("0x"));
        assert!(!record.ar_enabled);
        assert_eq!(record.size_bytes, 1024);
    }

    #[test]
    fn test_image_kind_has_no_content() {
        let record = record(
            "brochure.pdf",
            "application/pdf",
            WatermarkKind::Image,
            None,
            false,
            false,
        );

        assert!(record.watermark_content.is_none());
        assert!(!record.ledger_anchored);
        assert!(record.ledger_token.is_none());
    }

    #[test]
    fn test_tab_filters() {
        let library = seeded_library();

        assert_eq!(library.records(LibraryFilter::All).count(), 4);

        let images: Vec<_> = library
            .records(LibraryFilter::Images)
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(images, vec!["Company_Logo_Protected.png", "Team_Photo.jpg"]);

        let pdfs: Vec<_> = library
            .records(LibraryFilter::Pdfs)
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(
            pdfs,
            vec!["Contract_Final_Signed.pdf", "Product_Brochure.pdf"]
        );

        let ar: Vec<_> = library
            .records(LibraryFilter::ArEnhanced)
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(ar, vec!["Product_Brochure.pdf", "Team_Photo.jpg"]);
    }

    #[test]
    fn test_find_by_id() {
        let library = seeded_library();
        let id = library.records(LibraryFilter::All).next().unwrap().record_id;

        assert!(library.find(id).is_some());
        assert!(library.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_size_display() {
        let record = record(
            "photo.png",
            "image/png",
            WatermarkKind::Text,
            Some("mark"),
            false,
            false,
        );

        assert_eq!(record.size_display(), "0.00 MB");
    }
}
