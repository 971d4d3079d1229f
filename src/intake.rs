use crate::error::{StampError, StampResult};
use crate::logger::LogLevel;
use crate::overlay;
use crate::stamp_log;
use serde::{Deserialize, Serialize};

/// A file as handed over by the selection surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileInput {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Accepted MIME types: any image plus PDF documents
pub fn is_supported_mime(mime: &str) -> bool {
    mime.starts_with("image/") || mime == "application/pdf"
}

/// Holds the staged file between selection and processing
///
/// Selecting or removing a file invalidates whatever run was in flight;
/// the studio wires that to its reset handle.
#[derive(Debug, Default)]
pub struct FileIntake {
    staged: Option<FileInput>,
    preview: Option<String>,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file, replacing any previous selection
    ///
    /// Images get a base64 preview data URL of the raw bytes; other types
    /// have no preview.
    pub fn select(&mut self, file: FileInput) -> StampResult<()> {
        if !is_supported_mime(&file.mime) {
            return Err(StampError::UnsupportedFileType(file.mime));
        }

        stamp_log!(
            LogLevel::Info,
            "File staged: {} ({}, {} bytes)",
            file.name,
            file.mime,
            file.size_bytes()
        );

        self.preview = file
            .is_image()
            .then(|| overlay::data_url(&file.mime, &file.bytes));
        self.staged = Some(file);
        Ok(())
    }

    /// Drop the staged file
    pub fn remove(&mut self) {
        if let Some(file) = self.staged.take() {
            stamp_log!(LogLevel::Info, "File removed: {}", file.name);
        }
        self.preview = None;
    }

    pub fn staged(&self) -> Option<&FileInput> {
        self.staged.as_ref()
    }

    /// Preview data URL for the staged image, if any
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.staged.is_some()
    }
}
