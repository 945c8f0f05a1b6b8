//! Turning user-selected files into library entries.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{ImageId, UploadedImage};
use crate::{AppError, ErrorKind, LARGE_IMAGE_BYTES};

/// Raw file as handed over by the shell's picker or drop zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub display_uri: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IngestError {
    #[error("{name}: file is empty")]
    Empty { name: String },

    #[error("{name}: could not be read ({reason})")]
    Unreadable { name: String, reason: String },
}

impl IngestError {
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Empty { name } | Self::Unreadable { name, .. } => name,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::new(ErrorKind::Ingestion, e.to_string()).with_context("file", e.file_name())
    }
}

/// Encodes one file. The media type is kept exactly as declared and there is
/// no size cap; an oversized request fails later as a generation error.
pub fn encode_file(file: SelectedFile) -> Result<UploadedImage, IngestError> {
    if file.bytes.is_empty() {
        return Err(IngestError::Empty { name: file.name });
    }
    if file.bytes.len() > LARGE_IMAGE_BYTES {
        warn!(name = %file.name, size = file.bytes.len(), "large image may exceed the inline request limit");
    }

    Ok(UploadedImage {
        id: ImageId::generate(),
        encoded_data: STANDARD.encode(&file.bytes),
        byte_len: file.bytes.len(),
        file_name: file.name,
        display_uri: file.display_uri,
        media_type: file.media_type,
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub images: Vec<UploadedImage>,
    pub failures: Vec<IngestError>,
}

impl IngestReport {
    #[must_use]
    pub fn skipped_message(&self) -> Option<String> {
        match self.failures.len() {
            0 => None,
            1 => Some(format!("1 file could not be added: {}", self.failures[0])),
            n => Some(format!("{n} files could not be added")),
        }
    }
}

/// Encodes a whole batch, skipping files that fail. Input order is preserved.
///
/// `read_failures` are files the shell could not read at all; they are
/// reported alongside the encoding failures.
pub fn encode_batch(files: Vec<SelectedFile>, read_failures: Vec<IngestError>) -> IngestReport {
    let mut report = IngestReport {
        images: Vec::with_capacity(files.len()),
        failures: read_failures,
    };
    for failure in &report.failures {
        warn!(error = %failure, "file could not be read by the shell");
    }
    for file in files {
        match encode_file(file) {
            Ok(image) => report.images.push(image),
            Err(e) => {
                warn!(error = %e, "skipping file in upload batch");
                report.failures.push(e);
            }
        }
    }
    report
}
