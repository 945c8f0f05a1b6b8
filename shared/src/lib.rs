// lib.rs - Post Studio shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod gemini;
pub mod ingest;
pub mod model;
pub mod selection;
pub mod store;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{BusinessProfile, GeneratorConfig};
pub use event::Event;
pub use model::{GeneratedPost, ImageId, Model, Phase, PostId, UploadedImage};
pub use view::ViewModel;

pub const MIN_SELECTION: usize = 2;
pub const MAX_SELECTION: usize = 3;
/// Above this, three base64-encoded images may exceed the 20 MB inline request limit.
/// Such files are still accepted, only logged.
pub const LARGE_IMAGE_BYTES: usize = 5_000_000;
pub const COPY_CONFIRMATION_MS: u64 = 2000;
pub const FALLBACK_POST_TEXT: &str = "Failed to generate content. Please try again.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Something went wrong. Please check your API key or connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Generation,
    Ingestion,
    Clipboard,
    Validation,
    InvalidState,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Generation => "GENERATION_FAILED",
            Self::Ingestion => "INGESTION_FAILED",
            Self::Clipboard => "CLIPBOARD_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Text safe to show the end user. Never includes `internal_message`.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Generation => GENERATION_FAILED_MESSAGE.into(),
            ErrorKind::Ingestion | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Clipboard => "Could not copy the text. Please copy it manually.".into(),
            ErrorKind::InvalidState | ErrorKind::Internal => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        Self(get_current_time_ms())
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Default for UnixTimeMs {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_never_leak_internal_detail() {
        let err = AppError::new(ErrorKind::Generation, "upstream 401")
            .with_internal("API key AIza-secret rejected");
        let shown = err.user_facing_message();
        assert_eq!(shown, GENERATION_FAILED_MESSAGE);
        assert!(!shown.contains("AIza"));
    }

    #[test]
    fn display_includes_code_and_internal() {
        let err = AppError::new(ErrorKind::Validation, "bad temperature").with_internal("3.5");
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] bad temperature (internal: 3.5)");
    }

    #[test]
    fn context_is_recorded() {
        let err = AppError::new(ErrorKind::Ingestion, "skipped").with_context("file", "a.jpg");
        assert_eq!(err.context.get("file").map(String::as_str), Some("a.jpg"));
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(UnixTimeMs(10).elapsed_since(UnixTimeMs(25)), 0);
        assert_eq!(UnixTimeMs(25).elapsed_since(UnixTimeMs(10)), 15);
    }
}
