//! Capability for the remote generative content call.
//!
//! The core only describes *what* to generate; the shell performs the call
//! (see `crate::native::GeminiClient` for a native implementation) and
//! resolves the request with the resulting text or a failure.

use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{task_prompt, GeneratorConfig};
use crate::model::UploadedImage;
use crate::{AppError, ErrorKind};

/// Image payload as sent to the service: base64 bytes plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub media_type: String,
    pub data: String,
}

impl From<&UploadedImage> for InlineImage {
    fn from(image: &UploadedImage) -> Self {
        Self {
            media_type: image.media_type.clone(),
            data: image.encoded_data.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOperation {
    /// Service root the request is sent to, e.g. a regional proxy.
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub system_instruction: String,
    pub prompt: String,
    pub images: Vec<InlineImage>,
}

impl GenerateOperation {
    pub fn new<'a>(
        config: &GeneratorConfig,
        images: impl IntoIterator<Item = &'a UploadedImage>,
    ) -> Self {
        let images: Vec<InlineImage> = images.into_iter().map(InlineImage::from).collect();
        Self {
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            system_instruction: config.system_instruction.clone(),
            prompt: task_prompt(images.len()),
            images,
        }
    }
}

impl Operation for GenerateOperation {
    type Output = GenerationResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("service returned status {status}")]
    Status { status: u16, body: Option<String> },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("missing API key")]
    MissingApiKey,
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        let app = AppError::new(ErrorKind::Generation, "Failed to connect to AI service.")
            .with_internal(e.to_string());
        match e {
            GenerationError::Status { status, .. } => {
                app.with_context("http_status", status.to_string())
            }
            _ => app,
        }
    }
}

/// `Ok` carries the raw text, which may be empty.
pub type GenerationResult = Result<String, GenerationError>;

#[derive(Capability)]
pub struct ContentGenerator<Ev> {
    context: CapabilityContext<GenerateOperation, Ev>,
}

impl<Ev> ContentGenerator<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GenerateOperation, Ev>) -> Self {
        Self { context }
    }

    /// One attempt, no retries. `callback` receives whatever the shell reports.
    pub fn generate<F>(&self, operation: GenerateOperation, callback: F)
    where
        F: FnOnce(GenerationResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(callback(result));
        });
    }
}
