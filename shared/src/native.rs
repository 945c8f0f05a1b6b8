//! Native shell helpers: reading an upload batch from disk and resolving
//! generation requests against the live API.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::capabilities::{GenerateOperation, GenerationError, GenerationResult};
use crate::gemini::{endpoint, GenerateContentRequest, GenerateContentResponse, API_KEY_HEADER};
use crate::ingest::{IngestError, SelectedFile};

pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("no API key found in {vars:?}")]
    MissingApiKey { vars: &'static [&'static str] },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Magic bytes first, then the file extension.
fn sniff_media_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map_or_else(|_| FALLBACK_MEDIA_TYPE.to_string(), |f| f.to_mime_type().to_string())
}

fn read_one(path: &Path) -> Result<SelectedFile, IngestError> {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let bytes = std::fs::read(path).map_err(|e| IngestError::Unreadable {
        name: name.clone(),
        reason: e.to_string(),
    })?;

    Ok(SelectedFile {
        media_type: sniff_media_type(path, &bytes),
        display_uri: format!("file://{}", path.display()),
        name,
        bytes,
    })
}

/// Reads every file concurrently and returns only once all reads settle, in
/// the same order as `paths`. Hand the whole result to
/// `Event::images_selected` as one batch.
#[instrument(skip(paths), fields(count = paths.len()))]
pub async fn read_batch(paths: Vec<PathBuf>) -> Vec<Result<SelectedFile, IngestError>> {
    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        tasks.spawn_blocking(move || (index, read_one(&path)));
    }

    let mut slots: Vec<Option<Result<SelectedFile, IngestError>>> =
        std::iter::repeat_with(|| None).take(paths.len()).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                debug!(index, ok = result.is_ok(), "file read settled");
                slots[index] = Some(result);
            }
            Err(e) => error!(error = %e, "file read task failed"),
        }
    }

    slots
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| {
                Err(IngestError::Unreadable {
                    name: path.display().to_string(),
                    reason: "read task aborted".into(),
                })
            })
        })
        .collect()
}

/// Executes `GenerateOperation`s over HTTPS against each operation's `api_base`.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(api_key: SecretString) -> Result<Self, NativeError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            api_key,
        })
    }

    pub fn from_env() -> Result<Self, NativeError> {
        let key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .ok_or(NativeError::MissingApiKey { vars: API_KEY_VARS })?;
        Self::new(SecretString::new(key))
    }

    /// Single attempt. Every failure collapses into a `GenerationError`.
    #[instrument(skip(self, operation), fields(model = %operation.model, images = operation.images.len()))]
    pub async fn execute(&self, operation: &GenerateOperation) -> GenerationResult {
        if self.api_key.expose_secret().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let url = endpoint(&operation.api_base, &operation.model)?;
        let body = GenerateContentRequest::from(operation);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| GenerationError::Transport {
            reason: e.without_url().to_string(),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "generation request rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: Some(String::from_utf8_lossy(&bytes).into_owned()),
            });
        }

        let response = GenerateContentResponse::from_slice(&bytes)?;
        let text = response.text();
        if text.is_empty() {
            warn!(
                finish_reason = response.finish_reason().unwrap_or("none"),
                "generation response carried no text"
            );
        } else {
            info!(chars = text.len(), "generation response received");
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn media_type_from_magic_then_extension() {
        assert_eq!(sniff_media_type(Path::new("x.bin"), PNG_MAGIC), "image/png");
        assert_eq!(sniff_media_type(Path::new("x.jpg"), b"not an image"), "image/jpeg");
        assert_eq!(sniff_media_type(Path::new("notes"), b"plain"), FALLBACK_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.png", PNG_MAGIC);
        let missing = dir.path().join("gone.png");
        let b = write(dir.path(), "b.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]);

        let results = read_batch(vec![a, missing, b]).await;
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.name, "a.png");
        assert_eq!(first.media_type, "image/png");
        assert_eq!(first.bytes, PNG_MAGIC);

        assert!(matches!(
            &results[1],
            Err(IngestError::Unreadable { name, .. }) if name == "gone.png"
        ));

        let third = results[2].as_ref().unwrap();
        assert_eq!(third.name, "b.jpg");
        assert_eq!(third.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn empty_batch() {
        assert!(read_batch(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn blank_key_fails_without_network() {
        let client = GeminiClient::new(SecretString::new(String::new())).unwrap();
        let op = GenerateOperation {
            api_base: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.5-flash".into(),
            temperature: 0.7,
            system_instruction: "x".into(),
            prompt: "y".into(),
            images: Vec::new(),
        };
        assert_eq!(client.execute(&op).await, Err(GenerationError::MissingApiKey));
    }
}
