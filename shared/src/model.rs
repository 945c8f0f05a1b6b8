use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::store::ImageStore;
use crate::{get_current_time_ms, AppError, ErrorKind, UnixTimeMs};

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(ImageId);
typed_id!(PostId);

/// One uploaded product photo. Immutable once created.
///
/// `encoded_data` is plain base64 (no `data:` prefix) and is the only form of
/// the bytes sent to the generator. `display_uri` is for rendering only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: ImageId,
    pub file_name: String,
    pub display_uri: String,
    pub encoded_data: String,
    pub media_type: String,
    pub byte_len: usize,
}

/// The single current post. `selected_images` shares the store's allocations,
/// so removing an image from the library leaves the post intact.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedPost {
    pub id: PostId,
    pub content: String,
    pub selected_images: Vec<Arc<UploadedImage>>,
    pub timestamp: UnixTimeMs,
}

impl GeneratedPost {
    #[must_use]
    pub fn new(content: String, selected_images: Vec<Arc<UploadedImage>>) -> Self {
        Self {
            id: PostId::generate(),
            content,
            selected_images,
            timestamp: UnixTimeMs::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTransition {
    Start,
    Succeed,
    Fail,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_generating(self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Pure transition function for the generation lifecycle.
    pub fn next(self, transition: PhaseTransition) -> Result<Self, TransitionError> {
        match (self, transition) {
            (Self::Idle | Self::Success | Self::Error, PhaseTransition::Start) => {
                Ok(Self::Generating)
            }
            (Self::Generating, PhaseTransition::Succeed) => Ok(Self::Success),
            (Self::Generating, PhaseTransition::Fail) => Ok(Self::Error),
            (from, transition) => Err(TransitionError::InvalidTransition { from, transition }),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid transition {transition:?} from phase {from}")]
    InvalidTransition {
        from: Phase,
        transition: PhaseTransition,
    },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::new(ErrorKind::InvalidState, e.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind, now_ms: u64) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: now_ms,
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

pub struct Model {
    pub phase: Phase,
    pub images: ImageStore,
    pub current_post: Option<GeneratedPost>,
    /// Images sampled for the request in flight.
    pub pending_selection: Option<Vec<Arc<UploadedImage>>>,
    pub config: GeneratorConfig,
    pub active_error: Option<AppError>,
    pub active_toast: Option<ToastMessage>,
    pub copied_at: Option<UnixTimeMs>,
    pub rng: StdRng,
    pub view_timestamp_ms: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            images: ImageStore::new(),
            current_post: None,
            pending_selection: None,
            config: GeneratorConfig::default(),
            active_error: None,
            active_toast: None,
            copied_at: None,
            rng: StdRng::from_entropy(),
            view_timestamp_ms: get_current_time_ms(),
        }
    }
}

impl Model {
    pub fn update_timestamp(&mut self) {
        self.view_timestamp_ms = get_current_time_ms();
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind, self.view_timestamp_ms));
    }

    /// The generate action is offered only with images and no request in flight.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.images.is_empty() && !self.phase.is_generating()
    }

    #[must_use]
    pub fn is_copy_confirmed(&self) -> bool {
        self.copied_at.is_some_and(|at| {
            UnixTimeMs(self.view_timestamp_ms).elapsed_since(at) < crate::COPY_CONFIRMATION_MS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_legal_from_every_resting_phase() {
        for phase in [Phase::Idle, Phase::Success, Phase::Error] {
            assert_eq!(phase.next(PhaseTransition::Start), Ok(Phase::Generating));
        }
    }

    #[test]
    fn generating_resolves_to_exactly_one_outcome() {
        assert_eq!(Phase::Generating.next(PhaseTransition::Succeed), Ok(Phase::Success));
        assert_eq!(Phase::Generating.next(PhaseTransition::Fail), Ok(Phase::Error));
    }

    #[test]
    fn cannot_start_while_generating() {
        assert!(matches!(
            Phase::Generating.next(PhaseTransition::Start),
            Err(TransitionError::InvalidTransition { from: Phase::Generating, .. })
        ));
    }

    #[test]
    fn outcomes_require_generating() {
        for phase in [Phase::Idle, Phase::Success, Phase::Error] {
            assert!(phase.next(PhaseTransition::Succeed).is_err());
            assert!(phase.next(PhaseTransition::Fail).is_err());
        }
    }

    #[test]
    fn typed_ids_are_unique() {
        assert_ne!(ImageId::generate(), ImageId::generate());
        assert_ne!(PostId::generate(), PostId::generate());
    }

    #[test]
    fn toast_expiry() {
        let toast = ToastMessage::new("2 files skipped", ToastKind::Warning, 1_000);
        assert!(!toast.is_expired(5_000));
        assert!(toast.is_expired(5_001));
    }

    #[test]
    fn copy_confirmation_is_time_limited() {
        let mut model = Model::default();
        model.view_timestamp_ms = 10_000;
        model.copied_at = Some(UnixTimeMs(9_000));
        assert!(model.is_copy_confirmed());

        model.view_timestamp_ms = 11_000;
        assert!(!model.is_copy_confirmed());
    }

    #[test]
    fn default_model_cannot_generate() {
        let model = Model::default();
        assert_eq!(model.phase, Phase::Idle);
        assert!(!model.can_generate());
        assert!(model.current_post.is_none());
    }
}
