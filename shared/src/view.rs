use serde::{Deserialize, Serialize};

use crate::model::{GeneratedPost, Model, Phase, ToastKind, ToastMessage, UploadedImage};
use crate::{AppError, GENERATION_FAILED_MESSAGE};

pub const GENERATE_LABEL: &str = "Generate New Post";
pub const GENERATING_LABEL: &str = "Generating Content...";
pub const EMPTY_LIBRARY_HINT: &str = "Please upload images first";
pub const EMPTY_PREVIEW_TEXT: &str = "No post generated yet. Click \"Generate Post\" to start.";
pub const LOADING_TITLE: &str = "Analyzing images...";
pub const LOADING_SUBTITLE: &str = "Generating marketing copy...";
pub const COPY_LABEL: &str = "Copy Text for Facebook";
pub const COPIED_LABEL: &str = "Copied to Clipboard!";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryItem {
    pub id: String,
    pub file_name: String,
    pub display_uri: String,
}

impl From<&UploadedImage> for LibraryItem {
    fn from(image: &UploadedImage) -> Self {
        Self {
            id: image.id.to_string(),
            file_name: image.file_name.clone(),
            display_uri: image.display_uri.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateControl {
    pub enabled: bool,
    pub label: String,
    pub in_progress: bool,
    pub hint: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u8,
    pub height: u8,
}

impl AspectRatio {
    pub const SQUARE: Self = Self { width: 1, height: 1 };
    pub const WIDE: Self = Self { width: 2, height: 1 };
    pub const LANDSCAPE: Self = Self { width: 4, height: 3 };
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostLayout {
    /// One full-width 4:3 image.
    Single,
    /// Two square tiles side by side.
    Pair,
    /// First image across both columns at 2:1, two square tiles below.
    Featured,
}

impl PostLayout {
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Single,
            2 => Self::Pair,
            _ => Self::Featured,
        }
    }

    #[must_use]
    pub const fn columns(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Pair | Self::Featured => 2,
        }
    }

    #[must_use]
    pub const fn tile(self, index: usize) -> (u8, AspectRatio) {
        match (self, index) {
            (Self::Single, _) => (1, AspectRatio::LANDSCAPE),
            (Self::Featured, 0) => (2, AspectRatio::WIDE),
            _ => (1, AspectRatio::SQUARE),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostTile {
    pub id: String,
    pub display_uri: String,
    pub column_span: u8,
    pub aspect: AspectRatio,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostView {
    pub id: String,
    pub page_name: String,
    pub avatar_initials: String,
    pub posted_label: String,
    pub content: String,
    pub layout: PostLayout,
    pub columns: u8,
    pub tiles: Vec<PostTile>,
    pub copied: bool,
    pub copy_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewState {
    Empty { message: String },
    Loading { title: String, subtitle: String },
    Post(PostView),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub phase: Phase,
    pub library: Vec<LibraryItem>,
    pub generate: GenerateControl,
    pub preview: PreviewState,
    pub error: Option<UserFacingError>,
    pub toast: Option<ToastView>,
}

pub(crate) fn build_post_view(model: &Model, post: &GeneratedPost) -> PostView {
    let layout = PostLayout::for_count(post.selected_images.len());
    let tiles = post
        .selected_images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let (column_span, aspect) = layout.tile(index);
            PostTile {
                id: image.id.to_string(),
                display_uri: image.display_uri.clone(),
                column_span,
                aspect,
            }
        })
        .collect();

    let copied = model.is_copy_confirmed();
    PostView {
        id: post.id.to_string(),
        page_name: model.config.profile.page_name.clone(),
        avatar_initials: model.config.profile.avatar_initials.clone(),
        posted_label: "Just now".into(),
        content: post.content.clone(),
        layout,
        columns: layout.columns(),
        tiles,
        copied,
        copy_label: if copied { COPIED_LABEL } else { COPY_LABEL }.into(),
    }
}

pub(crate) fn build_view(model: &Model) -> ViewModel {
    let now_ms = model.view_timestamp_ms;
    let generating = model.phase.is_generating();

    let preview = match (model.phase, &model.current_post) {
        (Phase::Generating, _) => PreviewState::Loading {
            title: LOADING_TITLE.into(),
            subtitle: LOADING_SUBTITLE.into(),
        },
        (_, Some(post)) => PreviewState::Post(build_post_view(model, post)),
        (_, None) => PreviewState::Empty {
            message: EMPTY_PREVIEW_TEXT.into(),
        },
    };

    let error = match model.phase {
        Phase::Error => Some(model.active_error.as_ref().map_or_else(
            || UserFacingError {
                message: GENERATION_FAILED_MESSAGE.into(),
                error_code: crate::ErrorKind::Generation.code().into(),
            },
            UserFacingError::from,
        )),
        _ => model.active_error.as_ref().map(UserFacingError::from),
    };

    ViewModel {
        phase: model.phase,
        library: model.images.iter().map(|img| LibraryItem::from(img.as_ref())).collect(),
        generate: GenerateControl {
            enabled: model.can_generate(),
            label: if generating { GENERATING_LABEL } else { GENERATE_LABEL }.into(),
            in_progress: generating,
            hint: model.images.is_empty().then(|| EMPTY_LIBRARY_HINT.into()),
        },
        preview,
        error,
        toast: model
            .active_toast
            .as_ref()
            .filter(|t| !t.is_expired(now_ms))
            .map(ToastView::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_by_count() {
        assert_eq!(PostLayout::for_count(1), PostLayout::Single);
        assert_eq!(PostLayout::for_count(2), PostLayout::Pair);
        assert_eq!(PostLayout::for_count(3), PostLayout::Featured);
    }

    #[test]
    fn featured_layout_widens_first_tile_only() {
        let layout = PostLayout::Featured;
        assert_eq!(layout.tile(0), (2, AspectRatio::WIDE));
        assert_eq!(layout.tile(1), (1, AspectRatio::SQUARE));
        assert_eq!(layout.tile(2), (1, AspectRatio::SQUARE));
        assert_eq!(layout.columns(), 2);
    }

    #[test]
    fn single_and_pair_tiles() {
        assert_eq!(PostLayout::Single.tile(0), (1, AspectRatio::LANDSCAPE));
        assert_eq!(PostLayout::Single.columns(), 1);
        assert_eq!(PostLayout::Pair.tile(0), (1, AspectRatio::SQUARE));
        assert_eq!(PostLayout::Pair.tile(1), (1, AspectRatio::SQUARE));
    }

    #[test]
    fn empty_model_view() {
        let view = build_view(&Model::default());
        assert_eq!(view.phase, Phase::Idle);
        assert!(!view.generate.enabled);
        assert_eq!(view.generate.label, GENERATE_LABEL);
        assert_eq!(view.generate.hint.as_deref(), Some(EMPTY_LIBRARY_HINT));
        assert_eq!(
            view.preview,
            PreviewState::Empty { message: EMPTY_PREVIEW_TEXT.into() }
        );
        assert!(view.error.is_none());
    }

    #[test]
    fn error_phase_always_shows_generic_message() {
        let mut model = Model::default();
        model.phase = Phase::Error;
        let view = build_view(&model);
        assert_eq!(
            view.error.map(|e| e.message).as_deref(),
            Some(GENERATION_FAILED_MESSAGE)
        );
    }

    #[test]
    fn expired_toasts_are_hidden() {
        let mut model = Model::default();
        model.view_timestamp_ms = 1_000;
        model.show_toast("1 file could not be added", ToastKind::Warning);
        assert!(build_view(&model).toast.is_some());

        model.view_timestamp_ms = 10_000;
        assert!(build_view(&model).toast.is_none());
    }
}
