use serde::{Deserialize, Serialize};

use crate::capabilities::{ClipboardResult, GenerationResult};
use crate::config::GeneratorConfig;
use crate::ingest::{IngestError, SelectedFile};
use crate::model::ImageId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Event {
    #[default]
    Noop,
    /// Refreshes the view clock so time-limited confirmations can lapse.
    Tick,

    /// One upload batch, read completely by the shell before it is sent.
    /// `failures` lists files the shell could not read.
    ImagesSelected {
        files: Vec<SelectedFile>,
        #[serde(default)]
        failures: Vec<IngestError>,
    },
    RemoveImage {
        id: ImageId,
    },

    GeneratePost,
    PostGenerated(GenerationResult),

    CopyPostRequested,
    CopyCompleted(ClipboardResult),

    ConfigureGenerator(GeneratorConfig),
    SeedSelection {
        seed: u64,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Tick => "tick",
            Self::ImagesSelected { .. } => "images_selected",
            Self::RemoveImage { .. } => "remove_image",
            Self::GeneratePost => "generate_post",
            Self::PostGenerated(_) => "post_generated",
            Self::CopyPostRequested => "copy_post_requested",
            Self::CopyCompleted(_) => "copy_completed",
            Self::ConfigureGenerator(_) => "configure_generator",
            Self::SeedSelection { .. } => "seed_selection",
        }
    }

    /// Splits settled shell reads into one upload batch.
    pub fn images_selected(
        results: impl IntoIterator<Item = Result<SelectedFile, IngestError>>,
    ) -> Self {
        let (mut files, mut failures) = (Vec::new(), Vec::new());
        for result in results {
            match result {
                Ok(file) => files.push(file),
                Err(e) => failures.push(e),
            }
        }
        Self::ImagesSelected { files, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(Event::GeneratePost.name(), "generate_post");
        assert_eq!(Event::PostGenerated(Ok(String::new())).name(), "post_generated");
        assert_eq!(Event::default().name(), "noop");
    }

    #[test]
    fn read_results_split_into_files_and_failures() {
        let ok = SelectedFile {
            name: "bed.jpg".into(),
            media_type: "image/jpeg".into(),
            display_uri: "file:///bed.jpg".into(),
            bytes: vec![1],
        };
        let missing = IngestError::Unreadable {
            name: "gone.jpg".into(),
            reason: "not found".into(),
        };

        let event = Event::images_selected(vec![Ok(ok.clone()), Err(missing.clone())]);
        assert_eq!(
            event,
            Event::ImagesSelected {
                files: vec![ok],
                failures: vec![missing],
            }
        );
    }

    #[test]
    fn failures_default_when_absent_from_json() {
        let event: Event = serde_json::from_str(r#"{"ImagesSelected":{"files":[]}}"#).unwrap();
        assert_eq!(event, Event::images_selected(Vec::new()));
    }

    #[test]
    fn events_cross_the_ffi_boundary_as_json() {
        let event = Event::ImagesSelected {
            files: vec![SelectedFile {
                name: "desk.jpg".into(),
                media_type: "image/jpeg".into(),
                display_uri: "blob:desk".into(),
                bytes: vec![0xFF, 0xD8, 0xFF],
            }],
            failures: Vec::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
