use std::sync::Arc;

use tracing::debug;

use crate::model::{ImageId, UploadedImage};

/// Ordered, in-memory library of uploaded images.
///
/// Entries are reference counted so a generated post can keep the images it
/// used after they leave the library.
#[derive(Debug, Default, Clone)]
pub struct ImageStore {
    images: Vec<Arc<UploadedImage>>,
}

impl ImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Appends a whole batch in arrival order in one step. No deduplication.
    pub fn append_batch(&mut self, batch: Vec<UploadedImage>) -> usize {
        let added = batch.len();
        self.images.reserve(added);
        self.images.extend(batch.into_iter().map(Arc::new));
        debug!(added, total = self.images.len(), "image batch committed");
        added
    }

    /// Removes the entry with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &ImageId) -> Option<Arc<UploadedImage>> {
        let index = self.images.iter().position(|img| &img.id == id)?;
        Some(self.images.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Arc<UploadedImage>] {
        &self.images
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<UploadedImage>> {
        self.images.iter()
    }
}
