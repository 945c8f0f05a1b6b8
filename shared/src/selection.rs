//! Random choice of which library images feature in a post.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::model::UploadedImage;
use crate::{MAX_SELECTION, MIN_SELECTION};

/// How many images to feature given `available` in the library.
///
/// 2 or 3 (uniformly) when at least 3 exist, otherwise everything available.
pub fn selection_count<R: Rng + ?Sized>(available: usize, rng: &mut R) -> usize {
    if available < MAX_SELECTION {
        return available;
    }
    rng.gen_range(MIN_SELECTION..=MAX_SELECTION)
}

/// Uniform permutation of `0..len` (Fisher–Yates via `SliceRandom::shuffle`).
pub fn shuffled_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

/// Samples without replacement; result order is the shuffle order.
pub fn select_images<R: Rng + ?Sized>(
    images: &[Arc<UploadedImage>],
    rng: &mut R,
) -> Vec<Arc<UploadedImage>> {
    let count = selection_count(images.len(), rng);
    shuffled_indices(images.len(), rng)
        .into_iter()
        .take(count)
        .map(|i| Arc::clone(&images[i]))
        .collect()
}
