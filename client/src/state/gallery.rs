//! Dashboard gallery state.
//!
//! DESIGN
//! ======
//! Each refresh takes a generation number from [`GalleryState::begin_refresh`].
//! A result is applied only if no newer refresh started in the meantime, so a
//! slow listing can never overwrite a fresher one.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use crate::util::gallery::{GalleryError, GalleryListing, ResolvedImage, Visibility};

/// Tone of the inline status line under the upload control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Success, text: text.into() }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Error, text: text.into() }
    }
}

/// Images shown on the dashboard plus in-flight flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GalleryState {
    pub images: Vec<ResolvedImage>,
    pub loading: bool,
    /// Listing failure, shown in place of the grid.
    pub error: Option<String>,
    pub message: Option<StatusMessage>,
    pub uploading: bool,
    pub visibility: Option<Visibility>,
    /// Objects skipped in the last listing.
    pub failed: usize,
    generation: u64,
}

impl GalleryState {
    /// Mark a refresh as started and return its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply the result of refresh `generation`. Returns `false` and leaves
    /// the state untouched when a newer refresh has started since.
    pub fn finish_refresh(&mut self, generation: u64, result: Result<GalleryListing, GalleryError>) -> bool {
        if generation != self.generation {
            log::debug!("discarding stale gallery refresh {generation} (current {})", self.generation);
            return false;
        }
        self.loading = false;
        match result {
            Ok(listing) => {
                self.images = listing.images;
                self.visibility = Some(listing.visibility);
                self.failed = listing.failed;
                self.error = None;
            }
            Err(e) => {
                self.images.clear();
                self.failed = 0;
                self.error = Some(e.message().to_owned());
            }
        }
        true
    }

    /// Forget everything shown for the previous user. In-flight refreshes
    /// become stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self { generation, ..Self::default() };
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.message = Some(message);
    }
}
