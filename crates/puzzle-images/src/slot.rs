//! Optional image attached to a draft record (a puzzle being created, say).

use puzzle_core::{CandidateFile, ImageReference};
use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::manager::ImageManager;

/// At most one image reference owned by a record.
///
/// The slot only changes when the remote side effect succeeded: a failed
/// upload keeps the previous image, and a failed removal keeps the reference
/// so the object is never orphaned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSlot {
    current: Option<ImageReference>,
}

impl ImageSlot {
    pub fn new(current: Option<ImageReference>) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Option<&ImageReference> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Detach the reference without touching storage.
    pub fn take(&mut self) -> Option<ImageReference> {
        self.current.take()
    }

    /// Upload `file` and make it the current image.
    ///
    /// Returns the reference it replaced. The replaced object is left in
    /// storage; the caller decides whether to remove it.
    pub async fn attach(
        &mut self,
        manager: &ImageManager,
        file: &CandidateFile,
        owner_id: &str,
    ) -> Result<Option<ImageReference>, ImageError> {
        let reference = manager.upload(file, owner_id).await?;
        Ok(self.current.replace(reference))
    }

    /// Remove the current image from storage and empty the slot.
    ///
    /// Returns the removed reference, or `None` if the slot was already empty.
    pub async fn clear(
        &mut self,
        manager: &ImageManager,
    ) -> Result<Option<ImageReference>, ImageError> {
        let Some(reference) = self.current.as_ref() else {
            return Ok(None);
        };

        manager.remove(reference).await?;
        Ok(self.current.take())
    }
}
