use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while preparing or playing the slideshow.
///
/// None of these stop the application: each one is reported to the user as a
/// notice and the slideshow falls back to a safe state.
#[derive(Debug, Error)]
pub enum SlideshowError {
    #[error("no write access to {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("failed to create folder {}: {source}", .path.display())]
    FolderCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no media files")]
    NoMediaAvailable,

    #[error("invalid display duration {0:?}")]
    InvalidDurationInput(String),

    #[error("media file unavailable: {}", .0.display())]
    MediaUnavailable(PathBuf),
}
