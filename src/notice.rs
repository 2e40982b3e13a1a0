use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

use crate::constants::*;
use crate::error::SlideshowError;

/// Transient, non-blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FolderCreated(PathBuf),
    FolderCreateFailed(PathBuf),
    PermissionDenied(PathBuf),
    NoMedia,
    MediaUnavailable(PathBuf),
    FullscreenExited,
    Stopped,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FolderCreated(path) => write!(f, "Folder created: {}", path.display()),
            Notice::FolderCreateFailed(path) => write!(f, "Failed to create folder: {}", path.display()),
            Notice::PermissionDenied(path) => write!(f, "No write permission for {}", path.display()),
            Notice::NoMedia => write!(f, "No media files found"),
            Notice::MediaUnavailable(path) => {
                let name = path.file_name().unwrap_or(path.as_os_str());
                write!(f, "Cannot play {}", name.to_string_lossy())
            }
            Notice::FullscreenExited => write!(f, "Exited fullscreen"),
            Notice::Stopped => write!(f, "Playback stopped"),
        }
    }
}

impl SlideshowError {
    /// Notice reported for this error. Invalid duration input is silent.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SlideshowError::PermissionDenied(path) => Some(Notice::PermissionDenied(path.clone())),
            SlideshowError::FolderCreateFailed { path, .. } => Some(Notice::FolderCreateFailed(path.clone())),
            SlideshowError::NoMediaAvailable => Some(Notice::NoMedia),
            SlideshowError::InvalidDurationInput(_) => None,
            SlideshowError::MediaUnavailable(path) => Some(Notice::MediaUnavailable(path.clone())),
        }
    }
}

struct Toast {
    text: String,
    remaining: f32,
}

/// Queue of notices currently on screen, oldest first.
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    pub fn push(&mut self, notice: &Notice) {
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            text: notice.to_string(),
            remaining: NOTICE_DURATION,
        });
    }

    pub fn update(&mut self, dt: f32) {
        for toast in self.queue.iter_mut() {
            toast.remaining -= dt;
        }
        self.queue.retain(|toast| toast.remaining > 0.0);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(|toast| toast.text.as_str())
    }
}
