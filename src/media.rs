use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::seq::SliceRandom;

use crate::constants::*;
use crate::error::SlideshowError;
use crate::notice::Notice;

/// How a file is played, decided once from its name when the folder is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
    Unknown,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Self {
        let name = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name,
            None => return MediaKind::Unknown,
        };
        if name.ends_with(VIDEO_SUFFIX) {
            return MediaKind::Video;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else {
            MediaKind::Unknown
        }
    }

    pub fn is_playable(self) -> bool {
        self != MediaKind::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = MediaKind::from_path(&path);
        Self { path, kind }
    }
}

/// Result of making sure the media folder is there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Existing,
    Created,
}

pub fn media_folder(root: &Path) -> PathBuf {
    root.join(MEDIA_FOLDER_NAME)
}

/// Reports whether new entries can be written under `root`.
///
/// This only informs the user; folder creation is attempted either way.
pub fn check_write_access(root: &Path) -> Result<(), SlideshowError> {
    match fs::metadata(root) {
        Ok(meta) if meta.permissions().readonly() => {
            Err(SlideshowError::PermissionDenied(root.to_path_buf()))
        }
        _ => Ok(()),
    }
}

pub fn ensure_media_folder(folder: &Path) -> Result<FolderStatus, SlideshowError> {
    if folder.is_dir() {
        return Ok(FolderStatus::Existing);
    }
    fs::create_dir_all(folder).map_err(|source| creation_error(folder, source))?;
    info!("Created media folder {}", folder.display());
    Ok(FolderStatus::Created)
}

/// A refused `mkdir` is a permission problem, anything else a plain failure.
fn creation_error(folder: &Path, source: io::Error) -> SlideshowError {
    if source.kind() == io::ErrorKind::PermissionDenied {
        let parent = folder.parent().unwrap_or(folder);
        SlideshowError::PermissionDenied(parent.to_path_buf())
    } else {
        SlideshowError::FolderCreateFailed {
            path: folder.to_path_buf(),
            source,
        }
    }
}

/// Lists the files of the media folder, sorted by file name.
///
/// A missing folder yields an empty list. Sub-directories are ignored and
/// unreadable entries are skipped with a warning.
pub fn load_media_list(folder: &Path) -> Vec<MediaItem> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read directory entry in {}: {}", folder.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() {
            items.push(MediaItem::new(path));
        }
    }
    items.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    let unknown = items.iter().filter(|item| !item.kind.is_playable()).count();
    info!(
        "Found {} files in {} ({} not playable)",
        items.len(),
        folder.display(),
        unknown
    );
    items
}

/// Prepares the media folder under `root` and lists it.
///
/// Problems are returned as notices for the user; none of them is fatal.
pub fn initialize(root: &Path) -> (Vec<MediaItem>, Vec<Notice>) {
    fn report(e: SlideshowError, notices: &mut Vec<Notice>) {
        warn!("{}", e);
        if let Some(notice) = e.notice() {
            if !notices.contains(&notice) {
                notices.push(notice);
            }
        }
    }

    let mut notices = Vec::new();
    if let Err(e) = check_write_access(root) {
        report(e, &mut notices);
    }

    let folder = media_folder(root);
    match ensure_media_folder(&folder) {
        Ok(FolderStatus::Created) => notices.push(Notice::FolderCreated(folder.clone())),
        Ok(FolderStatus::Existing) => {}
        Err(e) => report(e, &mut notices),
    }

    (load_media_list(&folder), notices)
}

pub fn shuffle(items: &mut [MediaItem]) {
    items.shuffle(&mut rand::rng());
}
