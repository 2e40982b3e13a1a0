use std::path::PathBuf;

use clap::Parser;

/// Loops over the images and videos of a media folder.
#[derive(Debug, Parser)]
#[command(name = "media-slideshow", version)]
pub struct Args {
    /// Directory holding `MyMediaFolder` (defaults to the home directory)
    #[arg(long, env = "SLIDESHOW_ROOT")]
    pub root: Option<PathBuf>,

    /// Initial content of the seconds-per-image field
    #[arg(long, default_value = "")]
    pub seconds: String,

    /// Play the folder in random order
    #[arg(long)]
    pub shuffle: bool,

    /// ffmpeg binary used to decode videos
    #[arg(long, env = "SLIDESHOW_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Only hide the controls when playing, leave the window as it is
    #[arg(long)]
    pub keep_window: bool,
}

impl Args {
    pub fn media_root(&self) -> Option<PathBuf> {
        self.root.clone().or_else(|| {
            directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
        })
    }
}
