pub const WINDOW_WIDTH: i32 = 1280;            // Initial window width
pub const WINDOW_HEIGHT: i32 = 720;            // Initial window height
pub const FPS: u32 = 60;                       // Frames per second of the UI loop

pub const MEDIA_FOLDER_NAME: &str = "MyMediaFolder"; // Sub-folder of the media root
pub const VIDEO_SUFFIX: &str = ".mp4";               // Literal suffix selecting video playback
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

pub const DEFAULT_DISPLAY_SECONDS: u64 = 5;    // Used when the seconds field can't be parsed
pub const MAX_DURATION_DIGITS: usize = 6;      // Longest text accepted by the seconds field

pub const VIDEO_WIDTH: i32 = 1280;             // Decoded video frames are padded to this size
pub const VIDEO_HEIGHT: i32 = 720;
pub const VIDEO_FPS: u32 = 30;                 // Decoded video frame rate

pub const CONTROL_BAR_HEIGHT: i32 = 64;        // Bottom bar holding the seconds field and buttons
pub const NOTICE_DURATION: f32 = 2.0;          // How long a notice stays on screen (seconds)
pub const MAX_NOTICES: usize = 4;              // Notices shown at once
