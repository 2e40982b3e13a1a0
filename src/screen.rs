use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::{debug, warn};
use raylib::prelude::*;

use crate::cli::Args;
use crate::constants::*;
use crate::duration::DurationField;
use crate::engine::{Presenter, VideoEvent};
use crate::notice::{Notice, Toasts};
use crate::texture_loader::{fit_scale, load_texture_with_exif_rotation};
use crate::video::{FrameStatus, VideoPlayer};

/// User actions the slideshow reacts to.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Play,
    Stop,
    SurfaceTapped,
}

struct Layout {
    media: Rectangle,
    field: Rectangle,
    play: Rectangle,
    stop: Rectangle,
}

impl Layout {
    fn new(width: i32, height: i32, controls_visible: bool) -> Self {
        let (w, h) = (width as f32, height as f32);
        let bar = CONTROL_BAR_HEIGHT as f32;
        let media_height = if controls_visible { h - bar } else { h };
        let top = h - bar + 10.0;
        Self {
            media: Rectangle::new(0.0, 0.0, w, media_height),
            field: Rectangle::new(10.0, top, 120.0, bar - 20.0),
            play: Rectangle::new(140.0, top, 100.0, bar - 20.0),
            stop: Rectangle::new(250.0, top, 100.0, bar - 20.0),
        }
    }
}

/// Window showing the slideshow: one media area plus a control bar.
///
/// Textures are declared before the handle so they are unloaded before the
/// window closes.
pub struct Screen {
    ffmpeg: PathBuf,
    keep_window: bool,
    controls_visible: bool,

    field: DurationField,
    toasts: Toasts,

    image: Option<Texture2D>,
    image_visible: bool,

    video: Option<VideoPlayer>,
    video_path: Option<PathBuf>,
    video_texture: Texture2D,
    video_visible: bool,
    video_event: VideoEvent,

    rl: RaylibHandle,
    thread: RaylibThread,
}

impl Screen {
    pub fn open(args: &Args) -> Result<Screen> {
        let (mut rl, thread) = raylib::init()
            .size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .title("Media Slideshow")
            .vsync()
            .resizable()
            .build();
        rl.set_target_fps(FPS);
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);
        // Escape leaves fullscreen instead of closing the window
        rl.set_exit_key(None);

        let blank = Image::gen_image_color(VIDEO_WIDTH, VIDEO_HEIGHT, Color::BLACK);
        let video_texture = rl
            .load_texture_from_image(&thread, &blank)
            .map_err(|e| anyhow!("failed to create video texture: {}", e))?;

        Ok(Screen {
            ffmpeg: args.ffmpeg.clone(),
            keep_window: args.keep_window,
            controls_visible: true,
            field: DurationField::new(&args.seconds),
            toasts: Toasts::new(),
            image: None,
            image_visible: false,
            video: None,
            video_path: None,
            video_texture,
            video_visible: false,
            video_event: VideoEvent::None,
            rl,
            thread,
        })
    }

    pub fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    pub fn frame_time(&self) -> f32 {
        self.rl.get_frame_time()
    }

    fn layout(&self) -> Layout {
        Layout::new(
            self.rl.get_screen_width(),
            self.rl.get_screen_height(),
            self.controls_visible,
        )
    }

    /// Handles mouse and keyboard for this frame.
    pub fn handle_input(&mut self) -> Option<Input> {
        if self.field.focused {
            while let Some(c) = self.rl.get_char_pressed() {
                self.field.push_char(c);
            }
            if self.rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
                self.field.backspace();
            }
            if self.rl.is_key_pressed(KeyboardKey::KEY_ENTER) {
                self.field.focused = false;
            }
        }
        if self.rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) && !self.controls_visible {
            return Some(Input::SurfaceTapped);
        }

        if !self.rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            return None;
        }
        let pos = self.rl.get_mouse_position();
        let layout = self.layout();

        if self.controls_visible {
            if layout.field.check_collision_point_rec(pos) {
                self.field.focused = true;
                return None;
            }
            self.field.focused = false;
            if layout.play.check_collision_point_rec(pos) {
                return Some(Input::Play);
            }
            if layout.stop.check_collision_point_rec(pos) {
                return Some(Input::Stop);
            }
        }
        if layout.media.check_collision_point_rec(pos) {
            return Some(Input::SurfaceTapped);
        }
        None
    }

    /// Expires notices and pulls due video frames.
    pub fn update(&mut self, dt: f32) {
        self.toasts.update(dt);

        let status = match self.video.as_mut() {
            Some(player) => match player.update(dt) {
                Ok(FrameStatus::NewFrame) => {
                    if let Err(e) = self.video_texture.update_texture(player.frame()) {
                        warn!("Failed to upload video frame: {}", e);
                    }
                    return;
                }
                Ok(status) => status,
                Err(e) => {
                    warn!("Video playback failed: {:#}", e);
                    FrameStatus::Empty
                }
            },
            None => return,
        };

        match status {
            FrameStatus::Waiting | FrameStatus::NewFrame => {}
            FrameStatus::Ended => {
                self.video = None;
                self.video_path = None;
                self.video_event = VideoEvent::Completed;
            }
            FrameStatus::Empty => {
                self.video = None;
                if let Some(path) = self.video_path.take() {
                    self.video_event = VideoEvent::Failed(path);
                }
            }
        }
    }

    fn draw_fitted(d: &mut RaylibDrawHandle, texture: &Texture2D, area: Rectangle) {
        let (tw, th) = (texture.width() as f32, texture.height() as f32);
        let scale = fit_scale(tw, th, area.width, area.height);
        let (w, h) = (tw * scale, th * scale);
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tw, th),
            Rectangle::new(area.x + (area.width - w) / 2.0, area.y + (area.height - h) / 2.0, w, h),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    pub fn draw(&mut self, status: &str) {
        let layout = self.layout();
        let width = self.rl.get_screen_width();
        let controls_visible = self.controls_visible;

        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);

        if self.video_visible {
            Self::draw_fitted(&mut d, &self.video_texture, layout.media);
        }
        if self.image_visible {
            if let Some(image) = &self.image {
                Self::draw_fitted(&mut d, image, layout.media);
            }
        }

        if controls_visible {
            let bar_top = layout.media.height as i32;
            d.draw_rectangle(0, bar_top, width, CONTROL_BAR_HEIGHT, Color::DARKGRAY);

            let field = layout.field;
            d.draw_rectangle_rec(field, Color::RAYWHITE);
            let border = if self.field.focused { Color::SKYBLUE } else { Color::GRAY };
            d.draw_rectangle_lines_ex(field, 2.0, border);
            let (text, color) = if self.field.text().is_empty() {
                ("seconds", Color::GRAY)
            } else {
                (self.field.text(), Color::BLACK)
            };
            d.draw_text(text, field.x as i32 + 8, field.y as i32 + 12, 20, color);

            for (rect, label) in [(layout.play, "Play"), (layout.stop, "Stop")] {
                d.draw_rectangle_rec(rect, Color::LIGHTGRAY);
                d.draw_text(label, rect.x as i32 + 26, rect.y as i32 + 12, 20, Color::BLACK);
            }
            let x = (layout.stop.x + layout.stop.width) as i32 + 20;
            d.draw_text(status, x, layout.stop.y as i32 + 12, 20, Color::RAYWHITE);
        }

        for (i, text) in self.toasts.texts().enumerate() {
            let y = 20 + i as i32 * 34;
            d.draw_rectangle(10, y - 4, width - 20, 30, Color::new(0, 0, 0, 170));
            d.draw_text(text, 20, y, 20, Color::WHITE);
        }
    }
}

impl Presenter for Screen {
    fn play_video(&mut self, path: &Path) -> Result<()> {
        self.video = None;
        self.video_event = VideoEvent::None;
        let player = VideoPlayer::spawn(&self.ffmpeg, path, VIDEO_WIDTH, VIDEO_HEIGHT, VIDEO_FPS)?;
        self.video = Some(player);
        self.video_path = Some(path.to_path_buf());
        self.video_visible = true;
        self.image_visible = false;
        self.image = None;
        Ok(())
    }

    fn stop_video(&mut self) {
        if let Some(path) = self.video_path.take() {
            debug!("Stopping {}", path.display());
        }
        self.video = None;
        self.video_event = VideoEvent::None;
    }

    fn show_image(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(anyhow!("{} does not exist", path.display()));
        }
        let texture = load_texture_with_exif_rotation(&mut self.rl, &self.thread, path)?;
        self.image = Some(texture);
        self.image_visible = true;
        self.video_visible = false;
        self.video = None;
        Ok(())
    }

    fn hide_image(&mut self) {
        self.image_visible = false;
        self.image = None;
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.controls_visible = !fullscreen;
        if !self.keep_window && self.rl.is_window_fullscreen() != fullscreen {
            self.rl.toggle_fullscreen();
        }
    }

    fn dismiss_keyboard(&mut self) {
        self.field.focused = false;
    }

    fn notify(&mut self, notice: &Notice) {
        self.toasts.push(notice);
    }

    fn duration_text(&self) -> String {
        self.field.text().to_string()
    }

    fn poll_video(&mut self) -> VideoEvent {
        mem::take(&mut self.video_event)
    }
}
