use std::mem;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use crate::error::SlideshowError;
use crate::media::MediaItem;
use crate::notice::Notice;
use crate::scheduler::DeferredAdvance;
use crate::state::{Effect, SlideshowState, Step};

/// The UI collaborator the slideshow drives.
pub trait Presenter {
    /// Shows the video surface, hides the image surface and starts playback.
    fn play_video(&mut self, path: &Path) -> Result<()>;
    fn stop_video(&mut self);
    /// Shows the image surface, hides the video surface and loads the image.
    fn show_image(&mut self, path: &Path) -> Result<()>;
    fn hide_image(&mut self);
    /// Hides (or restores) window chrome and the playback controls.
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn dismiss_keyboard(&mut self);
    fn notify(&mut self, notice: &Notice);
    fn duration_text(&self) -> String;
    /// Reports the end of the current video, once.
    fn poll_video(&mut self) -> VideoEvent;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VideoEvent {
    #[default]
    None,
    Completed,
    Failed(PathBuf),
}

pub struct Engine<P: Presenter> {
    state: SlideshowState,
    scheduler: DeferredAdvance,
    presenter: P,
}

impl<P: Presenter> Engine<P> {
    pub fn new(media: Vec<MediaItem>, presenter: P) -> Self {
        Self {
            state: SlideshowState::new(media),
            scheduler: DeferredAdvance::new(),
            presenter,
        }
    }

    pub fn state(&self) -> &SlideshowState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn play(&mut self) {
        self.transition(|state, text| state.play(text));
    }

    pub fn stop(&mut self) {
        self.transition(|state, _| state.stop());
    }

    pub fn surface_tapped(&mut self) {
        self.transition(|state, _| state.surface_tapped());
    }

    /// Called once per frame with the elapsed time.
    pub fn tick(&mut self, dt: Duration) {
        match self.presenter.poll_video() {
            VideoEvent::None => {}
            VideoEvent::Completed => self.transition(|state, text| state.video_completed(text)),
            VideoEvent::Failed(path) => {
                warn!("Video {} ended without a frame", path.display());
                self.transition(|state, text| state.media_unavailable(&path, text));
            }
        }
        if let Some(timer) = self.scheduler.tick(dt) {
            self.transition(|state, text| state.timer_expired(timer, text));
        }
    }

    fn transition(&mut self, f: impl FnOnce(SlideshowState, &str) -> Step) {
        // The seconds field is read fresh for every transition.
        let text = self.presenter.duration_text();
        let mut next = Some(f(mem::take(&mut self.state), &text));

        while let Some(Step { state, effects }) = next.take() {
            self.state = state;
            if let Some(path) = self.apply(effects) {
                next = Some(mem::take(&mut self.state).media_unavailable(&path, &text));
            }
        }
    }

    /// Carries out effects in order. Returns the file that failed to load, if any.
    fn apply(&mut self, effects: Vec<Effect>) -> Option<PathBuf> {
        let mut failed = None;
        for effect in effects {
            match effect {
                Effect::EnterFullscreen => self.presenter.set_fullscreen(true),
                Effect::ExitFullscreen => self.presenter.set_fullscreen(false),
                Effect::DismissKeyboard => self.presenter.dismiss_keyboard(),
                Effect::PlayVideo(path) => {
                    info!("Playing video {}", path.display());
                    if let Err(e) = self.presenter.play_video(&path) {
                        warn!("{}: {:#}", SlideshowError::MediaUnavailable(path.clone()), e);
                        failed = Some(path);
                    }
                }
                Effect::StopVideo => self.presenter.stop_video(),
                Effect::ShowImage(path) => {
                    info!("Showing image {}", path.display());
                    if let Err(e) = self.presenter.show_image(&path) {
                        warn!("{}: {:#}", SlideshowError::MediaUnavailable(path.clone()), e);
                        failed = Some(path);
                    }
                }
                Effect::HideImage => self.presenter.hide_image(),
                Effect::ScheduleAdvance { timer, delay } => self.scheduler.schedule(timer, delay),
                Effect::CancelAdvance => self.scheduler.cancel(),
                Effect::Notify(notice) => {
                    info!("{}", notice);
                    self.presenter.notify(&notice);
                }
            }
        }
        failed
    }
}
