//! Slideshow state and its transitions.
//!
//! Every transition consumes the current [`SlideshowState`] and returns the
//! next one together with the [`Effect`]s the presentation layer has to carry
//! out. Nothing in here touches the screen, the filesystem or the clock.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::duration::display_duration;
use crate::media::{MediaItem, MediaKind};
use crate::notice::Notice;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Playback {
    #[default]
    Idle,
    PlayingVideo,
    PlayingImage,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Presentation {
    #[default]
    Normal,
    Fullscreen, // Window chrome and controls hidden
}

/// Identifies one scheduled image advance.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TimerId(u64);

#[derive(Debug, PartialEq, Clone)]
pub enum Effect {
    EnterFullscreen,
    ExitFullscreen,
    DismissKeyboard,
    PlayVideo(PathBuf),
    StopVideo,
    ShowImage(PathBuf),
    HideImage,
    ScheduleAdvance { timer: TimerId, delay: Duration },
    CancelAdvance,
    Notify(Notice),
}

#[derive(Debug, Clone, Default)]
pub struct SlideshowState {
    media: Vec<MediaItem>,
    cursor: usize,
    playback: Playback,
    presentation: Presentation,
    pending_timer: Option<TimerId>,
    timers_issued: u64,
}

/// Outcome of a transition.
#[derive(Debug)]
pub struct Step {
    pub state: SlideshowState,
    pub effects: Vec<Effect>,
}

/// Next cursor position in a list of `len` items, `None` for an empty list.
pub fn advance_cursor(cursor: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some((cursor + 1) % len)
    }
}

/// First playable index at or after `start`, wrapping around once.
fn playable_from(media: &[MediaItem], start: usize) -> Option<usize> {
    let len = media.len();
    (0..len)
        .map(|offset| (start + offset) % len)
        .find(|&index| media[index].kind.is_playable())
}

impl SlideshowState {
    pub fn new(media: Vec<MediaItem>) -> Self {
        Self {
            media,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn media(&self) -> &[MediaItem] {
        &self.media
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    #[cfg(test)]
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn current(&self) -> Option<&MediaItem> {
        self.media.get(self.cursor)
    }

    /// Short description for the control bar, e.g. `2/7  beach.jpg`.
    pub fn status_line(&self) -> String {
        match (self.playback, self.current()) {
            (Playback::Idle, _) | (_, None) => format!("{} files", self.media.len()),
            (_, Some(item)) => {
                let name = item.path.file_name().unwrap_or(item.path.as_os_str());
                format!("{}/{}  {}", self.cursor + 1, self.media.len(), name.to_string_lossy())
            }
        }
    }

    /// Play button. Starts (or restarts) playback from the cursor.
    pub fn play(mut self, duration_text: &str) -> Step {
        let mut effects = Vec::new();
        let index = match playable_from(&self.media, self.cursor) {
            Some(index) => index,
            None => {
                effects.push(Effect::DismissKeyboard);
                effects.push(Effect::Notify(Notice::NoMedia));
                return self.step(effects);
            }
        };

        self.halt(&mut effects);
        if self.presentation == Presentation::Normal {
            self.presentation = Presentation::Fullscreen;
            effects.push(Effect::EnterFullscreen);
        }
        effects.push(Effect::DismissKeyboard);

        self.cursor = index;
        self.dispatch(duration_text, &mut effects);
        self.step(effects)
    }

    /// Stop button. Keeps the cursor and the presentation mode.
    pub fn stop(mut self) -> Step {
        let mut effects = Vec::new();
        self.halt(&mut effects);
        effects.push(Effect::HideImage);
        effects.push(Effect::Notify(Notice::Stopped));
        self.step(effects)
    }

    /// Click on the video or image surface.
    pub fn surface_tapped(mut self) -> Step {
        let mut effects = Vec::new();
        if self.presentation == Presentation::Fullscreen {
            self.presentation = Presentation::Normal;
            effects.push(Effect::ExitFullscreen);
            effects.push(Effect::Notify(Notice::FullscreenExited));
        }
        self.step(effects)
    }

    pub fn video_completed(mut self, duration_text: &str) -> Step {
        let mut effects = Vec::new();
        if self.playback == Playback::PlayingVideo {
            self.advance(duration_text, &mut effects);
        }
        self.step(effects)
    }

    /// Deferred advance fired. Anything but the outstanding timer is stale.
    pub fn timer_expired(mut self, timer: TimerId, duration_text: &str) -> Step {
        let mut effects = Vec::new();
        if self.pending_timer == Some(timer) {
            self.pending_timer = None;
            if self.playback == Playback::PlayingImage {
                self.advance(duration_text, &mut effects);
            }
        }
        self.step(effects)
    }

    /// A file could not be loaded; it is dropped from the list.
    pub fn media_unavailable(mut self, path: &Path, duration_text: &str) -> Step {
        let mut effects = Vec::new();
        let removed = match self.media.iter().position(|item| item.path == path) {
            Some(index) => index,
            None => return self.step(effects),
        };
        self.media.remove(removed);
        effects.push(Effect::Notify(Notice::MediaUnavailable(path.to_path_buf())));

        let was_current = removed == self.cursor;
        if removed < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.media.len() {
            self.cursor = 0;
        }

        if was_current && self.playback != Playback::Idle {
            self.halt(&mut effects);
            match playable_from(&self.media, self.cursor) {
                Some(index) => {
                    self.cursor = index;
                    self.dispatch(duration_text, &mut effects);
                }
                None => self.go_idle(&mut effects),
            }
        }
        self.step(effects)
    }

    fn step(self, effects: Vec<Effect>) -> Step {
        Step { state: self, effects }
    }

    /// Cancels the outstanding timer and any running video.
    fn halt(&mut self, effects: &mut Vec<Effect>) {
        if self.pending_timer.take().is_some() {
            effects.push(Effect::CancelAdvance);
        }
        if self.playback == Playback::PlayingVideo {
            effects.push(Effect::StopVideo);
        }
        self.playback = Playback::Idle;
    }

    /// Nothing playable is left: stop and bring the controls back.
    fn go_idle(&mut self, effects: &mut Vec<Effect>) {
        self.halt(effects);
        effects.push(Effect::HideImage);
        if self.presentation == Presentation::Fullscreen {
            self.presentation = Presentation::Normal;
            effects.push(Effect::ExitFullscreen);
        }
        effects.push(Effect::Notify(Notice::NoMedia));
    }

    fn advance(&mut self, duration_text: &str, effects: &mut Vec<Effect>) {
        let next = advance_cursor(self.cursor, self.media.len())
            .and_then(|start| playable_from(&self.media, start));
        match next {
            Some(index) => {
                self.cursor = index;
                self.dispatch(duration_text, effects);
            }
            None => self.go_idle(effects),
        }
    }

    fn dispatch(&mut self, duration_text: &str, effects: &mut Vec<Effect>) {
        let item = &self.media[self.cursor];
        match item.kind {
            MediaKind::Video => {
                self.playback = Playback::PlayingVideo;
                effects.push(Effect::PlayVideo(item.path.clone()));
            }
            MediaKind::Image => {
                self.playback = Playback::PlayingImage;
                effects.push(Effect::ShowImage(item.path.clone()));
                if self.pending_timer.take().is_some() {
                    effects.push(Effect::CancelAdvance);
                }
                self.timers_issued += 1;
                let timer = TimerId(self.timers_issued);
                self.pending_timer = Some(timer);
                effects.push(Effect::ScheduleAdvance {
                    timer,
                    delay: display_duration(duration_text),
                });
            }
            MediaKind::Unknown => self.go_idle(effects),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DISPLAY_SECONDS;

    fn state(names: &[&str]) -> SlideshowState {
        SlideshowState::new(names.iter().map(|name| MediaItem::new(*name)).collect())
    }

    fn scheduled(effects: &[Effect]) -> Option<(TimerId, Duration)> {
        effects.iter().find_map(|effect| match effect {
            Effect::ScheduleAdvance { timer, delay } => Some((*timer, *delay)),
            _ => None,
        })
    }

    #[test]
    fn cursor_cycles_back_after_len_advances() {
        for len in 1..8 {
            let mut cursor = 0;
            let mut seen = Vec::new();
            for _ in 0..len {
                seen.push(cursor);
                cursor = advance_cursor(cursor, len).unwrap();
            }
            assert_eq!(cursor, 0);
            assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
        assert_eq!(advance_cursor(0, 0), None);
    }

    #[test]
    fn video_then_image_then_wrap() {
        let Step { state, effects } = state(&["a.mp4", "b.jpg"]).play("12");
        assert_eq!(
            effects,
            vec![
                Effect::EnterFullscreen,
                Effect::DismissKeyboard,
                Effect::PlayVideo(PathBuf::from("a.mp4")),
            ]
        );
        assert_eq!(state.playback(), Playback::PlayingVideo);
        assert_eq!(state.presentation(), Presentation::Fullscreen);

        let Step { state, effects } = state.video_completed("12");
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.playback(), Playback::PlayingImage);
        assert_eq!(effects[0], Effect::ShowImage(PathBuf::from("b.jpg")));
        let (timer, delay) = scheduled(&effects).unwrap();
        assert_eq!(delay, Duration::from_secs(12));

        let Step { state, effects } = state.timer_expired(timer, "12");
        assert_eq!(state.cursor(), 0);
        assert_eq!(effects, vec![Effect::PlayVideo(PathBuf::from("a.mp4"))]);
        assert_eq!(state.presentation(), Presentation::Fullscreen);
    }

    #[test]
    fn unparsable_seconds_use_default_delay() {
        for text in ["", "abc"] {
            let Step { effects, .. } = state(&["b.jpg"]).play(text);
            let (_, delay) = scheduled(&effects).unwrap();
            assert_eq!(delay, Duration::from_secs(DEFAULT_DISPLAY_SECONDS));
        }
    }

    #[test]
    fn play_without_media_stays_normal() {
        let Step { state, effects } = state(&[]).play("5");
        assert_eq!(
            effects,
            vec![Effect::DismissKeyboard, Effect::Notify(Notice::NoMedia)]
        );
        assert_eq!(state.presentation(), Presentation::Normal);
        assert_eq!(state.playback(), Playback::Idle);
    }

    #[test]
    fn play_with_only_unknown_files_stays_normal() {
        let Step { state, effects } = state(&["notes.txt", "song.wav"]).play("5");
        assert_eq!(
            effects,
            vec![Effect::DismissKeyboard, Effect::Notify(Notice::NoMedia)]
        );
        assert_eq!(state.presentation(), Presentation::Normal);
    }

    #[test]
    fn stop_cancels_pending_advance() {
        let Step { state, effects } = state(&["a.jpg", "b.jpg"]).play("5");
        let (timer, _) = scheduled(&effects).unwrap();

        let Step { state, effects } = state.stop();
        assert!(effects.contains(&Effect::CancelAdvance));
        assert!(effects.contains(&Effect::HideImage));
        assert!(effects.contains(&Effect::Notify(Notice::Stopped)));
        assert_eq!(state.playback(), Playback::Idle);

        let Step { state, effects } = state.timer_expired(timer, "5");
        assert!(effects.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn stop_keeps_cursor_and_presentation() {
        let Step { state, .. } = state(&["a.mp4", "b.jpg"]).play("5");
        let Step { state, .. } = state.video_completed("5");
        let Step { state, effects } = state.stop();
        assert!(effects.contains(&Effect::CancelAdvance));
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.presentation(), Presentation::Fullscreen);
    }

    #[test]
    fn stop_halts_running_video() {
        let Step { state, .. } = state(&["a.mp4"]).play("5");
        let Step { effects, .. } = state.stop();
        assert!(effects.contains(&Effect::StopVideo));
        assert!(!effects.contains(&Effect::CancelAdvance));
    }

    #[test]
    fn tap_exits_fullscreen_only_when_fullscreen() {
        let Step { state, .. } = state(&["a.jpg"]).play("5");
        let Step { state, effects } = state.surface_tapped();
        assert_eq!(
            effects,
            vec![Effect::ExitFullscreen, Effect::Notify(Notice::FullscreenExited)]
        );
        assert_eq!(state.presentation(), Presentation::Normal);
        assert_eq!(state.playback(), Playback::PlayingImage);

        let Step { state, effects } = state.surface_tapped();
        assert!(effects.is_empty());
        assert_eq!(state.presentation(), Presentation::Normal);
    }

    #[test]
    fn replay_cancels_previous_timer() {
        let Step { state, effects } = state(&["a.jpg", "b.jpg"]).play("5");
        let (first, _) = scheduled(&effects).unwrap();

        let Step { state, effects } = state.play("5");
        assert!(effects.contains(&Effect::CancelAdvance));
        let (second, _) = scheduled(&effects).unwrap();
        assert_ne!(first, second);

        let Step { state, effects } = state.timer_expired(first, "5");
        assert!(effects.is_empty());
        assert_eq!(state.cursor(), 0);

        let Step { state, .. } = state.timer_expired(second, "5");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn status_line_names_the_current_file() {
        let idle = state(&["a.mp4", "b.jpg"]);
        assert_eq!(idle.status_line(), "2 files");
        let Step { state, .. } = idle.play("5");
        let Step { state, .. } = state.video_completed("5");
        assert_eq!(state.status_line(), "2/2  b.jpg");
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let Step { state, effects } = state(&["a.txt", "b.jpg", "c.doc"]).play("5");
        assert_eq!(state.cursor(), 1);
        let (timer, _) = scheduled(&effects).unwrap();

        let Step { state, effects } = state.timer_expired(timer, "5");
        assert_eq!(state.cursor(), 1);
        assert_eq!(effects[0], Effect::ShowImage(PathBuf::from("b.jpg")));
    }

    #[test]
    fn video_completion_is_ignored_when_not_playing_video() {
        let Step { state, .. } = state(&["a.jpg", "b.mp4"]).play("5");
        let Step { state, effects } = state.video_completed("5");
        assert!(effects.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn losing_the_last_file_goes_idle() {
        let Step { state, .. } = state(&["a.mp4"]).play("5");
        let Step { state, effects } = state.media_unavailable(Path::new("a.mp4"), "5");
        assert_eq!(state.playback(), Playback::Idle);
        assert!(state.media().is_empty());
        assert!(effects.contains(&Effect::StopVideo));
        assert!(effects.contains(&Effect::Notify(Notice::NoMedia)));
        assert!(effects.contains(&Effect::ExitFullscreen));
        assert_eq!(state.presentation(), Presentation::Normal);

        let Step { effects, .. } = state.play("5");
        assert_eq!(
            effects,
            vec![Effect::DismissKeyboard, Effect::Notify(Notice::NoMedia)]
        );
    }

    #[test]
    fn losing_the_current_file_moves_on() {
        let Step { state, .. } = state(&["a.jpg", "b.mp4", "c.jpg"]).play("5");
        let Step { state, effects } = state.media_unavailable(Path::new("a.jpg"), "5");
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.current().unwrap().path, PathBuf::from("b.mp4"));
        assert!(effects.contains(&Effect::CancelAdvance));
        assert!(effects.contains(&Effect::PlayVideo(PathBuf::from("b.mp4"))));
    }

    #[test]
    fn losing_another_file_keeps_the_current_one() {
        let Step { state, .. } = state(&["a.jpg", "b.jpg", "c.jpg"]).play("5");
        let Step { state, .. } = state.media_unavailable(Path::new("a.jpg"), "5");
        let Step { state, .. } = state.play("5");
        assert_eq!(state.cursor(), 0);
        let Step { state, effects } = state.media_unavailable(Path::new("c.jpg"), "5");
        assert_eq!(
            effects,
            vec![Effect::Notify(Notice::MediaUnavailable(PathBuf::from("c.jpg")))]
        );
        assert_eq!(state.current().unwrap().path, PathBuf::from("b.jpg"));
        assert_eq!(state.playback(), Playback::PlayingImage);
    }
}
