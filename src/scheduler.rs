use std::time::Duration;

use crate::state::TimerId;

/// Single-slot deferred callback driven by frame time.
///
/// Scheduling replaces whatever was pending, so at most one advance is ever
/// outstanding.
#[derive(Debug, Default)]
pub struct DeferredAdvance {
    pending: Option<(TimerId, Duration)>,
}

impl DeferredAdvance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, timer: TimerId, delay: Duration) {
        self.pending = Some((timer, delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advances the countdown by `dt`, returning the timer once it fires.
    pub fn tick(&mut self, dt: Duration) -> Option<TimerId> {
        let (timer, remaining) = self.pending?;
        match remaining.checked_sub(dt) {
            Some(left) if !left.is_zero() => {
                self.pending = Some((timer, left));
                None
            }
            _ => {
                self.pending = None;
                Some(timer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaItem;
    use crate::state::{Effect, SlideshowState};

    fn some_timer() -> TimerId {
        let step = SlideshowState::new(vec![MediaItem::new("a.jpg")]).play("1");
        step.effects
            .into_iter()
            .find_map(|effect| match effect {
                Effect::ScheduleAdvance { timer, .. } => Some(timer),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn fires_once_after_delay() {
        let timer = some_timer();
        let mut scheduler = DeferredAdvance::new();
        scheduler.schedule(timer, Duration::from_millis(100));
        assert_eq!(scheduler.tick(Duration::from_millis(60)), None);
        assert_eq!(scheduler.tick(Duration::from_millis(40)), Some(timer));
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.tick(Duration::from_millis(40)), None);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = DeferredAdvance::new();
        scheduler.schedule(some_timer(), Duration::from_millis(10));
        scheduler.cancel();
        assert_eq!(scheduler.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn rescheduling_restarts_the_countdown() {
        let timer = some_timer();
        let mut scheduler = DeferredAdvance::new();
        scheduler.schedule(timer, Duration::from_millis(100));
        assert_eq!(scheduler.tick(Duration::from_millis(90)), None);
        scheduler.schedule(timer, Duration::from_millis(100));
        assert_eq!(scheduler.tick(Duration::from_millis(90)), None);
        assert_eq!(scheduler.tick(Duration::from_millis(10)), Some(timer));
    }
}
