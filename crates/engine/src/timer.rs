use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerConfigError {
    #[error("action duration must be finite and non-negative, got {0}")]
    InvalidDuration(f32),
    #[error("action cooldown must be finite and non-negative, got {0}")]
    InvalidCooldown(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for the cooldown to run out.
    Idle,
    Ready,
    Playing,
}

/// Rate-limits an action and optionally keeps it "playing" for a fixed window.
///
/// A new timer starts idle with its full cooldown, so the first execution can
/// only happen once `cooldown_ms` has elapsed. A zero duration fires the action
/// once and goes straight back to cooling down.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTimer {
    duration_ms: f32,
    cooldown_ms: f32,
    playing: bool,
    elapsed_since_play_ms: f32,
    cooldown_remaining_ms: f32,
    stopped_pending: bool,
}

impl ActionTimer {
    pub fn new(duration_ms: f32, cooldown_ms: f32) -> Result<Self, TimerConfigError> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(TimerConfigError::InvalidDuration(duration_ms));
        }
        validate_cooldown(cooldown_ms)?;
        Ok(Self {
            duration_ms,
            cooldown_ms,
            playing: false,
            elapsed_since_play_ms: 0.0,
            cooldown_remaining_ms: cooldown_ms,
            stopped_pending: false,
        })
    }

    pub fn fire_once(cooldown_ms: f32) -> Result<Self, TimerConfigError> {
        Self::new(0.0, cooldown_ms)
    }

    pub fn state(&self) -> TimerState {
        if self.playing {
            TimerState::Playing
        } else if self.cooldown_remaining_ms > 0.0 {
            TimerState::Idle
        } else {
            TimerState::Ready
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[cfg(test)]
    fn elapsed_in_play_ms(&self) -> f32 {
        self.elapsed_since_play_ms
    }

    /// Advances the clocks by `dt_ms` and reports whether the action may run now.
    /// `guard` is only consulted when the timer itself allows execution.
    pub fn update_and_is_executable(&mut self, dt_ms: f32, guard: impl FnOnce() -> bool) -> bool {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.max(0.0)
        } else {
            warn!(dt_ms, "action_timer_non_finite_dt");
            0.0
        };

        if self.playing {
            self.elapsed_since_play_ms += dt_ms;
            if self.elapsed_since_play_ms >= self.duration_ms {
                // The update that closes a window never reports ready.
                self.stop();
                return false;
            }
        } else if self.cooldown_remaining_ms > 0.0 {
            self.cooldown_remaining_ms = (self.cooldown_remaining_ms - dt_ms).max(0.0);
        }

        matches!(self.state(), TimerState::Ready | TimerState::Playing) && guard()
    }

    /// Runs `action`. From ready this opens a play window; while playing the
    /// window is left untouched.
    pub fn execute<R>(&mut self, action: impl FnOnce() -> R) -> R {
        if !self.playing {
            self.playing = true;
            self.elapsed_since_play_ms = 0.0;
        }
        let result = action();
        if self.duration_ms <= 0.0 {
            self.stop();
        }
        result
    }

    /// Ends any play window and restarts the cooldown.
    pub fn stop(&mut self) {
        if self.playing {
            self.stopped_pending = true;
        }
        self.playing = false;
        self.elapsed_since_play_ms = 0.0;
        self.cooldown_remaining_ms = self.cooldown_ms;
    }

    /// Reports a finished play window exactly once.
    pub fn take_stopped(&mut self) -> bool {
        std::mem::take(&mut self.stopped_pending)
    }

    pub fn set_cooldown_ms(&mut self, cooldown_ms: f32) -> Result<(), TimerConfigError> {
        validate_cooldown(cooldown_ms)?;
        self.cooldown_ms = cooldown_ms;
        if !self.playing {
            self.cooldown_remaining_ms = self.cooldown_remaining_ms.min(cooldown_ms);
        }
        Ok(())
    }
}

fn validate_cooldown(cooldown_ms: f32) -> Result<(), TimerConfigError> {
    if !cooldown_ms.is_finite() || cooldown_ms < 0.0 {
        return Err(TimerConfigError::InvalidCooldown(cooldown_ms));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_configuration() {
        assert_eq!(
            ActionTimer::new(-1.0, 0.0),
            Err(TimerConfigError::InvalidDuration(-1.0))
        );
        assert!(matches!(
            ActionTimer::new(0.0, f32::NAN),
            Err(TimerConfigError::InvalidCooldown(_))
        ));
    }

    #[test]
    fn new_timer_waits_for_full_cooldown() {
        let mut timer = ActionTimer::fire_once(500.0).expect("timer");
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(!timer.update_and_is_executable(499.0, || true));
        assert!(timer.update_and_is_executable(1.0, || true));
    }

    #[test]
    fn guard_blocks_execution() {
        let mut timer = ActionTimer::fire_once(0.0).expect("timer");
        assert!(!timer.update_and_is_executable(10.0, || false));
        assert!(timer.update_and_is_executable(10.0, || true));
    }

    #[test]
    fn guard_not_consulted_while_cooling_down() {
        let mut timer = ActionTimer::fire_once(100.0).expect("timer");
        let mut consulted = false;
        timer.update_and_is_executable(10.0, || {
            consulted = true;
            true
        });
        assert!(!consulted);
    }

    #[test]
    fn zero_duration_fires_once_and_restarts_cooldown() {
        let mut timer = ActionTimer::fire_once(500.0).expect("timer");
        assert!(timer.update_and_is_executable(500.0, || true));
        let mut fired = 0;
        timer.execute(|| fired += 1);

        assert_eq!(fired, 1);
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(!timer.update_and_is_executable(499.0, || true));
        assert!(timer.update_and_is_executable(1.0, || true));
    }

    #[test]
    fn play_window_stays_executable_then_cools_down() {
        let mut timer = ActionTimer::new(300.0, 1000.0).expect("timer");
        assert!(timer.update_and_is_executable(1000.0, || true));
        timer.execute(|| ());
        assert!(timer.is_playing());

        assert!(timer.update_and_is_executable(200.0, || true));
        assert!(!timer.take_stopped());
        assert!(!timer.update_and_is_executable(100.0, || true));
        assert!(timer.take_stopped());
        assert!(!timer.take_stopped());
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.update_and_is_executable(1000.0, || true));
    }

    #[test]
    fn execute_while_playing_keeps_window() {
        let mut timer = ActionTimer::new(300.0, 0.0).expect("timer");
        timer.execute(|| ());
        timer.update_and_is_executable(200.0, || true);
        let mut calls = 0;
        timer.execute(|| calls += 1);

        assert_eq!(calls, 1);
        assert_eq!(timer.elapsed_in_play_ms(), 200.0);
        assert!(timer.is_playing());
    }

    #[test]
    fn non_finite_dt_is_treated_as_zero() {
        let mut timer = ActionTimer::fire_once(100.0).expect("timer");
        assert!(!timer.update_and_is_executable(f32::INFINITY, || true));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn closing_update_is_not_executable_even_without_cooldown() {
        let mut timer = ActionTimer::new(100.0, 0.0).expect("timer");
        timer.execute(|| ());

        assert!(!timer.update_and_is_executable(100.0, || true));
        assert!(timer.take_stopped());
        assert_eq!(timer.state(), TimerState::Ready);
        assert!(timer.update_and_is_executable(0.0, || true));
    }

    #[test]
    fn shorter_cooldown_applies_to_remaining_wait() {
        let mut timer = ActionTimer::fire_once(3000.0).expect("timer");
        timer.set_cooldown_ms(500.0).expect("cooldown");
        assert!(timer.update_and_is_executable(500.0, || true));
    }
}
