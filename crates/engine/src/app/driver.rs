use tracing::{debug, info};

use super::scene::{GameOutcome, InputSnapshot, Scene, SimContext};
use super::sinks::{AudioCue, AudioSink, UiEvent, UiSink};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopState {
    NotStarted,
    Starting {
        delay_ms: f64,
        requested_at_ms: Option<f64>,
    },
    Running,
    Paused,
    GameOver(GameOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not started, paused, or finished; nothing was simulated.
    Idle,
    /// Waiting out the start delay or establishing the timestamp baseline.
    Waiting,
    /// Too little time since the last processed step.
    Throttled,
    Stepped,
    Finished(GameOutcome),
}

/// Drives a [`Scene`] from frame timestamps.
///
/// A step runs only when more than `min_interval_ms` has passed since the last
/// processed frame; each step polls actions, updates, resolves collisions and
/// marks the frame for redraw. Once the scene reports an outcome the loop stops
/// for good and notifies the UI and audio exactly once.
pub struct GameLoop<S, A, U> {
    scene: S,
    audio: A,
    ui: U,
    state: LoopState,
    min_interval_ms: f64,
    last_step_ms: Option<f64>,
    redraw_requested: bool,
}

impl<S: Scene, A: AudioSink, U: UiSink> GameLoop<S, A, U> {
    pub fn new(scene: S, audio: A, ui: U, min_interval_ms: f64) -> Self {
        let min_interval_ms = if min_interval_ms.is_finite() {
            min_interval_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            scene,
            audio,
            ui,
            state: LoopState::NotStarted,
            min_interval_ms,
            last_step_ms: None,
            redraw_requested: true,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn is_paused(&self) -> bool {
        self.state == LoopState::Paused
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, LoopState::GameOver(_))
    }

    pub fn wants_frames(&self) -> bool {
        matches!(self.state, LoopState::Starting { .. } | LoopState::Running)
    }

    /// Begins running once `delay_ms` worth of frame time has passed.
    /// Returns false when the request was ignored.
    pub fn start(&mut self, delay_ms: f64) -> bool {
        match self.state {
            LoopState::GameOver(_) | LoopState::Running | LoopState::Starting { .. } => false,
            LoopState::NotStarted | LoopState::Paused => {
                let delay_ms = if delay_ms.is_finite() {
                    delay_ms.max(0.0)
                } else {
                    0.0
                };
                self.state = LoopState::Starting {
                    delay_ms,
                    requested_at_ms: None,
                };
                debug!(delay_ms, "game_loop_start_requested");
                true
            }
        }
    }

    /// Pauses the loop. Calling it again has no further effect.
    pub fn stop(&mut self) {
        if !matches!(self.state, LoopState::Running | LoopState::Starting { .. }) {
            return;
        }
        self.state = LoopState::Paused;
        self.last_step_ms = None;
        self.scene.on_pause();
        self.redraw_requested = true;
        self.ui.notify(UiEvent::GamePaused);
        info!("game_loop_paused");
    }

    /// Set by every processed step and state change; cleared when taken.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn on_frame(&mut self, timestamp_ms: f64, input: &InputSnapshot) -> FrameOutcome {
        match self.state {
            LoopState::NotStarted | LoopState::Paused | LoopState::GameOver(_) => {
                FrameOutcome::Idle
            }
            LoopState::Starting {
                delay_ms,
                requested_at_ms,
            } => {
                let requested_at_ms = requested_at_ms.unwrap_or(timestamp_ms);
                if timestamp_ms - requested_at_ms >= delay_ms {
                    self.state = LoopState::Running;
                    self.last_step_ms = None;
                    self.scene.on_start(&mut self.ui);
                    self.redraw_requested = true;
                    self.ui.notify(UiEvent::GameStarted);
                    info!(delay_ms, "game_loop_started");
                } else {
                    self.state = LoopState::Starting {
                        delay_ms,
                        requested_at_ms: Some(requested_at_ms),
                    };
                }
                FrameOutcome::Waiting
            }
            LoopState::Running => self.run_frame(timestamp_ms, input),
        }
    }

    fn run_frame(&mut self, timestamp_ms: f64, input: &InputSnapshot) -> FrameOutcome {
        let Some(last_step_ms) = self.last_step_ms else {
            self.last_step_ms = Some(timestamp_ms);
            return FrameOutcome::Waiting;
        };
        let elapsed_ms = timestamp_ms - last_step_ms;
        let step_due = elapsed_ms > self.min_interval_ms;
        if !step_due {
            return FrameOutcome::Throttled;
        }
        self.last_step_ms = Some(timestamp_ms);

        let dt_ms = elapsed_ms as f32;
        let mut ctx = SimContext {
            input,
            audio: &mut self.audio,
            ui: &mut self.ui,
        };
        self.scene.poll_actions(dt_ms, &mut ctx);
        self.scene.update(dt_ms, &mut ctx);
        self.scene.check_collisions(dt_ms, &mut ctx);
        self.redraw_requested = true;

        match self.scene.outcome() {
            Some(outcome) => {
                self.finish(outcome);
                FrameOutcome::Finished(outcome)
            }
            None => FrameOutcome::Stepped,
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.state = LoopState::GameOver(outcome);
        self.scene.on_pause();
        self.audio.play(match outcome {
            GameOutcome::Won => AudioCue::GameWon,
            GameOutcome::Lost => AudioCue::GameLost,
        });
        self.ui.notify(UiEvent::GameOver(outcome));
        info!(outcome = ?outcome, entity_count = self.scene.entity_count(), "game_over");
    }
}
