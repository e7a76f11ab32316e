use tracing::{debug, info};

use super::scene::GameOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Jump,
    DamageTaken,
    EnemyStomped,
    BottleThrown,
    BottleSmashed,
    BottleCollected,
    BottleBought,
    CoinCollected,
    BossAlerted,
    BossHurt,
    GameWon,
    GameLost,
}

/// Fire-and-forget sound playback.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        debug!(cue = ?cue, "audio_cue");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBar {
    PlayerEnergy,
    Bottles,
    Coins,
    BossEnergy,
}

impl StatusBar {
    const ALL: [StatusBar; 4] = [
        StatusBar::PlayerEnergy,
        StatusBar::Bottles,
        StatusBar::Coins,
        StatusBar::BossEnergy,
    ];

    const fn index(self) -> usize {
        match self {
            StatusBar::PlayerEnergy => 0,
            StatusBar::Bottles => 1,
            StatusBar::Coins => 2,
            StatusBar::BossEnergy => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    GameStarted,
    GamePaused,
    GameOver(GameOutcome),
    Status {
        bar: StatusBar,
        current: f32,
        max: f32,
    },
}

pub trait UiSink {
    fn notify(&mut self, event: UiEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Paused,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusValue {
    pub current: f32,
    pub max: f32,
}

impl StatusValue {
    /// Fill ratio clamped to `[0, 1]`; an empty max reads as empty.
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 || !self.max.is_finite() || !self.current.is_finite() {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// Keeps the latest status-bar values and banner for the renderer.
#[derive(Debug, Clone, Default)]
pub struct HudState {
    bars: [Option<StatusValue>; 4],
    banner: Option<Banner>,
    started: bool,
}

impl HudState {
    pub fn status(&self, bar: StatusBar) -> Option<StatusValue> {
        self.bars[bar.index()]
    }

    pub fn bars(&self) -> impl Iterator<Item = (StatusBar, StatusValue)> + '_ {
        StatusBar::ALL
            .into_iter()
            .filter_map(|bar| self.status(bar).map(|value| (bar, value)))
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn has_started(&self) -> bool {
        self.started
    }
}

impl UiSink for HudState {
    fn notify(&mut self, event: UiEvent) {
        match event {
            UiEvent::GameStarted => {
                self.started = true;
                self.banner = None;
                info!("ui_game_started");
            }
            UiEvent::GamePaused => {
                self.banner = Some(Banner::Paused);
                info!("ui_game_paused");
            }
            UiEvent::GameOver(outcome) => {
                self.banner = Some(match outcome {
                    GameOutcome::Won => Banner::Won,
                    GameOutcome::Lost => Banner::Lost,
                });
                info!(outcome = ?outcome, "ui_game_over");
            }
            UiEvent::Status { bar, current, max } => {
                self.bars[bar.index()] = Some(StatusValue { current, max });
            }
        }
    }
}
