mod driver;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod sinks;

pub use driver::{FrameOutcome, GameLoop, LoopState};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{draw_item_rect, Renderer, ScreenRect, Viewport};
pub use scene::{
    Camera2D, DrawItem, EntityId, EntityIdAllocator, GameOutcome, InputSnapshot, Scene,
    SimContext,
};
pub use sinks::{
    AudioCue, AudioSink, Banner, HudState, LogAudio, StatusBar, StatusValue, UiEvent, UiSink,
};
