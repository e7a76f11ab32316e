use super::input::{ActionStates, InputAction};
use super::sinks::{AudioSink, UiSink};

/// Key state for one simulation step. The simulation only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    pause_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, pause_pressed: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            pause_pressed,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Edge-triggered; true for a single snapshot per key press.
    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn no_key_pressed(&self) -> bool {
        !self.actions.any_down()
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_pause_pressed(mut self, pause_pressed: bool) -> Self {
        self.pause_pressed = pause_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Hands out monotonically increasing ids; ids are never reused.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Horizontal scroll offset applied to world x when drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub offset_x: f32,
}

impl Camera2D {
    pub fn screen_x(&self, world_x: f32, parallax: f32) -> f32 {
        world_x + self.offset_x * parallax
    }

    /// Visible when any part of `[screen_x, screen_x + width]` lies within the
    /// viewport widened by `padding` on both sides.
    pub fn is_visible(&self, screen_x: f32, width: f32, viewport_width: f32, padding: f32) -> bool {
        screen_x + width >= -padding && screen_x <= viewport_width + padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub sprite_key: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub mirrored: bool,
    pub placeholder_color: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Collaborators handed to the simulation for one step.
pub struct SimContext<'a> {
    pub input: &'a InputSnapshot,
    pub audio: &'a mut dyn AudioSink,
    pub ui: &'a mut dyn UiSink,
}

/// A simulation the game loop can drive. Times are in milliseconds.
pub trait Scene {
    fn poll_actions(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>);
    fn update(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>);
    fn check_collisions(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>);
    fn draw_list(&self, out: &mut Vec<DrawItem>);
    fn outcome(&self) -> Option<GameOutcome>;
    fn entity_count(&self) -> usize;
    fn on_start(&mut self, _ui: &mut dyn UiSink) {}
    fn on_pause(&mut self) {}
}
