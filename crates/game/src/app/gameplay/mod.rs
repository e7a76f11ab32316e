use engine::{
    ActionTimer, Animation, AnimationError, AudioCue, AudioSink, Body, BodyError, Camera2D,
    Collidable, Damageable, DeferredQueue, DrawItem, EntityId, EntityIdAllocator, GameOutcome,
    InputAction, InputSnapshot, Insets, Scene, SimContext, StatusBar, TimerConfigError, UiEvent,
    UiSink, Vec2,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::Tuning;

const BACKGROUND_PARTS: u32 = 2;

const PLAYER_SIZE: Vec2 = Vec2::new(250.0, 500.0);
const PLAYER_INSETS: Insets = Insets::new(60.0, 200.0, 70.0, 30.0);
const PLAYER_SPAWN_X: f32 = 100.0;
const PLAYER_ACCELERATION: f32 = 3.0;
/// The character art has empty space under the feet.
const PLAYER_GROUND_CORRECTION: f32 = 18.0;
const PLAYER_LONG_IDLE_AFTER_MS: f32 = 10_000.0;
const PLAYER_DEATH_FRAME_MS: f32 = 150.0;

const CHICKEN_SIZE: Vec2 = Vec2::new(200.0, 200.0);
const CHICKEN_INSETS: Insets = Insets::new(10.0, 10.0, 10.0, 20.0);
const CHICKEN_SPEED_MIN: f32 = 6.0;
const CHICKEN_SPEED_SPREAD: f32 = 12.0;
const CHICK_SIZE: Vec2 = Vec2::new(120.0, 120.0);
const CHICK_INSETS: Insets = Insets::uniform(10.0);
const CHICK_ACCELERATION: f32 = 3.0;
const CHICK_HOP_SPEED: f32 = 40.0;
const CHICK_HOP_BOOST: f32 = 10.0;
const CHICK_HOP_COOLDOWN_MIN_MS: f32 = 1_800.0;
const CHICK_HOP_COOLDOWN_SPREAD_MS: f32 = 1_500.0;
const DEAD_SINK_STEP: f32 = 20.0;
const SMALL_ENEMY_ENERGY: f32 = 1.0;

const BOSS_SIZE: Vec2 = Vec2::new(500.0, 700.0);
const BOSS_INSETS: Insets = Insets::new(80.0, 120.0, 60.0, 50.0);
const BOSS_SPEED: f32 = 12.0;
const BOSS_LUNGE_FRAME: usize = 5;
const BOSS_LUNGE_DISTANCE: f32 = 120.0;
const BOSS_ATTACK_COOLDOWN_MS: f32 = 1_200.0;
const BOSS_HURT_MS: f32 = 600.0;
const BOSS_FACING_INTERVAL_MS: f32 = 500.0;

const BOTTLE_SIZE: Vec2 = Vec2::new(120.0, 120.0);
const BOTTLE_INSETS: Insets = Insets::uniform(20.0);
const BOTTLE_SPEED_X: f32 = 15.0;
const BOTTLE_LAUNCH_SPEED: f32 = 30.0;
const BOTTLE_ACCELERATION: f32 = 2.0;
const GROUND_BOTTLE_SIZE: Vec2 = Vec2::new(120.0, 120.0);
const GROUND_BOTTLE_INSETS: Insets = Insets::new(35.0, 20.0, 25.0, 10.0);
const COIN_SIZE: Vec2 = Vec2::new(150.0, 150.0);
const COIN_INSETS: Insets = Insets::uniform(50.0);
/// Coins float at most canvas_height / 2.5 above the ground.
const COIN_MAX_LIFT_DIVISOR: f32 = 2.5;

const CLOUD_SPEED: f32 = 2.0;
const CLOUD_Y: f32 = 20.0;

const CHICKENS_PER_SEGMENT: usize = 3;
const CHICKS_PER_SEGMENT: usize = 2;
const COINS_PER_SEGMENT: usize = 4;
const BOTTLES_PER_SEGMENT: usize = 2;

include!("sprites.rs");
include!("types.rs");
include!("level.rs");
include!("systems.rs");
include!("collisions.rs");
include!("world.rs");
include!("level_one.rs");

pub(crate) fn build_world(tuning: Tuning) -> Result<World, LevelError> {
    World::new(tuning, populate_level_one)
}
