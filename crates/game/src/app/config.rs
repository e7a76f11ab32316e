use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub(crate) const TUNING_ENV_VAR: &str = "POLLO_TUNING";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse tuning file {path} at {json_path}: {message}")]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("tuning value {field} is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants. Every field has a default; a JSON file may override any subset.
/// Times are milliseconds, distances are canvas pixels, speeds are pixels per
/// standard interval unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    pub(crate) canvas_width: f32,
    pub(crate) canvas_height: f32,
    /// Distance from the canvas bottom to the ground line.
    pub(crate) ground_level: f32,
    pub(crate) level_length_factor: u32,
    pub(crate) rng_seed: u64,

    pub(crate) min_interval_ms: f32,
    pub(crate) standard_interval_ms: f32,
    pub(crate) collision_interval_ms: f32,
    pub(crate) kill_removal_delay_ms: f32,
    pub(crate) visibility_padding: f32,

    pub(crate) player_max_energy: f32,
    pub(crate) player_speed: f32,
    pub(crate) player_jump_speed: f32,
    pub(crate) player_hurt_ms: f32,
    pub(crate) stomp_recoil: f32,
    pub(crate) camera_anchor_x: f32,
    pub(crate) heal_amount: f32,
    pub(crate) heal_interval_ms: f32,

    pub(crate) enemy_damage: f32,
    pub(crate) boss_damage: f32,
    pub(crate) projectile_damage: f32,
    pub(crate) boss_max_energy: f32,
    pub(crate) boss_close_distance: f32,
    pub(crate) boss_very_close_distance: f32,

    pub(crate) starting_bottles: u32,
    pub(crate) max_bottles: u32,
    pub(crate) starting_coins: u32,
    pub(crate) max_coins: u32,
    pub(crate) coin_value: u32,
    pub(crate) bottle_cost: u32,
    pub(crate) throw_cooldown_ms: f32,
    pub(crate) buy_cooldown_ms: f32,
    /// Thrown bottles that land unbroken become pickups instead of shattering.
    pub(crate) recover_bottles_on_ground: bool,

    pub(crate) enemy_spawn_interval_ms: f32,
    pub(crate) item_spawn_interval_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            ground_level: 140.0,
            level_length_factor: 4,
            rng_seed: 0x5EED_C0C0,

            min_interval_ms: 25.0,
            standard_interval_ms: 100.0,
            collision_interval_ms: 25.0,
            kill_removal_delay_ms: 500.0,
            visibility_padding: 80.0,

            player_max_energy: 200.0,
            player_speed: 40.0,
            player_jump_speed: 50.0,
            player_hurt_ms: 300.0,
            stomp_recoil: 20.0,
            camera_anchor_x: 500.0,
            heal_amount: 5.0,
            heal_interval_ms: 3000.0,

            enemy_damage: 3.0,
            boss_damage: 10.0,
            projectile_damage: 25.0,
            boss_max_energy: 100.0,
            boss_close_distance: 900.0,
            boss_very_close_distance: 350.0,

            starting_bottles: 5,
            max_bottles: 10,
            starting_coins: 50,
            max_coins: 100,
            coin_value: 5,
            bottle_cost: 10,
            throw_cooldown_ms: 500.0,
            buy_cooldown_ms: 100.0,
            recover_bottles_on_ground: false,

            enemy_spawn_interval_ms: 20_000.0,
            item_spawn_interval_ms: 20_000.0,
        }
    }
}

impl Tuning {
    pub(crate) fn ground_y(&self) -> f32 {
        self.canvas_height - self.ground_level
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("standard_interval_ms", self.standard_interval_ms),
            ("player_max_energy", self.player_max_energy),
            ("boss_max_energy", self.boss_max_energy),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        let non_negative = [
            ("ground_level", self.ground_level),
            ("min_interval_ms", self.min_interval_ms),
            ("collision_interval_ms", self.collision_interval_ms),
            ("kill_removal_delay_ms", self.kill_removal_delay_ms),
            ("visibility_padding", self.visibility_padding),
            ("player_speed", self.player_speed),
            ("player_jump_speed", self.player_jump_speed),
            ("player_hurt_ms", self.player_hurt_ms),
            ("stomp_recoil", self.stomp_recoil),
            ("heal_amount", self.heal_amount),
            ("heal_interval_ms", self.heal_interval_ms),
            ("enemy_damage", self.enemy_damage),
            ("boss_damage", self.boss_damage),
            ("projectile_damage", self.projectile_damage),
            ("throw_cooldown_ms", self.throw_cooldown_ms),
            ("buy_cooldown_ms", self.buy_cooldown_ms),
            ("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms),
            ("item_spawn_interval_ms", self.item_spawn_interval_ms),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and non-negative",
                });
            }
        }

        if self.ground_level >= self.canvas_height {
            return Err(ConfigError::Invalid {
                field: "ground_level",
                reason: "must leave room above the ground",
            });
        }
        if self.level_length_factor == 0 {
            return Err(ConfigError::Invalid {
                field: "level_length_factor",
                reason: "must be at least 1",
            });
        }
        if self.boss_very_close_distance > self.boss_close_distance {
            return Err(ConfigError::Invalid {
                field: "boss_very_close_distance",
                reason: "must not exceed boss_close_distance",
            });
        }
        if self.starting_bottles > self.max_bottles || self.starting_coins > self.max_coins {
            return Err(ConfigError::Invalid {
                field: "starting_bottles",
                reason: "starting supplies must not exceed their maximum",
            });
        }
        Ok(())
    }
}

/// Defaults unless `POLLO_TUNING` names a JSON override file.
pub(crate) fn load_tuning_from_env() -> Result<Tuning, ConfigError> {
    match env::var(TUNING_ENV_VAR) {
        Ok(value) => load_tuning(Path::new(&value)),
        Err(env::VarError::NotPresent) => {
            let tuning = Tuning::default();
            tuning.validate()?;
            Ok(tuning)
        }
        Err(source) => Err(ConfigError::EnvVar {
            var: TUNING_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn load_tuning(path: &Path) -> Result<Tuning, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tuning = parse_tuning(&raw).map_err(|(json_path, message)| ConfigError::Parse {
        path: path.to_path_buf(),
        json_path,
        message,
    })?;
    tuning.validate()?;
    info!(path = %path.display(), "tuning_loaded");
    Ok(tuning)
}

fn parse_tuning(raw: &str) -> Result<Tuning, (String, String)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        (json_path, error.into_inner().to_string())
    })
}
