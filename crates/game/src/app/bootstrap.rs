use engine::LoopConfig;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_tuning_from_env, ConfigError, Tuning};
use super::gameplay::{self, LevelError, World};

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("invalid tuning: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world: World,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== El Pollo Loco Startup ===");

    let tuning = load_tuning_from_env()?;
    let config = loop_config_for(&tuning);
    let world = gameplay::build_world(tuning)?;

    Ok(AppWiring { config, world })
}

fn loop_config_for(tuning: &Tuning) -> LoopConfig {
    LoopConfig {
        canvas_width: tuning.canvas_width.round() as u32,
        canvas_height: tuning.canvas_height.round() as u32,
        min_frame_interval_ms: f64::from(tuning.min_interval_ms),
        ..LoopConfig::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
