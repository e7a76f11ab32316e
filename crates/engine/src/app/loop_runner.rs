use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::{resolve_app_paths, StartupError};

use super::driver::{FrameOutcome, GameLoop};
use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::rendering::Viewport;
use super::sinks::{HudState, LogAudio};
use super::{InputAction, InputSnapshot, Renderer, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub min_frame_interval_ms: f64,
    pub start_delay_ms: f64,
    pub warmup_redraws: u32,
    pub metrics_log_interval: Duration,
    /// Overrides the asset directory found from the project root.
    pub asset_root: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "El Pollo Loco".to_string(),
            window_width: 1280,
            window_height: 720,
            canvas_width: 1920,
            canvas_height: 1080,
            min_frame_interval_ms: 25.0,
            start_delay_ms: 500.0,
            warmup_redraws: 3,
            metrics_log_interval: Duration::from_secs(5),
            asset_root: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app<S: Scene + 'static>(config: LoopConfig, scene: S) -> Result<(), AppError> {
    let asset_root = match config.asset_root.clone() {
        Some(path) => path,
        None => resolve_app_paths()?.assets_dir,
    };
    info!(asset_root = %asset_root.display(), "startup");

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let canvas = Viewport {
        width: config.canvas_width.max(1),
        height: config.canvas_height.max(1),
    };
    let mut renderer = Renderer::new(Arc::clone(&window), canvas, asset_root)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    info!(
        canvas_width = canvas.width,
        canvas_height = canvas.height,
        min_frame_interval_ms = config.min_frame_interval_ms,
        start_delay_ms = config.start_delay_ms,
        warmup_redraws = config.warmup_redraws,
        "loop_config"
    );

    let mut game = GameLoop::new(
        scene,
        LogAudio,
        HudState::default(),
        config.min_frame_interval_ms,
    );
    let mut input_collector = InputCollector::default();
    let mut warmup_remaining = config.warmup_redraws;
    let mut draw_items = Vec::new();
    let mut surface_dirty = true;
    let loop_started = Instant::now();
    let mut last_frame_instant = loop_started;
    let mut metrics = MetricsAccumulator::new(metrics_log_interval, loop_started);

    if warmup_remaining == 0 {
        game.start(config.start_delay_ms);
    }

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    surface_dirty = true;
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    surface_dirty = true;
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    if warmup_remaining > 0 {
                        warmup_remaining -= 1;
                        if warmup_remaining == 0 {
                            game.start(config.start_delay_ms);
                            info!("warmup_complete");
                        }
                    }

                    let snapshot = input_collector.snapshot_for_tick();
                    if snapshot.pause_pressed() {
                        toggle_pause(&mut game, &config);
                    }

                    let timestamp_ms = now.saturating_duration_since(loop_started).as_secs_f64()
                        * 1000.0;
                    match game.on_frame(timestamp_ms, &snapshot) {
                        FrameOutcome::Stepped => metrics.record_step(),
                        FrameOutcome::Throttled => metrics.record_throttled(),
                        FrameOutcome::Finished(outcome) => {
                            metrics.record_step();
                            info!(outcome = ?outcome, "game_finished");
                        }
                        FrameOutcome::Idle | FrameOutcome::Waiting => {}
                    }

                    if game.take_redraw_request() || surface_dirty {
                        surface_dirty = false;
                        draw_items.clear();
                        game.scene().draw_list(&mut draw_items);
                        if let Err(error) = renderer.render(&draw_items, game.ui()) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                    }
                    metrics.record_frame(frame_dt);

                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            steps_per_second = snapshot.steps_per_second,
                            throttled_per_second = snapshot.throttled_per_second,
                            frame_time_ms = snapshot.frame_time_ms,
                            entity_count = game.scene().entity_count(),
                            state = ?game.state(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                game.stop();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn toggle_pause<S: Scene, A: super::AudioSink, U: super::UiSink>(
    game: &mut GameLoop<S, A, U>,
    config: &LoopConfig,
) {
    if game.is_paused() {
        game.start(0.0);
        info!("resume_requested");
    } else if game.wants_frames() {
        game.stop();
    } else if !game.is_finished() {
        game.start(config.start_delay_ms);
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    pause_is_down: bool,
    pause_pressed_edge: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::MoveLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::MoveRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Space) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::Jump, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) => {
                self.action_states.set(InputAction::Throw, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Enter) => {
                self.action_states.set(InputAction::Buy, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyP) => {
                self.action_states.set(InputAction::Pause, is_pressed);
                self.handle_pause_key_state(is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn handle_pause_key_state(&mut self, is_pressed: bool) {
        if is_pressed {
            if !self.pause_is_down {
                self.pause_pressed_edge = true;
            }
            self.pause_is_down = true;
        } else {
            self.pause_is_down = false;
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let pause_pressed = std::mem::take(&mut self.pause_pressed_edge);
        InputSnapshot::new(self.quit_requested, pause_pressed, self.action_states)
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
