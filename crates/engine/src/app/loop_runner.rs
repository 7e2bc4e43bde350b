use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{ActionStates, CommandKey, CommandStates};
use super::metrics::MetricsAccumulator;
use super::scene::SceneRuntime;
use super::{InputAction, InputSnapshot, Renderer, Scene, Vec2};

pub const SLOW_FRAME_ENV_VAR: &str = "HOMESTEAD_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Homestead".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs `scene` in a window until it is closed.
///
/// Simulation advances on a fixed timestep; rendering happens once per redraw
/// after all due ticks have run.
pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let mut runtime = SceneRuntime::new(scene);

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
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let render_frame_target = frame_budget(config.max_render_fps);
    let inner_size = window.inner_size();
    let mut input_collector = InputCollector::new(inner_size.width, inner_size.height);

    runtime.load();
    info!(
        renderable_count = runtime.world().renderable_count(),
        "scene_loaded"
    );
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = ?config.max_render_fps.filter(|fps| *fps > 0),
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.clear_cursor_position();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input_collector.handle_mouse_wheel(delta);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if slow_frame_delay > Duration::ZERO {
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    accumulator = accumulator.saturating_add(raw_frame_dt.min(max_frame_delta));
                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        runtime.update(fixed_dt_seconds, &input_snapshot);
                        metrics_accumulator.record_tick();
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    runtime.render();
                    if let Err(error) = renderer.render_world(runtime.world()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = runtime.debug_title();
                    if next_title != last_applied_title {
                        window.set_title(next_title.as_deref().unwrap_or(&config.window_title));
                        last_applied_title = next_title;
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);

                    let world = runtime.world();
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(
                        now,
                        world.lifetime_added(),
                        world.lifetime_removed(),
                    ) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            renderable_count = world.renderable_count(),
                            renderables_created = snapshot.renderables_created,
                            renderables_destroyed = snapshot.renderables_destroyed,
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
                runtime.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// A keyboard key's meaning for the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyBinding {
    Action(InputAction),
    Command(CommandKey),
    Zoom(i32),
    ToolSlot(u8),
}

fn binding_for_key(code: KeyCode) -> Option<KeyBinding> {
    let binding = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => KeyBinding::Action(InputAction::CameraUp),
        KeyCode::KeyS | KeyCode::ArrowDown => KeyBinding::Action(InputAction::CameraDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => KeyBinding::Action(InputAction::CameraLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => KeyBinding::Action(InputAction::CameraRight),
        KeyCode::Escape => KeyBinding::Action(InputAction::Quit),
        KeyCode::F5 => KeyBinding::Command(CommandKey::Save),
        KeyCode::F9 => KeyBinding::Command(CommandKey::Load),
        KeyCode::Delete => KeyBinding::Command(CommandKey::ClearSave),
        KeyCode::KeyB => KeyBinding::Command(CommandKey::BuySeed),
        KeyCode::KeyT => KeyBinding::Command(CommandKey::BuyTool),
        KeyCode::KeyN => KeyBinding::Command(CommandKey::SellProduce),
        KeyCode::Equal | KeyCode::NumpadAdd => KeyBinding::Zoom(1),
        KeyCode::Minus | KeyCode::NumpadSubtract => KeyBinding::Zoom(-1),
        KeyCode::Digit1 | KeyCode::Numpad1 => KeyBinding::ToolSlot(0),
        KeyCode::Digit2 | KeyCode::Numpad2 => KeyBinding::ToolSlot(1),
        KeyCode::Digit3 | KeyCode::Numpad3 => KeyBinding::ToolSlot(2),
        KeyCode::Digit4 | KeyCode::Numpad4 => KeyBinding::ToolSlot(3),
        KeyCode::Digit5 | KeyCode::Numpad5 => KeyBinding::ToolSlot(4),
        KeyCode::Digit6 | KeyCode::Numpad6 => KeyBinding::ToolSlot(5),
        KeyCode::Digit7 | KeyCode::Numpad7 => KeyBinding::ToolSlot(6),
        KeyCode::Digit8 | KeyCode::Numpad8 => KeyBinding::ToolSlot(7),
        KeyCode::Digit9 | KeyCode::Numpad9 => KeyBinding::ToolSlot(8),
        _ => return None,
    };
    Some(binding)
}

/// Folds window events into per-tick snapshots. Everything except held
/// camera actions is edge-triggered and reported on one tick only.
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held_keys: HashSet<KeyCode>,
    action_states: ActionStates,
    pending_commands: CommandStates,
    pending_zoom_steps: i32,
    pending_tool_slot: Option<u8>,
    cursor_position_px: Option<Vec2>,
    left_mouse_is_down: bool,
    left_click_pressed_edge: bool,
    right_mouse_is_down: bool,
    right_click_pressed_edge: bool,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        self.handle_key(key_event.physical_key, key_event.state);
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(binding) = binding_for_key(code) else {
            return;
        };
        let is_pressed = state == ElementState::Pressed;
        let first_press = if is_pressed {
            self.held_keys.insert(code)
        } else {
            self.held_keys.remove(&code);
            false
        };

        match binding {
            KeyBinding::Action(action) => {
                self.action_states.set(action, is_pressed);
                if action == InputAction::Quit && is_pressed {
                    self.mark_quit_requested();
                }
            }
            KeyBinding::Command(command) if first_press => {
                self.pending_commands.set(command, true);
            }
            KeyBinding::Zoom(step) if first_press => {
                self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(step);
            }
            KeyBinding::ToolSlot(slot) if first_press => {
                self.pending_tool_slot = Some(slot);
            }
            _ => {}
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            self.cursor_position_px,
            std::mem::take(&mut self.left_click_pressed_edge),
            std::mem::take(&mut self.right_click_pressed_edge),
            std::mem::take(&mut self.pending_commands),
            std::mem::take(&mut self.pending_zoom_steps),
            self.pending_tool_slot.take(),
            self.window_width,
            self.window_height,
        )
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2 { x, y });
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = zoom_steps_from_scroll_delta(delta);
        self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(steps);
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let (is_down, pressed_edge) = match button {
            MouseButton::Left => (&mut self.left_mouse_is_down, &mut self.left_click_pressed_edge),
            MouseButton::Right => (
                &mut self.right_mouse_is_down,
                &mut self.right_click_pressed_edge,
            ),
            _ => return,
        };
        let is_pressed = state == ElementState::Pressed;
        if is_pressed && !*is_down {
            *pressed_edge = true;
        }
        *is_down = is_pressed;
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

/// Minimum time between presents. A missing or zero cap means uncapped.
fn frame_budget(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    let ms = match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                value = value.as_str(),
                "slow_frame_env_invalid"
            );
            config_slow_frame_ms
        }),
        Err(_) => config_slow_frame_ms,
    };
    Duration::from_millis(ms)
}

fn zoom_steps_from_scroll_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) if position.y == 0.0 => 0,
        MouseScrollDelta::PixelDelta(position) => position.y.signum() as i32,
    }
}
