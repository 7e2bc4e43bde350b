mod input;
mod loop_runner;
mod metrics;
mod renderable;
mod rendering;
mod scene;

pub use input::{CommandKey, InputAction};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use renderable::{rgba_from_hex, Primitive, RenderableDesc, Rgba, Shape};
pub use rendering::{screen_to_world_px, world_to_screen_px, Renderer, Viewport, PIXELS_PER_WORLD};
pub use scene::{
    Camera2D, InputSnapshot, Renderable, RenderableId, Scene, SceneWorld, Transform, Vec2, Vec3,
    CAMERA_ZOOM_DEFAULT, CAMERA_ZOOM_MAX, CAMERA_ZOOM_MIN, CAMERA_ZOOM_STEP,
};
