use std::fmt;

use serde::{Deserialize, Serialize};

use super::input::{ActionStates, CommandKey, CommandStates, InputAction};
use super::renderable::RenderableDesc;

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    left_click_pressed: bool,
    right_click_pressed: bool,
    commands: CommandStates,
    zoom_delta_steps: i32,
    tool_slot_pressed: Option<u8>,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        left_click_pressed: bool,
        right_click_pressed: bool,
        commands: CommandStates,
        zoom_delta_steps: i32,
        tool_slot_pressed: Option<u8>,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            cursor_position_px,
            left_click_pressed,
            right_click_pressed,
            commands,
            zoom_delta_steps,
            tool_slot_pressed,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_left_click_pressed(mut self, left_click_pressed: bool) -> Self {
        self.left_click_pressed = left_click_pressed;
        self
    }

    pub fn with_right_click_pressed(mut self, right_click_pressed: bool) -> Self {
        self.right_click_pressed = right_click_pressed;
        self
    }

    pub fn with_command_pressed(mut self, command: CommandKey, pressed: bool) -> Self {
        self.commands.set(command, pressed);
        self
    }

    pub fn with_zoom_delta_steps(mut self, zoom_delta_steps: i32) -> Self {
        self.zoom_delta_steps = zoom_delta_steps;
        self
    }

    pub fn with_tool_slot_pressed(mut self, tool_slot_pressed: Option<u8>) -> Self {
        self.tool_slot_pressed = tool_slot_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn right_click_pressed(&self) -> bool {
        self.right_click_pressed
    }

    pub fn command_pressed(&self, command: CommandKey) -> bool {
        self.commands.is_pressed(command)
    }

    pub fn zoom_delta_steps(&self) -> i32 {
        self.zoom_delta_steps
    }

    /// Zero-based hotbar slot whose key went down since the previous tick.
    pub fn tool_slot_pressed(&self) -> Option<u8> {
        self.tool_slot_pressed
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Ground-plane vector. `y` is the world z axis in the top-down view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

pub const CAMERA_ZOOM_DEFAULT: f32 = 1.0;
pub const CAMERA_ZOOM_MIN: f32 = 0.5;
pub const CAMERA_ZOOM_MAX: f32 = 2.0;
pub const CAMERA_ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::default(),
            zoom: CAMERA_ZOOM_DEFAULT,
        }
    }
}

impl Camera2D {
    pub fn effective_zoom(&self) -> f32 {
        clamp_camera_zoom(self.zoom)
    }

    pub fn set_zoom_clamped(&mut self, zoom: f32) {
        self.zoom = clamp_camera_zoom(zoom);
    }

    pub fn apply_zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let target_zoom = self.zoom + steps as f32 * CAMERA_ZOOM_STEP;
        self.set_zoom_clamped(target_zoom);
    }

    pub fn pan(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        self.position.x += delta.x;
        self.position.y += delta.y;
    }
}

fn clamp_camera_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return CAMERA_ZOOM_DEFAULT;
    }
    zoom.clamp(CAMERA_ZOOM_MIN, CAMERA_ZOOM_MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation_y: f32,
}

impl Transform {
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation_y: 0.0,
        }
    }

    pub const fn with_rotation_y(mut self, rotation_y: f32) -> Self {
        self.rotation_y = rotation_y;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(pub u64);

impl fmt::Display for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RenderableIdAllocator {
    next: u64,
}

impl RenderableIdAllocator {
    pub fn allocate(&mut self) -> RenderableId {
        let id = RenderableId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone)]
pub struct Renderable {
    pub id: RenderableId,
    pub transform: Transform,
    pub desc: RenderableDesc,
}

/// Arena of live renderables plus the camera looking at them.
///
/// Renderables are kept in allocation order, which is also draw order for
/// primitives at equal height. Ids are never reused, so a stale id can be
/// removed any number of times without touching a newer renderable.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: RenderableIdAllocator,
    renderables: Vec<Renderable>,
    camera: Camera2D,
    lifetime_added: u64,
    lifetime_removed: u64,
}

impl SceneWorld {
    pub fn add(&mut self, transform: Transform, desc: RenderableDesc) -> RenderableId {
        let id = self.allocator.allocate();
        self.renderables.push(Renderable {
            id,
            transform,
            desc,
        });
        self.lifetime_added = self.lifetime_added.saturating_add(1);
        id
    }

    pub fn remove(&mut self, id: RenderableId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.renderables.remove(index);
        self.lifetime_removed = self.lifetime_removed.saturating_add(1);
        true
    }

    pub fn set_transform(&mut self, id: RenderableId, transform: Transform) -> bool {
        match self.find_renderable_mut(id) {
            Some(renderable) => {
                renderable.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        let dropped = self.renderables.len() as u64;
        self.renderables.clear();
        self.lifetime_removed = self.lifetime_removed.saturating_add(dropped);
        self.camera = Camera2D::default();
    }

    pub fn contains(&self, id: RenderableId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }

    pub fn find_renderable(&self, id: RenderableId) -> Option<&Renderable> {
        self.index_of(id).map(|index| &self.renderables[index])
    }

    pub fn find_renderable_mut(&mut self, id: RenderableId) -> Option<&mut Renderable> {
        self.index_of(id).map(|index| &mut self.renderables[index])
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn lifetime_added(&self) -> u64 {
        self.lifetime_added
    }

    pub fn lifetime_removed(&self) -> u64 {
        self.lifetime_removed
    }

    fn index_of(&self, id: RenderableId) -> Option<usize> {
        self.renderables
            .binary_search_by_key(&id, |renderable| renderable.id)
            .ok()
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot, world: &mut SceneWorld);
    fn render(&mut self, world: &SceneWorld);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        if !self.is_loaded {
            return;
        }
        self.scene.update(fixed_dt_seconds, input, &mut self.world);
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&self.world);
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.world.clear();
        self.is_loaded = false;
    }
}
