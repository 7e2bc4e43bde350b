use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Camera2D, Primitive, Renderable, SceneWorld, Shape, Vec2};

use super::transform::camera_pixels_per_world;
use super::{world_to_screen_px, Viewport, PIXELS_PER_WORLD};

const CLEAR_COLOR: [u8; 4] = [18, 24, 20, 255];
const GRID_CELL_WORLD: f32 = 1.0;
const GRID_MAJOR_EVERY: i32 = 10;
const GRID_MINOR_COLOR: [u8; 4] = [28, 36, 30, 255];
const GRID_MAJOR_COLOR: [u8; 4] = [44, 54, 46, 255];
const VIEW_CULL_PADDING_PX: f32 = 32.0;
const MIN_FOOTPRINT_PX: i32 = 1;

#[derive(Debug, Clone, Copy)]
struct WorldBounds {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

/// One primitive queued for drawing, ordered by the height of its top surface.
#[derive(Debug, Clone, Copy)]
struct DrawItem {
    top_y: f32,
    center: Vec2,
    quarter_turned: bool,
    primitive: Primitive,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    draw_list: Vec<DrawItem>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            draw_list: Vec::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let width = self.viewport.width;
        let height = self.viewport.height;
        let view_bounds = view_bounds_world(world.camera(), (width, height), VIEW_CULL_PADDING_PX);
        collect_draw_list(world.renderables(), &view_bounds, &mut self.draw_list);

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
        draw_world_grid(frame, width, height, world.camera());
        for item in &self.draw_list {
            draw_item(frame, width, height, world.camera(), item);
        }

        self.pixels.render()
    }
}

fn collect_draw_list(
    renderables: &[Renderable],
    bounds: &WorldBounds,
    out_draw_list: &mut Vec<DrawItem>,
) {
    out_draw_list.clear();
    for renderable in renderables {
        let transform = renderable.transform;
        let (sin, cos) = transform.rotation_y.sin_cos();
        let quarter_turned = sin.abs() > cos.abs();
        for primitive in &renderable.desc.primitives {
            let offset = primitive.offset;
            let center = Vec2 {
                x: transform.position.x + offset.x * cos + offset.z * sin,
                y: transform.position.z - offset.x * sin + offset.z * cos,
            };
            if !bounds_contains(bounds, center, footprint_radius(&primitive.shape)) {
                continue;
            }
            out_draw_list.push(DrawItem {
                top_y: transform.position.y + offset.y + primitive.shape.top(),
                center,
                quarter_turned,
                primitive: *primitive,
            });
        }
    }
    // stable: equal heights keep arena order
    out_draw_list.sort_by(|a, b| a.top_y.total_cmp(&b.top_y));
}

fn footprint_radius(shape: &Shape) -> f32 {
    match *shape {
        Shape::Box { width, depth, .. }
        | Shape::Plane { width, depth }
        | Shape::Outline { width, depth, .. } => width.max(depth) * 0.75,
        Shape::Cylinder { radius, .. } | Shape::Sphere { radius } | Shape::Cone { radius, .. } => {
            radius
        }
    }
}

fn draw_item(frame: &mut [u8], width: u32, height: u32, camera: &Camera2D, item: &DrawItem) {
    let pixels_per_world = camera_pixels_per_world(camera);
    let (cx, cy) = world_to_screen_px(camera, (width, height), item.center);
    let color = item.primitive.color;
    match item.primitive.shape {
        Shape::Box {
            width: w, depth: d, ..
        }
        | Shape::Plane { width: w, depth: d } => {
            let (half_w, half_h) = half_extents_px(w, d, item.quarter_turned, pixels_per_world);
            fill_rect_blended(frame, width, height, cx, cy, half_w, half_h, color);
        }
        Shape::Outline {
            width: w,
            depth: d,
            thickness,
        } => {
            let (half_w, half_h) = half_extents_px(w, d, item.quarter_turned, pixels_per_world);
            let thickness_px = ((thickness * pixels_per_world).round() as i32).max(1);
            draw_rect_outline(frame, width, height, cx, cy, half_w, half_h, thickness_px, color);
        }
        Shape::Cylinder { radius, .. } | Shape::Sphere { radius } | Shape::Cone { radius, .. } => {
            let radius_px = ((radius * pixels_per_world).round() as i32).max(MIN_FOOTPRINT_PX);
            fill_disc_blended(frame, width, height, cx, cy, radius_px, color);
        }
    }
}

fn half_extents_px(w: f32, d: f32, quarter_turned: bool, pixels_per_world: f32) -> (i32, i32) {
    let (along_x, along_y) = if quarter_turned { (d, w) } else { (w, d) };
    let half_w = ((along_x * pixels_per_world * 0.5).round() as i32).max(MIN_FOOTPRINT_PX);
    let half_h = ((along_y * pixels_per_world * 0.5).round() as i32).max(MIN_FOOTPRINT_PX);
    (half_w, half_h)
}

fn view_bounds_world(camera: &Camera2D, window_size: (u32, u32), padding_px: f32) -> WorldBounds {
    let pixels_per_world = camera_pixels_per_world(camera);
    let safe_pixels_per_world = if pixels_per_world.is_finite() && pixels_per_world > f32::EPSILON {
        pixels_per_world
    } else {
        PIXELS_PER_WORLD
    };
    let half_w_world = window_size.0 as f32 / (2.0 * safe_pixels_per_world);
    let half_h_world = window_size.1 as f32 / (2.0 * safe_pixels_per_world);
    let padding_world = padding_px.max(0.0) / safe_pixels_per_world;

    WorldBounds {
        min_x: camera.position.x - half_w_world - padding_world,
        max_x: camera.position.x + half_w_world + padding_world,
        min_y: camera.position.y - half_h_world - padding_world,
        max_y: camera.position.y + half_h_world + padding_world,
    }
}

fn bounds_contains(bounds: &WorldBounds, center: Vec2, radius_world: f32) -> bool {
    let radius = radius_world.max(0.0);
    center.x + radius >= bounds.min_x
        && center.x - radius <= bounds.max_x
        && center.y + radius >= bounds.min_y
        && center.y - radius <= bounds.max_y
}

fn draw_world_grid(frame: &mut [u8], width: u32, height: u32, camera: &Camera2D) {
    if width == 0 || height == 0 {
        return;
    }

    let bounds = view_bounds_world(camera, (width, height), 0.0);
    let ix_start = (bounds.min_x / GRID_CELL_WORLD).floor() as i32 - 1;
    let ix_end = (bounds.max_x / GRID_CELL_WORLD).ceil() as i32 + 1;
    let iy_start = (bounds.min_y / GRID_CELL_WORLD).floor() as i32 - 1;
    let iy_end = (bounds.max_y / GRID_CELL_WORLD).ceil() as i32 + 1;

    // tile edges sit on half-integer world coordinates
    for ix in ix_start..=ix_end {
        let world_x = ix as f32 * GRID_CELL_WORLD - 0.5;
        let (screen_x, _) = world_to_screen_px(
            camera,
            (width, height),
            Vec2 {
                x: world_x,
                y: camera.position.y,
            },
        );
        draw_vertical_line_clipped(frame, width, height, screen_x, grid_color(ix));
    }

    for iy in iy_start..=iy_end {
        let world_y = iy as f32 * GRID_CELL_WORLD - 0.5;
        let (_, screen_y) = world_to_screen_px(
            camera,
            (width, height),
            Vec2 {
                x: camera.position.x,
                y: world_y,
            },
        );
        draw_horizontal_line_clipped(frame, width, height, screen_y, grid_color(iy));
    }
}

fn grid_color(index: i32) -> [u8; 4] {
    // chunk borders fall on multiples of the chunk size offset by half a chunk
    if (index + GRID_MAJOR_EVERY / 2).rem_euclid(GRID_MAJOR_EVERY) == 0 {
        GRID_MAJOR_COLOR
    } else {
        GRID_MINOR_COLOR
    }
}

fn draw_vertical_line_clipped(frame: &mut [u8], width: u32, height: u32, x: i32, color: [u8; 4]) {
    if x < 0 || x >= width as i32 {
        return;
    }
    for y in 0..height as i32 {
        write_pixel_rgba_clipped(frame, width as usize, x, y, color);
    }
}

fn draw_horizontal_line_clipped(frame: &mut [u8], width: u32, height: u32, y: i32, color: [u8; 4]) {
    if y < 0 || y >= height as i32 {
        return;
    }
    for x in 0..width as i32 {
        write_pixel_rgba_clipped(frame, width as usize, x, y, color);
    }
}

fn pixel_byte_range(frame_len: usize, width: usize, x: i32, y: i32) -> Option<(usize, usize)> {
    if x < 0 || y < 0 || x as usize >= width {
        return None;
    }
    let pixel_offset = (y as usize).checked_mul(width)?.checked_add(x as usize)?;
    let byte_offset = pixel_offset.checked_mul(4)?;
    let end = byte_offset.checked_add(4)?;
    (end <= frame_len).then_some((byte_offset, end))
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if let Some((start, end)) = pixel_byte_range(frame.len(), width, x, y) {
        frame[start..end].copy_from_slice(&color);
    }
}

fn blend_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    let alpha = color[3] as u32;
    if alpha == 255 {
        write_pixel_rgba_clipped(frame, width, x, y, color);
        return;
    }
    if alpha == 0 {
        return;
    }
    let Some((start, end)) = pixel_byte_range(frame.len(), width, x, y) else {
        return;
    };
    let pixel = &mut frame[start..end];
    for channel in 0..3 {
        let src = color[channel] as u32;
        let dst = pixel[channel] as u32;
        pixel[channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
    }
    pixel[3] = 255;
}

fn fill_rect_blended(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    half_w: i32,
    half_h: i32,
    color: [u8; 4],
) {
    let left = (cx - half_w).max(0);
    let right = (cx + half_w).min(width as i32 - 1);
    let top = (cy - half_h).max(0);
    let bottom = (cy + half_h).min(height as i32 - 1);
    for y in top..=bottom {
        for x in left..=right {
            blend_pixel_rgba_clipped(frame, width as usize, x, y, color);
        }
    }
}

fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    half_w: i32,
    half_h: i32,
    thickness_px: i32,
    color: [u8; 4],
) {
    let left = cx - half_w;
    let right = cx + half_w;
    let top = cy - half_h;
    let bottom = cy + half_h;
    for y in top..=bottom {
        if y < 0 || y >= height as i32 {
            continue;
        }
        for x in left..=right {
            let on_edge = x - left < thickness_px
                || right - x < thickness_px
                || y - top < thickness_px
                || bottom - y < thickness_px;
            if on_edge {
                blend_pixel_rgba_clipped(frame, width as usize, x, y, color);
            }
        }
    }
}

fn fill_disc_blended(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    radius_px: i32,
    color: [u8; 4],
) {
    let radius_sq = radius_px * radius_px;
    for dy in -radius_px..=radius_px {
        let y = cy + dy;
        if y < 0 || y >= height as i32 {
            continue;
        }
        for dx in -radius_px..=radius_px {
            if dx * dx + dy * dy <= radius_sq {
                blend_pixel_rgba_clipped(frame, width as usize, cx + dx, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{RenderableDesc, RenderableId, Transform, Vec3};

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0; (width * height * 4) as usize]
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let start = ((y * width + x) * 4) as usize;
        [
            frame[start],
            frame[start + 1],
            frame[start + 2],
            frame[start + 3],
        ]
    }

    fn renderable(id: u64, transform: Transform, desc: RenderableDesc) -> Renderable {
        Renderable {
            id: RenderableId(id),
            transform,
            desc,
        }
    }

    fn wide_bounds() -> WorldBounds {
        WorldBounds {
            min_x: -100.0,
            max_x: 100.0,
            min_y: -100.0,
            max_y: 100.0,
        }
    }

    #[test]
    fn draw_list_orders_primitives_by_top_height() {
        let crop = renderable(
            0,
            Transform::at(0.0, 0.2, 0.0),
            RenderableDesc::new("crop").with(Shape::Sphere { radius: 0.2 }, Vec3::ZERO, [1; 4]),
        );
        let tile = renderable(
            1,
            Transform::at(0.0, 0.0, 0.0),
            RenderableDesc::new("tile").with(
                Shape::Box {
                    width: 1.0,
                    height: 0.2,
                    depth: 1.0,
                },
                Vec3::ZERO,
                [2; 4],
            ),
        );
        let mut draw_list = Vec::new();
        collect_draw_list(&[crop, tile], &wide_bounds(), &mut draw_list);

        let order = draw_list
            .iter()
            .map(|item| item.primitive.color[0])
            .collect::<Vec<_>>();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn draw_list_culls_primitives_outside_view() {
        let far = renderable(
            0,
            Transform::at(500.0, 0.0, 0.0),
            RenderableDesc::new("far").with(Shape::Sphere { radius: 0.5 }, Vec3::ZERO, [1; 4]),
        );
        let mut draw_list = Vec::new();
        collect_draw_list(&[far], &wide_bounds(), &mut draw_list);
        assert!(draw_list.is_empty());
    }

    #[test]
    fn quarter_turn_rotates_primitive_offset() {
        let fence = renderable(
            0,
            Transform::at(0.0, 0.0, 0.0).with_rotation_y(std::f32::consts::FRAC_PI_2),
            RenderableDesc::new("fence").with(
                Shape::Box {
                    width: 1.0,
                    height: 0.5,
                    depth: 0.1,
                },
                Vec3::new(1.0, 0.0, 0.0),
                [1; 4],
            ),
        );
        let mut draw_list = Vec::new();
        collect_draw_list(&[fence], &wide_bounds(), &mut draw_list);

        let item = draw_list[0];
        assert!(item.quarter_turned);
        assert!(item.center.x.abs() < 0.001);
        assert!((item.center.y + 1.0).abs() < 0.001);
    }

    #[test]
    fn blend_mixes_translucent_color_over_background() {
        let mut buffer = frame(2, 1);
        write_pixel_rgba_clipped(&mut buffer, 2, 0, 0, [0, 0, 0, 255]);
        blend_pixel_rgba_clipped(&mut buffer, 2, 0, 0, [255, 255, 255, 51]);

        let [r, g, b, a] = pixel(&buffer, 2, 0, 0);
        assert_eq!((r, g, b, a), (51, 51, 51, 255));
    }

    #[test]
    fn out_of_frame_writes_are_ignored() {
        let mut buffer = frame(4, 4);
        write_pixel_rgba_clipped(&mut buffer, 4, -1, 0, [9; 4]);
        write_pixel_rgba_clipped(&mut buffer, 4, 4, 0, [9; 4]);
        write_pixel_rgba_clipped(&mut buffer, 4, 0, 4, [9; 4]);
        fill_disc_blended(&mut buffer, 4, 4, -10, -10, 3, [9, 9, 9, 255]);

        assert!(buffer.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut buffer = frame(9, 9);
        draw_rect_outline(&mut buffer, 9, 9, 4, 4, 3, 3, 1, [200, 0, 0, 255]);

        assert_eq!(pixel(&buffer, 9, 1, 4), [200, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 9, 4, 4), [0, 0, 0, 0]);
    }
}
