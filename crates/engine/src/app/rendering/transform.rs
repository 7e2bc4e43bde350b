use crate::app::{Camera2D, Vec2};

pub const PIXELS_PER_WORLD: f32 = 32.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

pub(crate) fn camera_pixels_per_world(camera: &Camera2D) -> f32 {
    PIXELS_PER_WORLD * camera.effective_zoom()
}

/// Projects a ground-plane point into window pixels. World +z points down the screen.
pub fn world_to_screen_px(camera: &Camera2D, window_size: (u32, u32), world: Vec2) -> (i32, i32) {
    let pixels_per_world = camera_pixels_per_world(camera);
    let x = (world.x - camera.position.x) * pixels_per_world + window_size.0 as f32 * 0.5;
    let y = (world.y - camera.position.y) * pixels_per_world + window_size.1 as f32 * 0.5;
    (x.round() as i32, y.round() as i32)
}

pub fn screen_to_world_px(camera: &Camera2D, window_size: (u32, u32), screen_px: Vec2) -> Vec2 {
    let pixels_per_world = camera_pixels_per_world(camera);
    Vec2 {
        x: (screen_px.x - window_size.0 as f32 * 0.5) / pixels_per_world + camera.position.x,
        y: (screen_px.y - window_size.1 as f32 * 0.5) / pixels_per_world + camera.position.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_viewport_center() {
        let camera = Camera2D::default();
        let (x, y) = world_to_screen_px(&camera, (800, 600), Vec2 { x: 0.0, y: 0.0 });
        assert_eq!(x, 400);
        assert_eq!(y, 300);
    }

    #[test]
    fn camera_offset_and_zoom_shift_screen_position() {
        let camera = Camera2D {
            position: Vec2 { x: 10.0, y: -5.0 },
            zoom: 0.5,
        };
        let (x, y) = world_to_screen_px(&camera, (800, 600), Vec2 { x: 12.0, y: -4.0 });
        assert_eq!(x, 432);
        assert_eq!(y, 316);
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let camera = Camera2D {
            position: Vec2 { x: 2.5, y: 1.0 },
            zoom: 1.5,
        };
        let world = Vec2 { x: -3.0, y: 4.0 };
        let (sx, sy) = world_to_screen_px(&camera, (1280, 720), world);
        let back = screen_to_world_px(
            &camera,
            (1280, 720),
            Vec2 {
                x: sx as f32,
                y: sy as f32,
            },
        );

        assert!((back.x - world.x).abs() < 0.05);
        assert!((back.y - world.y).abs() < 0.05);
    }
}
