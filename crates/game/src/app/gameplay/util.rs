fn apply_camera_input(camera: &mut Camera2D, input: &InputSnapshot, dt_seconds: f32) {
    camera.apply_zoom_steps(input.zoom_delta_steps());

    let mut direction = Vec2::default();
    if input.is_down(InputAction::CameraUp) {
        direction.y -= 1.0;
    }
    if input.is_down(InputAction::CameraDown) {
        direction.y += 1.0;
    }
    if input.is_down(InputAction::CameraLeft) {
        direction.x -= 1.0;
    }
    if input.is_down(InputAction::CameraRight) {
        direction.x += 1.0;
    }
    let length = (direction.x * direction.x + direction.y * direction.y).sqrt();
    if length == 0.0 {
        return;
    }
    let step = CAMERA_SPEED_UNITS_PER_SECOND * dt_seconds / camera.effective_zoom() / length;
    camera.pan(Vec2 {
        x: direction.x * step,
        y: direction.y * step,
    });
}

/// Grid cell under the cursor, if the cursor is inside the window.
fn cursor_tile(camera: &Camera2D, input: &InputSnapshot) -> Option<(i32, i32)> {
    let cursor = input.cursor_position_px()?;
    let ground = screen_to_world_px(camera, input.window_size(), cursor);
    if !ground.x.is_finite() || !ground.y.is_finite() {
        return None;
    }
    Some((ground.x.round() as i32, ground.y.round() as i32))
}
