use super::scene::Vec3;

pub type Rgba = [u8; 4];

/// Footprint-relevant geometry of a primitive, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Plane { width: f32, depth: f32 },
    Outline { width: f32, depth: f32, thickness: f32 },
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
    Cone { radius: f32, height: f32 },
}

impl Shape {
    /// Height of the top surface above the primitive's origin.
    pub fn top(&self) -> f32 {
        match *self {
            Shape::Box { height, .. } => height * 0.5,
            Shape::Plane { .. } | Shape::Outline { .. } => 0.0,
            Shape::Cylinder { height, .. } => height * 0.5,
            Shape::Sphere { radius } => radius,
            Shape::Cone { height, .. } => height * 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub offset: Vec3,
    pub color: Rgba,
}

/// Plain-data description of a visual. Factories build these; the scene owns them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableDesc {
    pub debug_name: &'static str,
    pub primitives: Vec<Primitive>,
}

impl RenderableDesc {
    pub fn new(debug_name: &'static str) -> Self {
        Self {
            debug_name,
            primitives: Vec::new(),
        }
    }

    pub fn with(mut self, shape: Shape, offset: Vec3, color: Rgba) -> Self {
        self.primitives.push(Primitive {
            shape,
            offset,
            color,
        });
        self
    }
}

pub fn rgba_from_hex(hex: u32, opacity: f32) -> Rgba {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        alpha,
    ]
}
