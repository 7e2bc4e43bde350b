use std::fmt;

pub const GROWTH_BUCKET_RESOLUTION: u32 = 12;

/// Grid position used as a cache key.
///
/// Coordinates are stored doubled so that half-integer positions (fence
/// edges) get their own slots instead of colliding with tile centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    x2: i32,
    z2: i32,
}

impl PositionKey {
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            x2: double_round(x),
            z2: double_round(z),
        }
    }

    pub fn from_grid(x: i32, z: i32) -> Self {
        Self {
            x2: x.saturating_mul(2),
            z2: z.saturating_mul(2),
        }
    }

    pub fn x(&self) -> f32 {
        self.x2 as f32 * 0.5
    }

    pub fn z(&self) -> f32 {
        self.z2 as f32 * 0.5
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x(), self.z())
    }
}

fn double_round(value: f32) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    (value * 2.0).round() as i32
}

/// Position key qualified by a sub-kind, for families whose members can
/// share a cell but must never share a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey<D> {
    pub discriminant: D,
    pub position: PositionKey,
}

impl<D> CompositeKey<D> {
    pub fn new(discriminant: D, x: f32, z: f32) -> Self {
        Self {
            discriminant,
            position: PositionKey::new(x, z),
        }
    }
}

impl<D: fmt::Display> fmt::Display for CompositeKey<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.discriminant, self.position)
    }
}

/// Buckets a growth fraction into `0..=resolution`.
pub fn quantize_growth(progress: f32, resolution: u32) -> u32 {
    let clamped = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    (clamped * resolution as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_half_integer_positions_do_not_collide() {
        let tile = PositionKey::new(3.0, 4.0);
        let edge = PositionKey::new(3.5, 4.0);
        let neighbor = PositionKey::new(4.0, 4.0);

        assert_ne!(tile, edge);
        assert_ne!(edge, neighbor);
        assert_eq!(tile, PositionKey::from_grid(3, 4));
    }

    #[test]
    fn position_key_is_stable_for_repeated_input() {
        assert_eq!(PositionKey::new(-7.0, 2.5), PositionKey::new(-7.0, 2.5));
        assert_eq!(PositionKey::new(-7.0, 2.5).to_string(), "-7:2.5");
    }

    #[test]
    fn composite_keys_separate_kinds_at_one_cell() {
        let tree = CompositeKey::new("tree", 3.0, 4.0);
        let building = CompositeKey::new("building", 3.0, 4.0);

        assert_ne!(tree, building);
        assert_eq!(tree.position, building.position);
        assert_eq!(tree.to_string(), "tree@3:4");
    }

    #[test]
    fn quantize_growth_hits_both_ends() {
        assert_eq!(quantize_growth(0.0, GROWTH_BUCKET_RESOLUTION), 0);
        assert_eq!(
            quantize_growth(1.0, GROWTH_BUCKET_RESOLUTION),
            GROWTH_BUCKET_RESOLUTION
        );
        assert_eq!(quantize_growth(0.5, GROWTH_BUCKET_RESOLUTION), 6);
    }

    #[test]
    fn quantize_growth_is_monotonic_over_unit_interval() {
        let mut previous = 0;
        for step in 0..=1000 {
            let bucket = quantize_growth(step as f32 / 1000.0, GROWTH_BUCKET_RESOLUTION);
            assert!(bucket >= previous, "bucket dropped at step {step}");
            previous = bucket;
        }
    }

    #[test]
    fn quantize_growth_clamps_out_of_range_and_nan() {
        assert_eq!(quantize_growth(-0.3, GROWTH_BUCKET_RESOLUTION), 0);
        assert_eq!(quantize_growth(1.7, GROWTH_BUCKET_RESOLUTION), 12);
        assert_eq!(quantize_growth(f32::NAN, GROWTH_BUCKET_RESOLUTION), 0);
    }

    #[test]
    fn nearby_progress_values_share_a_bucket() {
        assert_eq!(
            quantize_growth(0.41, GROWTH_BUCKET_RESOLUTION),
            quantize_growth(0.415, GROWTH_BUCKET_RESOLUTION)
        );
    }
}
