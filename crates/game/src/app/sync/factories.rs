use homestead_engine::{rgba_from_hex, RenderableDesc, Shape, Vec3, GROWTH_BUCKET_RESOLUTION};

use crate::app::farm::{BuildingKind, CropKind, TreeKind, CHUNK_SIZE};

const TRUNK: u32 = 0x8b4513;
const LEAF: u32 = 0x228b22;

pub(crate) fn tile(is_plowed: bool) -> Option<RenderableDesc> {
    let color = if is_plowed { 0x8b4513 } else { 0x7cfc00 };
    Some(RenderableDesc::new("tile").with(
        Shape::Box {
            width: 0.96,
            height: 0.1,
            depth: 0.96,
        },
        Vec3::new(0.0, -0.05, 0.0),
        rgba_from_hex(color, 1.0),
    ))
}

fn crop_color(kind: CropKind) -> u32 {
    match kind {
        CropKind::Wheat => 0xf4a460,
        CropKind::Carrot | CropKind::Pumpkin => 0xff8c00,
        CropKind::Tomato => 0xff6347,
        CropKind::Corn => 0xffd700,
        CropKind::Potato => 0xd2b48c,
    }
}

fn bucket_fraction(bucket: u32) -> f32 {
    bucket.min(GROWTH_BUCKET_RESOLUTION) as f32 / GROWTH_BUCKET_RESOLUTION as f32
}

/// Sprout that thickens with growth; produce shows once half grown.
pub(crate) fn crop(kind: CropKind, bucket: u32) -> Option<RenderableDesc> {
    let growth = bucket_fraction(bucket);
    let stem_height = 0.1 + 0.5 * growth;
    let mut desc = RenderableDesc::new("crop").with(
        Shape::Cylinder {
            radius: 0.05 + 0.2 * growth,
            height: stem_height,
        },
        Vec3::new(0.0, stem_height * 0.5, 0.0),
        rgba_from_hex(LEAF, 1.0),
    );
    if growth >= 0.5 {
        let produce = match kind {
            CropKind::Pumpkin => Shape::Sphere {
                radius: 0.15 + 0.2 * growth,
            },
            CropKind::Wheat | CropKind::Corn => Shape::Cone {
                radius: 0.12 + 0.1 * growth,
                height: 0.3,
            },
            _ => Shape::Sphere {
                radius: 0.08 + 0.1 * growth,
            },
        };
        desc = desc.with(
            produce,
            Vec3::new(0.0, stem_height, 0.0),
            rgba_from_hex(crop_color(kind), 1.0),
        );
    }
    Some(desc)
}

pub(crate) fn tree(kind: TreeKind, bucket: u32) -> Option<RenderableDesc> {
    let scale = 0.4 + 0.6 * bucket_fraction(bucket);
    let trunk_height = 0.8 * scale;
    let desc = RenderableDesc::new("tree").with(
        Shape::Cylinder {
            radius: 0.1 * scale,
            height: trunk_height,
        },
        Vec3::new(0.0, trunk_height * 0.5, 0.0),
        rgba_from_hex(TRUNK, 1.0),
    );
    let desc = match kind {
        TreeKind::Pine => desc.with(
            Shape::Cone {
                radius: 0.5 * scale,
                height: 1.2 * scale,
            },
            Vec3::new(0.0, trunk_height + 0.6 * scale, 0.0),
            rgba_from_hex(LEAF, 1.0),
        ),
        TreeKind::Oak => desc.with(
            Shape::Sphere {
                radius: 0.55 * scale,
            },
            Vec3::new(0.0, trunk_height + 0.4 * scale, 0.0),
            rgba_from_hex(0x2d5016, 1.0),
        ),
        TreeKind::Apple | TreeKind::Orange => {
            let canopy = desc.with(
                Shape::Sphere {
                    radius: 0.5 * scale,
                },
                Vec3::new(0.0, trunk_height + 0.4 * scale, 0.0),
                rgba_from_hex(0x90ee90, 1.0),
            );
            if bucket < GROWTH_BUCKET_RESOLUTION {
                canopy
            } else {
                let fruit = if kind == TreeKind::Apple { 0xff0000 } else { 0xffa500 };
                [(-0.25, 0.1), (0.2, 0.2), (0.05, -0.25)]
                    .into_iter()
                    .fold(canopy, |desc, (dx, dz)| {
                        desc.with(
                            Shape::Sphere { radius: 0.08 },
                            Vec3::new(dx, trunk_height + 0.6, dz),
                            rgba_from_hex(fruit, 1.0),
                        )
                    })
            }
        }
    };
    Some(desc)
}

pub(crate) fn building(kind: BuildingKind) -> Option<RenderableDesc> {
    let (walls, roof) = match kind {
        BuildingKind::SeedStorage => (0xd2691e, 0x8b0000),
        BuildingKind::Barn => (0xdc143c, 0x4b0000),
        BuildingKind::Well => return well(),
    };
    Some(
        RenderableDesc::new("building")
            .with(
                Shape::Box {
                    width: 0.9,
                    height: 0.8,
                    depth: 0.9,
                },
                Vec3::new(0.0, 0.4, 0.0),
                rgba_from_hex(walls, 1.0),
            )
            .with(
                Shape::Cone {
                    radius: 0.7,
                    height: 0.5,
                },
                Vec3::new(0.0, 1.05, 0.0),
                rgba_from_hex(roof, 1.0),
            ),
    )
}

pub(crate) fn well() -> Option<RenderableDesc> {
    Some(
        RenderableDesc::new("well")
            .with(
                Shape::Cylinder {
                    radius: 0.4,
                    height: 0.5,
                },
                Vec3::new(0.0, 0.25, 0.0),
                rgba_from_hex(0x808080, 1.0),
            )
            .with(
                Shape::Box {
                    width: 0.9,
                    height: 0.1,
                    depth: 0.9,
                },
                Vec3::new(0.0, 1.0, 0.0),
                rgba_from_hex(0x654321, 1.0),
            ),
    )
}

pub(crate) fn chunk_overlay(is_available: bool) -> Option<RenderableDesc> {
    let (fill, fill_opacity, outline) = if is_available {
        (0x2563eb, 0.35, 0xfacc15)
    } else {
        (0x374151, 0.2, 0x94a3b8)
    };
    let size = CHUNK_SIZE as f32;
    Some(
        RenderableDesc::new("chunk_overlay")
            .with(
                Shape::Plane {
                    width: size,
                    depth: size,
                },
                Vec3::new(0.0, 0.05, 0.0),
                rgba_from_hex(fill, fill_opacity),
            )
            .with(
                Shape::Outline {
                    width: size,
                    depth: size,
                    thickness: 0.1,
                },
                Vec3::new(0.0, 0.051, 0.0),
                rgba_from_hex(outline, 0.6),
            ),
    )
}

/// Fence segment along local x; rotate a quarter turn for edges along z.
pub(crate) fn fence() -> Option<RenderableDesc> {
    let post = Shape::Box {
        width: 0.08,
        height: 0.4,
        depth: 0.08,
    };
    let rail = Shape::Box {
        width: 0.92,
        height: 0.05,
        depth: 0.05,
    };
    let color = rgba_from_hex(TRUNK, 1.0);
    Some(
        RenderableDesc::new("fence")
            .with(post, Vec3::new(-0.4, 0.2, 0.0), color)
            .with(post, Vec3::new(0.4, 0.2, 0.0), color)
            .with(rail, Vec3::new(0.0, 0.15, 0.0), color)
            .with(rail, Vec3::new(0.0, 0.3, 0.0), color),
    )
}

pub(crate) fn sale_sign() -> Option<RenderableDesc> {
    Some(
        RenderableDesc::new("sale_sign")
            .with(
                Shape::Box {
                    width: 0.2,
                    height: 1.0,
                    depth: 0.2,
                },
                Vec3::new(0.0, 0.5, 0.0),
                rgba_from_hex(TRUNK, 1.0),
            )
            .with(
                Shape::Box {
                    width: 1.2,
                    height: 0.6,
                    depth: 0.1,
                },
                Vec3::new(0.0, 1.1, 0.0),
                rgba_from_hex(0xd2b48c, 1.0),
            )
            .with(
                Shape::Box {
                    width: 0.8,
                    height: 0.2,
                    depth: 0.12,
                },
                Vec3::new(0.0, 1.1, 0.0),
                rgba_from_hex(0xff0000, 1.0),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plowed_and_grass_tiles_differ() {
        assert_ne!(tile(true), tile(false));
    }

    #[test]
    fn crops_gain_produce_once_half_grown() {
        let sprout = crop(CropKind::Tomato, 2).expect("desc");
        let ripe = crop(CropKind::Tomato, GROWTH_BUCKET_RESOLUTION).expect("desc");

        assert_eq!(sprout.primitives.len(), 1);
        assert_eq!(ripe.primitives.len(), 2);
    }

    #[test]
    fn only_ripe_fruit_trees_show_fruit() {
        let growing = tree(TreeKind::Apple, 8).expect("desc");
        let ripe = tree(TreeKind::Apple, GROWTH_BUCKET_RESOLUTION).expect("desc");
        let pine = tree(TreeKind::Pine, GROWTH_BUCKET_RESOLUTION).expect("desc");

        assert_eq!(growing.primitives.len(), 2);
        assert_eq!(ripe.primitives.len(), 5);
        assert_eq!(pine.primitives.len(), 2);
    }

    #[test]
    fn overlay_colors_follow_availability() {
        let available = chunk_overlay(true).expect("desc");
        let blocked = chunk_overlay(false).expect("desc");

        assert_eq!(available.primitives[0].color, rgba_from_hex(0x2563eb, 0.35));
        assert_eq!(blocked.primitives[0].color, rgba_from_hex(0x374151, 0.2));
        assert_eq!(available.primitives[1].color, rgba_from_hex(0xfacc15, 0.6));
    }

    #[test]
    fn well_building_uses_the_well_model() {
        assert_eq!(building(BuildingKind::Well), well());
    }
}
