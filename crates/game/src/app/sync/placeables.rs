use homestead_engine::{
    quantize_growth, reconcile, CacheTable, CompositeKey, LiveEntity, SceneWorld, SyncEffects,
    Transform, GROWTH_BUCKET_RESOLUTION,
};

use crate::app::farm::{BuildingKind, GameState, PlaceableData, TreeKind};

use super::factories;

pub(crate) type PlaceableKey = CompositeKey<&'static str>;

/// What decides whether a placeable's renderable can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaceableVisual {
    Tree(TreeKind, u32),
    Building(BuildingKind),
    Well,
}

impl PlaceableVisual {
    fn of(object: &PlaceableData) -> Self {
        match object {
            PlaceableData::Tree(tree) => PlaceableVisual::Tree(
                tree.kind,
                quantize_growth(tree.progress(), GROWTH_BUCKET_RESOLUTION),
            ),
            PlaceableData::Building(building) => PlaceableVisual::Building(building.kind),
            PlaceableData::Well { .. } => PlaceableVisual::Well,
        }
    }
}

/// Placeables only show while the tile beneath them is unlocked.
pub(crate) fn sync_placeables(
    state: &GameState,
    world: &mut SceneWorld,
    table: &mut CacheTable<PlaceableKey, PlaceableVisual>,
) -> SyncEffects {
    let live = state
        .placeables
        .iter()
        .filter(|placeable| {
            state
                .tile(placeable.x, placeable.z)
                .is_some_and(|tile| !tile.is_locked)
        })
        .map(|placeable| LiveEntity {
            key: CompositeKey::new(
                placeable.object.family(),
                placeable.x as f32,
                placeable.z as f32,
            ),
            discriminator: PlaceableVisual::of(&placeable.object),
            transform: Transform::at(placeable.x as f32, 0.0, placeable.z as f32),
        });

    reconcile(table, world, live, |_, visual| match *visual {
        PlaceableVisual::Tree(kind, bucket) => factories::tree(kind, bucket),
        PlaceableVisual::Building(kind) => factories::building(kind),
        PlaceableVisual::Well => factories::well(),
    })
}
