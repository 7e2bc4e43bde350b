use std::collections::BTreeSet;

use homestead_engine::{
    quantize_growth, reconcile, CacheTable, LiveEntity, PositionKey, SceneWorld, SyncEffects,
    Transform, GROWTH_BUCKET_RESOLUTION,
};

use crate::app::farm::{CropKind, GameState};

use super::factories;

/// Tiles first, then the crops standing on them. A tile that drops out of
/// the live set takes its crop with it before either table is diffed.
pub(crate) fn sync_terrain(
    state: &GameState,
    world: &mut SceneWorld,
    tiles: &mut CacheTable<PositionKey, bool>,
    crops: &mut CacheTable<PositionKey, (CropKind, u32)>,
) -> SyncEffects {
    let live_tiles = state
        .tiles
        .iter()
        .filter(|tile| !tile.is_locked)
        .map(|tile| LiveEntity {
            key: PositionKey::from_grid(tile.x, tile.z),
            discriminator: tile.is_plowed,
            transform: Transform::at(tile.x as f32, 0.0, tile.z as f32),
        })
        .collect::<Vec<_>>();
    let live_tile_keys = live_tiles
        .iter()
        .map(|tile| tile.key)
        .collect::<BTreeSet<_>>();

    let mut effects = SyncEffects::default();
    let orphaned = tiles
        .keys()
        .filter(|key| !live_tile_keys.contains(*key))
        .copied()
        .collect::<Vec<_>>();
    for key in &orphaned {
        crops.evict(key, world, &mut effects);
    }

    effects.extend(reconcile(tiles, world, live_tiles, |_, is_plowed| {
        factories::tile(*is_plowed)
    }));

    let live_crops = state
        .tiles
        .iter()
        .filter(|tile| !tile.is_locked)
        .filter_map(|tile| {
            tile.crop.map(|crop| LiveEntity {
                key: PositionKey::from_grid(tile.x, tile.z),
                discriminator: (
                    crop.kind,
                    quantize_growth(crop.progress(), GROWTH_BUCKET_RESOLUTION),
                ),
                transform: Transform::at(tile.x as f32, 0.0, tile.z as f32),
            })
        });
    effects.extend(reconcile(crops, world, live_crops, |_, (kind, bucket)| {
        factories::crop(*kind, *bucket)
    }));
    effects
}
