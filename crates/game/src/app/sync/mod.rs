//! Per-family reconcilers that mirror `GameState` into the scene.

mod chunks;
mod factories;
mod fences;
mod placeables;
mod signs;
mod terrain;

use homestead_engine::{CacheTable, PositionKey, SceneWorld, SyncEffects};
use tracing::debug;

use crate::app::farm::{ChunkId, CropKind, GameState};

pub(crate) use fences::FenceKey;
pub(crate) use placeables::{PlaceableKey, PlaceableVisual};

/// One cache table per entity family. Tables never share handles.
pub(crate) struct FarmSceneCaches {
    pub(crate) tiles: CacheTable<PositionKey, bool>,
    pub(crate) crops: CacheTable<PositionKey, (CropKind, u32)>,
    pub(crate) placeables: CacheTable<PlaceableKey, PlaceableVisual>,
    pub(crate) chunks: CacheTable<ChunkId, bool>,
    pub(crate) fences: CacheTable<FenceKey, ()>,
    pub(crate) signs: CacheTable<PositionKey, ()>,
}

impl Default for FarmSceneCaches {
    fn default() -> Self {
        Self {
            tiles: CacheTable::new("tile"),
            crops: CacheTable::new("crop"),
            placeables: CacheTable::new("placeable"),
            chunks: CacheTable::new("chunk_overlay"),
            fences: CacheTable::new("fence"),
            signs: CacheTable::new("sale_sign"),
        }
    }
}

impl FarmSceneCaches {
    pub(crate) fn len(&self) -> usize {
        self.tiles.len()
            + self.crops.len()
            + self.placeables.len()
            + self.chunks.len()
            + self.fences.len()
            + self.signs.len()
    }

    /// Drops every cached renderable from `world`.
    pub(crate) fn clear(&mut self, world: &mut SceneWorld) -> SyncEffects {
        let mut effects = SyncEffects::default();
        self.tiles.clear(world, &mut effects);
        self.crops.clear(world, &mut effects);
        self.placeables.clear(world, &mut effects);
        self.chunks.clear(world, &mut effects);
        self.fences.clear(world, &mut effects);
        self.signs.clear(world, &mut effects);
        effects
    }
}

#[derive(Debug, Default)]
pub(crate) struct FarmSyncReport {
    pub(crate) effects: SyncEffects,
    pub(crate) hovered: Option<ChunkId>,
}

/// Runs every family pass once, terrain first so crops never outlive their
/// tile by a frame.
pub(crate) fn sync_farm(
    state: &GameState,
    world: &mut SceneWorld,
    caches: &mut FarmSceneCaches,
    hovered: Option<ChunkId>,
) -> FarmSyncReport {
    let mut effects = terrain::sync_terrain(state, world, &mut caches.tiles, &mut caches.crops);
    effects.extend(placeables::sync_placeables(
        state,
        world,
        &mut caches.placeables,
    ));
    let (chunk_effects, hovered) =
        chunks::sync_chunk_overlays(state, world, &mut caches.chunks, hovered);
    effects.extend(chunk_effects);
    effects.extend(fences::sync_fences(state, world, &mut caches.fences));
    effects.extend(signs::sync_signs(state, world, &mut caches.signs));

    if !effects.is_empty() {
        debug!(
            created = effects.created(),
            updated = effects.updated(),
            destroyed = effects.destroyed(),
            cached = caches.len(),
            "farm_synced"
        );
    }
    FarmSyncReport { effects, hovered }
}

#[cfg(test)]
mod tests {
    use homestead_engine::{RenderableId, SceneOp};

    use super::*;
    use crate::app::farm::actions::{buy_chunk, harvest_crop, place_tree, plant, plow};
    use crate::app::farm::growth::advance_growth;
    use crate::app::farm::{TreeKind, CHUNK_SIZE};

    fn planted_state() -> GameState {
        let mut state = GameState::initial(0);
        state
            .inventory
            .try_add_seeds(CropKind::Wheat, 1, 50)
            .expect("seeds");
        plow(&mut state, 1, 1).expect("plowed");
        plant(&mut state, 1, 1, CropKind::Wheat, 0).expect("planted");
        state
    }

    fn crop_handle(caches: &FarmSceneCaches) -> RenderableId {
        caches
            .crops
            .handle(&PositionKey::from_grid(1, 1))
            .expect("crop cached")
    }

    fn assert_consistent(world: &SceneWorld, caches: &FarmSceneCaches) {
        assert_eq!(world.renderable_count(), caches.len());
    }

    #[test]
    fn first_pass_builds_the_starting_farm() {
        let state = GameState::initial(0);
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();

        let report = sync_farm(&state, &mut world, &mut caches, None);

        let owned_tiles = (CHUNK_SIZE * CHUNK_SIZE) as usize;
        assert_eq!(caches.tiles.len(), owned_tiles);
        assert_eq!(caches.chunks.len(), 8);
        assert_eq!(caches.signs.len(), 4);
        assert_eq!(caches.fences.len(), 4 * CHUNK_SIZE as usize);
        assert_eq!(report.effects.created(), caches.len());
        assert_consistent(&world, &caches);
    }

    #[test]
    fn repeated_pass_without_changes_is_silent() {
        let state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        sync_farm(&state, &mut world, &mut caches, None);
        let before = crop_handle(&caches);

        let report = sync_farm(&state, &mut world, &mut caches, None);

        assert!(report.effects.is_empty());
        assert_eq!(crop_handle(&caches), before);
    }

    #[test]
    fn growth_within_one_bucket_keeps_the_crop_renderable() {
        let mut state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        sync_farm(&state, &mut world, &mut caches, None);
        let before = crop_handle(&caches);

        advance_growth(&mut state, 0.5, 500);
        let report = sync_farm(&state, &mut world, &mut caches, None);

        assert!(report.effects.is_empty());
        assert_eq!(crop_handle(&caches), before);
    }

    #[test]
    fn crossing_a_growth_bucket_rebuilds_the_crop() {
        let mut state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        sync_farm(&state, &mut world, &mut caches, None);
        let before = crop_handle(&caches);

        advance_growth(&mut state, 10.0, 10_000);
        let report = sync_farm(&state, &mut world, &mut caches, None);

        let after = crop_handle(&caches);
        assert_ne!(after, before);
        assert!(!world.contains(before));
        assert!(world.contains(after));
        let crop_ops = report
            .effects
            .for_family("crop")
            .map(|effect| effect.op)
            .collect::<Vec<_>>();
        assert_eq!(crop_ops, vec![SceneOp::Destroyed(before), SceneOp::Created(after)]);
    }

    #[test]
    fn harvesting_evicts_only_the_crop() {
        let mut state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        advance_growth(&mut state, 20.0, 20_000);
        sync_farm(&state, &mut world, &mut caches, None);
        let crop = crop_handle(&caches);
        let tile = caches.tiles.handle(&PositionKey::from_grid(1, 1)).expect("tile");

        harvest_crop(&mut state, 1, 1).expect("harvested");
        let report = sync_farm(&state, &mut world, &mut caches, None);

        assert!(caches.crops.is_empty());
        assert!(!world.contains(crop));
        assert!(world.contains(tile));
        assert_eq!(report.effects.destroyed(), 1);
        assert_consistent(&world, &caches);
    }

    #[test]
    fn locking_a_tile_removes_its_crop_in_the_same_pass() {
        let mut state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        sync_farm(&state, &mut world, &mut caches, None);
        let crop = crop_handle(&caches);
        let key = PositionKey::from_grid(1, 1);
        let tile = caches.tiles.handle(&key).expect("tile");

        let index = state.tile_index(1, 1).expect("tile index");
        state.tiles[index].is_locked = true;
        let report = sync_farm(&state, &mut world, &mut caches, None);

        assert!(!caches.tiles.contains_key(&key));
        assert!(!caches.crops.contains_key(&key));
        assert!(!world.contains(tile));
        assert!(!world.contains(crop));
        let first_destroyed = report
            .effects
            .iter()
            .find(|effect| matches!(effect.op, SceneOp::Destroyed(_)))
            .expect("destroyed");
        assert_eq!(first_destroyed.family, "crop");
        assert_consistent(&world, &caches);
    }

    #[test]
    fn buying_a_chunk_replaces_overlay_with_tiles_and_clears_hover() {
        let mut state = GameState::initial(0);
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        let east = ChunkId::new(1, 0);
        let far_east_corner = ChunkId::new(1, 1);
        sync_farm(&state, &mut world, &mut caches, Some(east));
        let corner_overlay = caches.chunks.get(&far_east_corner).expect("overlay").clone();
        assert!(!corner_overlay.discriminator);

        buy_chunk(&mut state, east).expect("bought");
        let report = sync_farm(&state, &mut world, &mut caches, Some(east));

        assert_eq!(report.hovered, None);
        assert!(!caches.chunks.contains_key(&east));
        assert_eq!(caches.tiles.len(), 2 * (CHUNK_SIZE * CHUNK_SIZE) as usize);
        let corner_now = caches.chunks.get(&far_east_corner).expect("overlay");
        assert!(corner_now.discriminator);
        assert_ne!(corner_now.handle, corner_overlay.handle);
        assert_consistent(&world, &caches);
    }

    #[test]
    fn hover_on_a_still_unowned_chunk_survives() {
        let state = GameState::initial(0);
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();

        let report = sync_farm(&state, &mut world, &mut caches, Some(ChunkId::new(-1, 0)));

        assert_eq!(report.hovered, Some(ChunkId::new(-1, 0)));
    }

    #[test]
    fn trees_and_buildings_at_one_cell_use_distinct_slots() {
        let mut state = GameState::initial(0);
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        place_tree(&mut state, 2, 3, TreeKind::Pine, 0).expect("placed");
        sync_farm(&state, &mut world, &mut caches, None);

        let tree_key = PlaceableKey::new("tree", 2.0, 3.0);
        let building_key = PlaceableKey::new("building", 2.0, 3.0);
        assert!(caches.placeables.contains_key(&tree_key));
        assert!(!caches.placeables.contains_key(&building_key));
    }

    #[test]
    fn clear_empties_every_table_and_the_world() {
        let state = planted_state();
        let mut world = SceneWorld::default();
        let mut caches = FarmSceneCaches::default();
        sync_farm(&state, &mut world, &mut caches, None);
        let cached = caches.len();

        let effects = caches.clear(&mut world);

        assert_eq!(effects.destroyed(), cached);
        assert_eq!(caches.len(), 0);
        assert_eq!(world.renderable_count(), 0);
    }
}
