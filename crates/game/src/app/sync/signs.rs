use homestead_engine::{reconcile, CacheTable, LiveEntity, PositionKey, SceneWorld, SyncEffects, Transform};

use crate::app::farm::GameState;

use super::factories;

/// One "for sale" sign at the center of each chunk that can be bought now.
pub(crate) fn sync_signs(
    state: &GameState,
    world: &mut SceneWorld,
    table: &mut CacheTable<PositionKey, ()>,
) -> SyncEffects {
    let live = state
        .chunks
        .iter()
        .filter(|chunk| state.is_chunk_available(chunk.id))
        .map(|chunk| {
            let (x, z) = chunk.id.center();
            LiveEntity {
                key: PositionKey::new(x, z),
                discriminator: (),
                transform: Transform::at(x, 0.0, z),
            }
        });
    reconcile(table, world, live, |_, _| factories::sale_sign())
}
