use homestead_engine::{reconcile, CacheTable, LiveEntity, SceneWorld, SyncEffects, Transform};
use tracing::debug;

use crate::app::farm::{ChunkId, GameState};

use super::factories;

/// Overlays every unowned chunk, colored by whether it can be bought now.
///
/// Returns the hover id to keep using: a hovered chunk whose overlay is gone
/// after the pass (bought, or no longer in the state) is no longer hoverable.
pub(crate) fn sync_chunk_overlays(
    state: &GameState,
    world: &mut SceneWorld,
    table: &mut CacheTable<ChunkId, bool>,
    hovered: Option<ChunkId>,
) -> (SyncEffects, Option<ChunkId>) {
    let live = state
        .chunks
        .iter()
        .filter(|chunk| !chunk.is_owned)
        .map(|chunk| {
            let (x, z) = chunk.id.center();
            LiveEntity {
                key: chunk.id,
                discriminator: state.is_chunk_available(chunk.id),
                transform: Transform::at(x, 0.0, z),
            }
        });
    let effects = reconcile(table, world, live, |_, is_available| {
        factories::chunk_overlay(*is_available)
    });

    let hovered = match hovered {
        Some(id) if !table.contains_key(&id) => {
            debug!(chunk = %id, "hovered_chunk_cleared");
            None
        }
        other => other,
    };
    (effects, hovered)
}
