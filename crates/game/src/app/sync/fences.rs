use std::collections::BTreeSet;
use std::f32::consts::FRAC_PI_2;

use homestead_engine::{reconcile, CacheTable, LiveEntity, PositionKey, SceneWorld, SyncEffects, Transform};

use crate::app::farm::GameState;

use super::factories;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum FenceOrientation {
    AlongX,
    AlongZ,
}

/// A fence segment is identified by its whole geometry, so it never updates
/// in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct FenceKey {
    pub(crate) edge: PositionKey,
    pub(crate) orientation: FenceOrientation,
}

/// Edges between an unlocked tile and a locked or missing neighbor.
pub(crate) fn boundary_edges(state: &GameState) -> BTreeSet<FenceKey> {
    let unlocked = state
        .tiles
        .iter()
        .filter(|tile| !tile.is_locked)
        .map(|tile| (tile.x, tile.z))
        .collect::<BTreeSet<_>>();

    let mut edges = BTreeSet::new();
    for &(x, z) in &unlocked {
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            if unlocked.contains(&(x + dx, z + dz)) {
                continue;
            }
            let orientation = if dx == 0 {
                FenceOrientation::AlongX
            } else {
                FenceOrientation::AlongZ
            };
            edges.insert(FenceKey {
                edge: PositionKey::new(x as f32 + dx as f32 * 0.5, z as f32 + dz as f32 * 0.5),
                orientation,
            });
        }
    }
    edges
}

pub(crate) fn sync_fences(
    state: &GameState,
    world: &mut SceneWorld,
    table: &mut CacheTable<FenceKey, ()>,
) -> SyncEffects {
    let live = boundary_edges(state).into_iter().map(|key| {
        let rotation = match key.orientation {
            FenceOrientation::AlongX => 0.0,
            FenceOrientation::AlongZ => FRAC_PI_2,
        };
        LiveEntity {
            key,
            discriminator: (),
            transform: Transform::at(key.edge.x(), 0.0, key.edge.z()).with_rotation_y(rotation),
        }
    });
    reconcile(table, world, live, |_, _| factories::fence())
}
