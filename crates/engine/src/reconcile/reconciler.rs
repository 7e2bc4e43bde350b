use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::app::{RenderableDesc, SceneWorld, Transform};

use super::cache::CacheTable;
use super::effects::SyncEffects;

/// One entity as seen by a reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEntity<K, D> {
    pub key: K,
    pub discriminator: D,
    pub transform: Transform,
}

/// Brings `table` and `world` in line with the `live` snapshot.
///
/// Every live entity is upserted before any stale key is evicted, so a key
/// that reappears later in the same snapshot keeps its renderable. Duplicate
/// keys resolve to the last occurrence and still leave one scene entry.
pub fn reconcile<K, D, I, F>(
    table: &mut CacheTable<K, D>,
    world: &mut SceneWorld,
    live: I,
    mut build: F,
) -> SyncEffects
where
    K: Ord + Clone + Debug,
    D: PartialEq + Debug,
    I: IntoIterator<Item = LiveEntity<K, D>>,
    F: FnMut(&K, &D) -> Option<RenderableDesc>,
{
    let live = live.into_iter().collect::<Vec<_>>();
    let live_keys = live
        .iter()
        .map(|entity| entity.key.clone())
        .collect::<BTreeSet<_>>();

    let mut effects = SyncEffects::default();
    for entity in live {
        let key = entity.key.clone();
        table.upsert(
            world,
            entity.key,
            entity.discriminator,
            entity.transform,
            |discriminator| build(&key, discriminator),
            &mut effects,
        );
    }
    table.retain_live(&live_keys, world, &mut effects);
    effects
}
