use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use tracing::debug;

use crate::app::{RenderableDesc, RenderableId, SceneWorld, Transform};

use super::effects::{SceneOp, SyncEffects};

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<D> {
    pub handle: RenderableId,
    pub discriminator: D,
}

/// One entity family's key -> renderable table.
///
/// The table is the sole owner of the handles it stores. Every mutation of
/// the scene it makes is mirrored into the caller's `SyncEffects`.
#[derive(Debug)]
pub struct CacheTable<K, D> {
    family: &'static str,
    entries: BTreeMap<K, CacheEntry<D>>,
}

impl<K, D> CacheTable<K, D>
where
    K: Ord + Clone + Debug,
    D: PartialEq + Debug,
{
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            entries: BTreeMap::new(),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&CacheEntry<D>> {
        self.entries.get(key)
    }

    pub fn handle(&self, key: &K) -> Option<RenderableId> {
        self.entries.get(key).map(|entry| entry.handle)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Reuses, rebuilds or creates the renderable for one live entity.
    ///
    /// A hit with an equal discriminator only moves the existing renderable.
    /// Anything else drops the stale entry first; if `build` then declines,
    /// the key is left absent.
    pub fn upsert<F>(
        &mut self,
        world: &mut SceneWorld,
        key: K,
        discriminator: D,
        transform: Transform,
        build: F,
        effects: &mut SyncEffects,
    ) -> Option<RenderableId>
    where
        F: FnOnce(&D) -> Option<RenderableDesc>,
    {
        if let Some(entry) = self.entries.get(&key) {
            if entry.discriminator == discriminator {
                if let Some(renderable) = world.find_renderable_mut(entry.handle) {
                    if renderable.transform != transform {
                        renderable.transform = transform;
                        effects.push(self.family, SceneOp::Updated(entry.handle));
                    }
                    return Some(entry.handle);
                }
            }
        }

        self.evict(&key, world, effects);

        let Some(desc) = build(&discriminator) else {
            debug!(family = self.family, key = ?key, discriminator = ?discriminator, "factory_declined");
            return None;
        };
        let handle = world.add(transform, desc);
        effects.push(self.family, SceneOp::Created(handle));
        self.entries.insert(
            key,
            CacheEntry {
                handle,
                discriminator,
            },
        );
        Some(handle)
    }

    pub fn evict(&mut self, key: &K, world: &mut SceneWorld, effects: &mut SyncEffects) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        world.remove(entry.handle);
        effects.push(self.family, SceneOp::Destroyed(entry.handle));
        true
    }

    /// Evicts every entry whose key is not in `live_keys`. Returns the number evicted.
    pub fn retain_live(
        &mut self,
        live_keys: &BTreeSet<K>,
        world: &mut SceneWorld,
        effects: &mut SyncEffects,
    ) -> usize {
        let stale = self
            .entries
            .keys()
            .filter(|key| !live_keys.contains(*key))
            .cloned()
            .collect::<Vec<_>>();
        for key in &stale {
            self.evict(key, world, effects);
        }
        stale.len()
    }

    pub fn clear(&mut self, world: &mut SceneWorld, effects: &mut SyncEffects) {
        for (_, entry) in std::mem::take(&mut self.entries) {
            world.remove(entry.handle);
            effects.push(self.family, SceneOp::Destroyed(entry.handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Shape, Vec3};
    use crate::reconcile::PositionKey;

    fn build_marker(_discriminator: &u32) -> Option<RenderableDesc> {
        Some(RenderableDesc::new("marker").with(
            Shape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Vec3::ZERO,
            [255, 255, 255, 255],
        ))
    }

    #[test]
    fn hit_with_same_discriminator_reuses_handle_and_moves_it() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("crop");
        let mut effects = SyncEffects::default();
        let key = PositionKey::from_grid(1, 1);

        let first = table
            .upsert(&mut world, key, 3, Transform::at(1.0, 0.0, 1.0), build_marker, &mut effects)
            .expect("created");
        let second = table
            .upsert(&mut world, key, 3, Transform::at(1.0, 0.5, 1.0), build_marker, &mut effects)
            .expect("reused");

        assert_eq!(first, second);
        assert_eq!(world.renderable_count(), 1);
        assert_eq!(
            world.find_renderable(first).expect("renderable").transform,
            Transform::at(1.0, 0.5, 1.0)
        );
        assert_eq!(effects.created(), 1);
        assert_eq!(effects.updated(), 1);
    }

    #[test]
    fn unchanged_hit_reports_nothing() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("tile");
        let key = PositionKey::from_grid(0, 0);
        let mut effects = SyncEffects::default();
        table.upsert(&mut world, key, 0, Transform::default(), build_marker, &mut effects);

        let mut second_pass = SyncEffects::default();
        table.upsert(&mut world, key, 0, Transform::default(), build_marker, &mut second_pass);

        assert!(second_pass.is_empty());
    }

    #[test]
    fn discriminator_change_rebuilds_and_removes_old_handle() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("crop");
        let mut effects = SyncEffects::default();
        let key = PositionKey::from_grid(2, -1);

        let old = table
            .upsert(&mut world, key, 3, Transform::default(), build_marker, &mut effects)
            .expect("created");
        let new = table
            .upsert(&mut world, key, 4, Transform::default(), build_marker, &mut effects)
            .expect("rebuilt");

        assert_ne!(old, new);
        assert!(!world.contains(old));
        assert!(world.contains(new));
        assert_eq!(table.get(&key).expect("entry").discriminator, 4);
        assert_eq!(
            &effects.as_slice()[1..]
                .iter()
                .map(|effect| effect.op)
                .collect::<Vec<_>>(),
            &[SceneOp::Destroyed(old), SceneOp::Created(new)]
        );
    }

    #[test]
    fn declined_build_leaves_key_absent_and_scene_untouched() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("tree");
        let mut effects = SyncEffects::default();

        let handle = table.upsert(
            &mut world,
            PositionKey::from_grid(0, 0),
            1,
            Transform::default(),
            |_| None,
            &mut effects,
        );

        assert!(handle.is_none());
        assert!(table.is_empty());
        assert_eq!(world.renderable_count(), 0);
        assert!(effects.is_empty());
    }

    #[test]
    fn declined_rebuild_evicts_stale_entry() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("tree");
        let mut effects = SyncEffects::default();
        let key = PositionKey::from_grid(0, 0);
        let old = table
            .upsert(&mut world, key, 1, Transform::default(), build_marker, &mut effects)
            .expect("created");

        table.upsert(&mut world, key, 2, Transform::default(), |_| None, &mut effects);

        assert!(!table.contains_key(&key));
        assert!(!world.contains(old));
    }

    #[test]
    fn handle_missing_from_scene_is_rebuilt() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("tile");
        let mut effects = SyncEffects::default();
        let key = PositionKey::from_grid(0, 0);
        let old = table
            .upsert(&mut world, key, 0, Transform::default(), build_marker, &mut effects)
            .expect("created");
        world.remove(old);

        let new = table
            .upsert(&mut world, key, 0, Transform::default(), build_marker, &mut effects)
            .expect("rebuilt");

        assert_ne!(old, new);
        assert_eq!(world.renderable_count(), 1);
    }

    #[test]
    fn retain_live_evicts_only_missing_keys() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("fence");
        let mut effects = SyncEffects::default();
        let kept = PositionKey::from_grid(0, 0);
        let dropped = PositionKey::from_grid(1, 0);
        table.upsert(&mut world, kept, 0, Transform::default(), build_marker, &mut effects);
        let dropped_handle = table
            .upsert(&mut world, dropped, 0, Transform::default(), build_marker, &mut effects)
            .expect("created");

        let evicted = table.retain_live(&BTreeSet::from([kept]), &mut world, &mut effects);

        assert_eq!(evicted, 1);
        assert!(table.contains_key(&kept));
        assert!(!table.contains_key(&dropped));
        assert!(!world.contains(dropped_handle));
    }

    #[test]
    fn clear_removes_every_owned_renderable() {
        let mut world = SceneWorld::default();
        let mut table = CacheTable::<PositionKey, u32>::new("sign");
        let mut effects = SyncEffects::default();
        for x in 0..4 {
            table.upsert(
                &mut world,
                PositionKey::from_grid(x, 0),
                0,
                Transform::default(),
                build_marker,
                &mut effects,
            );
        }

        table.clear(&mut world, &mut effects);

        assert!(table.is_empty());
        assert_eq!(world.renderable_count(), 0);
        assert_eq!(effects.destroyed(), 4);
    }
}
