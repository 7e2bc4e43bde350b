//! Keyed diffing between plain-data snapshots and the renderable arena.

mod cache;
mod effects;
mod keys;
mod reconciler;

pub use cache::{CacheEntry, CacheTable};
pub use effects::{SceneEffect, SceneOp, SyncEffects};
pub use keys::{quantize_growth, CompositeKey, PositionKey, GROWTH_BUCKET_RESOLUTION};
pub use reconciler::{reconcile, LiveEntity};
