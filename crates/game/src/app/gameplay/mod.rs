use std::path::PathBuf;

use homestead_engine::{
    screen_to_world_px, Camera2D, CommandKey, InputAction, InputSnapshot, Scene, SceneWorld,
    Vec2,
};
use tracing::{debug, info};

use super::farm::actions::{harvest_at, select_tool};
use super::farm::growth::catch_up;
use super::farm::persistence::{clear_saved_game, load_game, now_ms, save_game};
use super::farm::shop::{buy_next_tool, buy_selected_seed, sell_selected_produce};
use super::farm::{apply_tool, ChunkId, GameState, Tool};
use super::sync::{sync_farm, FarmSceneCaches};

const CAMERA_SPEED_UNITS_PER_SECOND: f32 = 8.0;
const GROWTH_INTERVAL_MS: u64 = 100;

include!("scene_impl.rs");
include!("util.rs");

/// The interactive farm: owns the authoritative state and the caches that
/// mirror it into the scene world.
pub(crate) struct FarmScene {
    save_path: PathBuf,
    state: GameState,
    caches: FarmSceneCaches,
    hovered: Option<ChunkId>,
    clock_ms: u64,
}

impl FarmScene {
    fn new(save_path: PathBuf, clock_ms: u64) -> Self {
        Self {
            save_path,
            state: GameState::initial(clock_ms),
            caches: FarmSceneCaches::default(),
            hovered: None,
            clock_ms,
        }
    }
}

pub(crate) fn build_farm_scene(save_path: PathBuf) -> Box<dyn Scene> {
    Box::new(FarmScene::new(save_path, now_ms()))
}
