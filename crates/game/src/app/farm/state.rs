use std::fmt;

use serde::{Deserialize, Serialize};

use super::definitions::{BuildingKind, CropKind, ToolKind, TreeKind};
use super::growable::Growable;
use super::inventory::Inventory;
use super::tools::Tool;

pub(crate) const CHUNK_SIZE: i32 = 10;
const CHUNK_HALF: i32 = CHUNK_SIZE / 2;
const CHUNK_RING_RADIUS: i32 = 1;
const CHUNK_COST_PER_STEP: u32 = 500;

const STARTING_COINS: u32 = 5000;
const STARTING_XP: u32 = 250;
const STARTING_LEVEL: u32 = 5;
const STARTING_WOOD: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) struct ChunkId {
    pub(crate) x: i32,
    pub(crate) z: i32,
}

impl ChunkId {
    pub(crate) const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk owning the tile at `(x, z)`.
    pub(crate) fn containing(x: i32, z: i32) -> Self {
        Self {
            x: (x + CHUNK_HALF).div_euclid(CHUNK_SIZE),
            z: (z + CHUNK_HALF).div_euclid(CHUNK_SIZE),
        }
    }

    /// World-space center of the chunk's tile block.
    pub(crate) fn center(self) -> (f32, f32) {
        let offset = (CHUNK_SIZE - 1) as f32 * 0.5 - CHUNK_HALF as f32;
        (
            (self.x * CHUNK_SIZE) as f32 + offset,
            (self.z * CHUNK_SIZE) as f32 + offset,
        )
    }

    pub(crate) fn is_orthogonally_adjacent(self, other: ChunkId) -> bool {
        (self.x - other.x).abs() + (self.z - other.z).abs() == 1
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Chunk {
    pub(crate) id: ChunkId,
    pub(crate) is_owned: bool,
    pub(crate) cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Crop {
    pub(crate) kind: CropKind,
    pub(crate) planted_at_ms: u64,
    pub(crate) growth: Growable,
}

impl Crop {
    pub(crate) fn new(kind: CropKind, planted_at_ms: u64) -> Self {
        let def = kind.def();
        Self {
            kind,
            planted_at_ms,
            growth: Growable::new(def.max_stage, def.growth_seconds),
        }
    }

    pub(crate) fn progress(&self) -> f32 {
        self.growth.progress()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Tile {
    pub(crate) x: i32,
    pub(crate) z: i32,
    pub(crate) is_plowed: bool,
    pub(crate) crop: Option<Crop>,
    pub(crate) is_locked: bool,
    pub(crate) chunk: ChunkId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Tree {
    pub(crate) kind: TreeKind,
    pub(crate) planted_at_ms: u64,
    pub(crate) growth: Growable,
}

impl Tree {
    pub(crate) fn new(kind: TreeKind, planted_at_ms: u64) -> Self {
        Self {
            kind,
            planted_at_ms,
            growth: Growable::new(kind.max_stage(), kind.def().growth_seconds),
        }
    }

    pub(crate) fn progress(&self) -> f32 {
        self.growth.progress()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Building {
    pub(crate) kind: BuildingKind,
    pub(crate) built_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub(crate) enum PlaceableData {
    Tree(Tree),
    Building(Building),
    Well { built_at_ms: u64 },
}

impl PlaceableData {
    pub(crate) fn family(&self) -> &'static str {
        match self {
            PlaceableData::Tree(_) => "tree",
            PlaceableData::Building(_) => "building",
            PlaceableData::Well { .. } => "well",
        }
    }

    /// Building kind this placeable counts as, for storage and growth bonuses.
    pub(crate) fn building_kind(&self) -> Option<BuildingKind> {
        match self {
            PlaceableData::Tree(_) => None,
            PlaceableData::Building(building) => Some(building.kind),
            PlaceableData::Well { .. } => Some(BuildingKind::Well),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Placeable {
    pub(crate) x: i32,
    pub(crate) z: i32,
    pub(crate) object: PlaceableData,
}

/// The whole farm as plain data. Gameplay actions mutate it; the scene
/// reconcilers only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameState {
    pub(crate) coins: u32,
    pub(crate) xp: u32,
    pub(crate) level: u32,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) inventory: Inventory,
    pub(crate) placeables: Vec<Placeable>,
    pub(crate) selected_tool: Tool,
    pub(crate) owned_tools: Vec<ToolKind>,
    pub(crate) last_update_ms: u64,
}

impl GameState {
    pub(crate) fn initial(now_ms: u64) -> Self {
        let mut chunks = Vec::new();
        let mut tiles = Vec::new();
        for cx in -CHUNK_RING_RADIUS..=CHUNK_RING_RADIUS {
            for cz in -CHUNK_RING_RADIUS..=CHUNK_RING_RADIUS {
                let id = ChunkId::new(cx, cz);
                let is_owned = cx == 0 && cz == 0;
                let distance = (cx.abs() + cz.abs()) as u32;
                chunks.push(Chunk {
                    id,
                    is_owned,
                    cost: CHUNK_COST_PER_STEP * distance,
                });
                for x in 0..CHUNK_SIZE {
                    for z in 0..CHUNK_SIZE {
                        tiles.push(Tile {
                            x: cx * CHUNK_SIZE + x - CHUNK_HALF,
                            z: cz * CHUNK_SIZE + z - CHUNK_HALF,
                            is_plowed: false,
                            crop: None,
                            is_locked: !is_owned,
                            chunk: id,
                        });
                    }
                }
            }
        }

        Self {
            coins: STARTING_COINS,
            xp: STARTING_XP,
            level: STARTING_LEVEL,
            tiles,
            chunks,
            inventory: Inventory::starting(STARTING_WOOD),
            placeables: Vec::new(),
            selected_tool: Tool::Hoe,
            owned_tools: vec![ToolKind::Hoe, ToolKind::Axe],
            last_update_ms: now_ms,
        }
    }

    pub(crate) fn tile_index(&self, x: i32, z: i32) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.x == x && tile.z == z)
    }

    pub(crate) fn tile(&self, x: i32, z: i32) -> Option<&Tile> {
        self.tile_index(x, z).map(|index| &self.tiles[index])
    }

    pub(crate) fn placeable_index(&self, x: i32, z: i32) -> Option<usize> {
        self.placeables
            .iter()
            .position(|placeable| placeable.x == x && placeable.z == z)
    }

    pub(crate) fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.id == id)
    }

    /// Unowned and orthogonally next to an owned chunk.
    pub(crate) fn is_chunk_available(&self, id: ChunkId) -> bool {
        let Some(chunk) = self.chunk(id) else {
            return false;
        };
        !chunk.is_owned
            && self
                .chunks
                .iter()
                .any(|other| other.is_owned && other.id.is_orthogonally_adjacent(id))
    }

    pub(crate) fn owns_tool(&self, tool: ToolKind) -> bool {
        self.owned_tools.contains(&tool)
    }

    pub(crate) fn has_building(&self, kind: BuildingKind) -> bool {
        self.placeables
            .iter()
            .any(|placeable| placeable.object.building_kind() == Some(kind))
    }

    pub(crate) fn grant_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
        self.level = level_for_xp(self.xp);
    }
}

pub(crate) fn level_for_xp(xp: u32) -> u32 {
    ((xp as f64 / 10.0).sqrt().floor() as u32).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_owns_only_the_center_chunk() {
        let state = GameState::initial(0);

        assert_eq!(state.chunks.len(), 9);
        assert_eq!(state.tiles.len(), 900);
        let owned = state
            .chunks
            .iter()
            .filter(|chunk| chunk.is_owned)
            .map(|chunk| chunk.id)
            .collect::<Vec<_>>();
        assert_eq!(owned, vec![ChunkId::new(0, 0)]);
        assert_eq!(state.chunk(ChunkId::new(1, 1)).expect("chunk").cost, 1000);
        assert_eq!(state.chunk(ChunkId::new(-1, 0)).expect("chunk").cost, 500);
        assert_eq!(state.level, 5);
        assert_eq!(state.selected_tool, Tool::Hoe);
    }

    #[test]
    fn center_chunk_tiles_are_unlocked() {
        let state = GameState::initial(0);

        assert!(!state.tile(-5, -5).expect("tile").is_locked);
        assert!(!state.tile(4, 4).expect("tile").is_locked);
        assert!(state.tile(5, 0).expect("tile").is_locked);
        assert!(state.tile(-6, 0).expect("tile").is_locked);
        assert!(state.tile(15, 0).is_none());
    }

    #[test]
    fn tiles_report_the_chunk_that_contains_them() {
        let state = GameState::initial(0);
        for tile in &state.tiles {
            assert_eq!(ChunkId::containing(tile.x, tile.z), tile.chunk);
        }
    }

    #[test]
    fn chunk_center_sits_in_the_middle_of_its_tiles() {
        assert_eq!(ChunkId::new(0, 0).center(), (-0.5, -0.5));
        assert_eq!(ChunkId::new(1, -1).center(), (9.5, -10.5));
    }

    #[test]
    fn level_follows_square_root_of_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(9), 1);
        assert_eq!(level_for_xp(10), 2);
        assert_eq!(level_for_xp(250), 6);
        assert_eq!(level_for_xp(640), 9);
    }

    #[test]
    fn availability_requires_an_owned_neighbor() {
        let state = GameState::initial(0);

        assert!(state.is_chunk_available(ChunkId::new(1, 0)));
        assert!(!state.is_chunk_available(ChunkId::new(1, 1)));
        assert!(!state.is_chunk_available(ChunkId::new(0, 0)));
        assert!(!state.is_chunk_available(ChunkId::new(4, 0)));
    }
}
