use std::fmt;

use serde::{Deserialize, Serialize};

use super::actions::{self, ActionRejected};
use super::definitions::{BuildingKind, CropKind, ToolKind, TreeKind};
use super::state::{ChunkId, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Tool {
    Hoe,
    Plant(CropKind),
    Harvest,
    Axe,
    PlaceTree(TreeKind),
    PlaceBuilding(BuildingKind),
    BuyChunk,
}

/// Number keys 1..9, in order.
pub(crate) const HOTBAR: [Tool; 9] = [
    Tool::Hoe,
    Tool::Plant(CropKind::Wheat),
    Tool::Plant(CropKind::Carrot),
    Tool::Plant(CropKind::Potato),
    Tool::Harvest,
    Tool::Axe,
    Tool::PlaceTree(TreeKind::Pine),
    Tool::PlaceBuilding(BuildingKind::Well),
    Tool::BuyChunk,
];

impl Tool {
    pub(crate) fn from_hotbar_slot(slot: u8) -> Option<Tool> {
        HOTBAR.get(slot as usize).copied()
    }

    /// Owned tool needed before this one can be selected.
    pub(crate) fn required_tool(self) -> Option<ToolKind> {
        match self {
            Tool::Hoe => Some(ToolKind::Hoe),
            Tool::Axe => Some(ToolKind::Axe),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Hoe => f.write_str("Hoe"),
            Tool::Plant(crop) => write!(f, "Plant {crop}"),
            Tool::Harvest => f.write_str("Harvest"),
            Tool::Axe => f.write_str("Axe"),
            Tool::PlaceTree(tree) => write!(f, "Place {tree}"),
            Tool::PlaceBuilding(building) => write!(f, "Build {building}"),
            Tool::BuyChunk => f.write_str("Buy Land"),
        }
    }
}

/// Runs `tool` against the tile at `(x, z)`.
pub(crate) fn apply_tool(
    state: &mut GameState,
    tool: Tool,
    x: i32,
    z: i32,
    now_ms: u64,
) -> Result<(), ActionRejected> {
    match tool {
        Tool::Hoe => actions::plow(state, x, z),
        Tool::Plant(crop) => actions::plant(state, x, z, crop, now_ms),
        Tool::Harvest => actions::harvest_at(state, x, z),
        Tool::Axe => actions::chop_tree(state, x, z),
        Tool::PlaceTree(kind) => actions::place_tree(state, x, z, kind, now_ms),
        Tool::PlaceBuilding(kind) => actions::place_building(state, x, z, kind, now_ms),
        Tool::BuyChunk => actions::buy_chunk(state, ChunkId::containing(x, z)),
    }
}
