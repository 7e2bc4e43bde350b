use thiserror::Error;
use tracing::debug;

use super::definitions::{
    BuildingKind, CropKind, FoodKind, ToolKind, TreeKind, CHOP_XP, FRUIT_HARVEST_XP,
};
use super::inventory::{food_capacity, seed_capacity};
use super::state::{Building, ChunkId, Crop, GameState, Placeable, PlaceableData, Tree};
use super::tools::Tool;

/// Half-extent of the homestead hut footprint around the origin.
const HUT_ZONE_HALF_EXTENT: f32 = 1.5;

/// Why a gameplay action was refused. These are expected player outcomes,
/// not faults; `Display` is the message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ActionRejected {
    #[error("No farmland at {x}:{z}")]
    NoTile { x: i32, z: i32 },
    #[error("Area Locked")]
    Locked,
    #[error("Tile is occupied!")]
    Occupied,
    #[error("Already plowed")]
    AlreadyPlowed,
    #[error("Plow the soil first")]
    NotPlowed,
    #[error("Not enough seeds!")]
    NoSeeds(CropKind),
    #[error("Nothing to harvest here")]
    NothingToHarvest,
    #[error("Not ready yet")]
    NotReady,
    #[error("Inventory Full! ({free} free, {needed} needed)")]
    InventoryFull { needed: u32, free: u32 },
    #[error("Not enough coins (need {needed}, have {have})")]
    NotEnoughCoins { needed: u32, have: u32 },
    #[error("Not enough wood (need {needed}, have {have})")]
    NotEnoughWood { needed: u32, have: u32 },
    #[error("Requires level {required}")]
    LevelTooLow { required: u32 },
    #[error("Requires the {0}")]
    MissingTool(ToolKind),
    #[error("Already own the {0}")]
    ToolOwned(ToolKind),
    #[error("No tree here")]
    NoTree,
    #[error("{0} does not bear fruit")]
    NotFruitTree(TreeKind),
    #[error("Land {0} does not exist")]
    UnknownChunk(ChunkId),
    #[error("Land {0} is already owned")]
    ChunkOwned(ChunkId),
    #[error("Land {0} must border land you own")]
    ChunkNotAdjacent(ChunkId),
    #[error("Too close to the homestead")]
    HutZone,
    #[error("{0} cannot be sold")]
    NotSellable(FoodKind),
    #[error("Not enough {0} to sell")]
    NotEnoughProduce(FoodKind),
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    #[error("Select a crop first")]
    NoCropSelected,
    #[error("Every tool is already owned")]
    AllToolsOwned,
}

pub(crate) type ActionResult = Result<(), ActionRejected>;

pub(crate) fn logged(action: &'static str, result: ActionResult) -> ActionResult {
    if let Err(rejection) = &result {
        debug!(action, reason = %rejection, "action_rejected");
    }
    result
}

pub(crate) fn plow(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    logged("plow", try_plow(state, x, z))
}

fn try_plow(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    let index = unlocked_tile_index(state, x, z)?;
    if state.tiles[index].is_plowed {
        return Err(ActionRejected::AlreadyPlowed);
    }
    if state.placeable_index(x, z).is_some() {
        return Err(ActionRejected::Occupied);
    }
    state.tiles[index].is_plowed = true;
    Ok(())
}

pub(crate) fn plant(
    state: &mut GameState,
    x: i32,
    z: i32,
    crop: CropKind,
    now_ms: u64,
) -> ActionResult {
    logged("plant", try_plant(state, x, z, crop, now_ms))
}

fn try_plant(state: &mut GameState, x: i32, z: i32, crop: CropKind, now_ms: u64) -> ActionResult {
    let index = unlocked_tile_index(state, x, z)?;
    let tile = &state.tiles[index];
    if !tile.is_plowed {
        return Err(ActionRejected::NotPlowed);
    }
    if tile.crop.is_some() {
        return Err(ActionRejected::Occupied);
    }
    if !state.inventory.take_seed(crop) {
        return Err(ActionRejected::NoSeeds(crop));
    }
    state.tiles[index].crop = Some(Crop::new(crop, now_ms));
    Ok(())
}

pub(crate) fn harvest_crop(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    logged("harvest_crop", try_harvest_crop(state, x, z))
}

fn try_harvest_crop(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    let index = state
        .tile_index(x, z)
        .ok_or(ActionRejected::NoTile { x, z })?;
    let crop = state.tiles[index]
        .crop
        .ok_or(ActionRejected::NothingToHarvest)?;
    if !crop.growth.is_mature() {
        return Err(ActionRejected::NotReady);
    }

    let capacity = food_capacity(state);
    state
        .inventory
        .try_add_food(crop.kind.food(), 1, capacity)?;
    state.tiles[index].crop = None;
    state.grant_xp(crop.kind.def().harvest_xp);
    Ok(())
}

pub(crate) fn harvest_fruit(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    logged("harvest_fruit", try_harvest_fruit(state, x, z))
}

fn try_harvest_fruit(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    let index = tree_index(state, x, z)?;
    let PlaceableData::Tree(tree) = state.placeables[index].object else {
        return Err(ActionRejected::NoTree);
    };
    let fruit = tree
        .kind
        .def()
        .fruit
        .ok_or(ActionRejected::NotFruitTree(tree.kind))?;
    if !tree.growth.is_mature() {
        return Err(ActionRejected::NotReady);
    }

    let capacity = food_capacity(state);
    state
        .inventory
        .try_add_food(fruit.food, fruit.yield_count, capacity)?;
    if let PlaceableData::Tree(tree) = &mut state.placeables[index].object {
        tree.growth.harvest_fruit(fruit.interval_seconds);
    }
    state.grant_xp(FRUIT_HARVEST_XP);
    Ok(())
}

/// Harvests whatever is ready at `(x, z)`: a crop first, then a fruit tree.
pub(crate) fn harvest_at(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    let has_crop = state
        .tile(x, z)
        .is_some_and(|tile| tile.crop.is_some());
    if has_crop {
        return harvest_crop(state, x, z);
    }
    if tree_index(state, x, z).is_ok() {
        return harvest_fruit(state, x, z);
    }
    logged("harvest", Err(ActionRejected::NothingToHarvest))
}

pub(crate) fn chop_tree(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    logged("chop_tree", try_chop_tree(state, x, z))
}

fn try_chop_tree(state: &mut GameState, x: i32, z: i32) -> ActionResult {
    if !state.owns_tool(ToolKind::Axe) {
        return Err(ActionRejected::MissingTool(ToolKind::Axe));
    }
    let index = tree_index(state, x, z)?;
    let PlaceableData::Tree(tree) = state.placeables[index].object else {
        return Err(ActionRejected::NoTree);
    };
    if !tree.growth.is_grown() {
        return Err(ActionRejected::NotReady);
    }

    state.placeables.remove(index);
    state.inventory.wood = state
        .inventory
        .wood
        .saturating_add(tree.kind.def().wood_yield);
    state.grant_xp(CHOP_XP);
    Ok(())
}

pub(crate) fn place_tree(
    state: &mut GameState,
    x: i32,
    z: i32,
    kind: TreeKind,
    now_ms: u64,
) -> ActionResult {
    logged("place_tree", try_place_tree(state, x, z, kind, now_ms))
}

fn try_place_tree(
    state: &mut GameState,
    x: i32,
    z: i32,
    kind: TreeKind,
    now_ms: u64,
) -> ActionResult {
    let def = kind.def();
    ensure_level(state, def.unlock_level)?;
    ensure_placeable_site(state, x, z)?;
    ensure_coins(state, def.cost)?;

    state.coins -= def.cost;
    state.placeables.push(Placeable {
        x,
        z,
        object: PlaceableData::Tree(Tree::new(kind, now_ms)),
    });
    Ok(())
}

pub(crate) fn place_building(
    state: &mut GameState,
    x: i32,
    z: i32,
    kind: BuildingKind,
    now_ms: u64,
) -> ActionResult {
    logged("place_building", try_place_building(state, x, z, kind, now_ms))
}

fn try_place_building(
    state: &mut GameState,
    x: i32,
    z: i32,
    kind: BuildingKind,
    now_ms: u64,
) -> ActionResult {
    let def = kind.def();
    ensure_level(state, def.unlock_level)?;
    ensure_placeable_site(state, x, z)?;
    ensure_coins(state, def.coin_cost)?;
    if state.inventory.wood < def.wood_cost {
        return Err(ActionRejected::NotEnoughWood {
            needed: def.wood_cost,
            have: state.inventory.wood,
        });
    }

    state.coins -= def.coin_cost;
    state.inventory.wood -= def.wood_cost;
    let object = match kind {
        BuildingKind::Well => PlaceableData::Well {
            built_at_ms: now_ms,
        },
        _ => PlaceableData::Building(Building {
            kind,
            built_at_ms: now_ms,
        }),
    };
    state.placeables.push(Placeable { x, z, object });
    Ok(())
}

pub(crate) fn buy_chunk(state: &mut GameState, id: ChunkId) -> ActionResult {
    logged("buy_chunk", try_buy_chunk(state, id))
}

fn try_buy_chunk(state: &mut GameState, id: ChunkId) -> ActionResult {
    let chunk = *state.chunk(id).ok_or(ActionRejected::UnknownChunk(id))?;
    if chunk.is_owned {
        return Err(ActionRejected::ChunkOwned(id));
    }
    if !state.is_chunk_available(id) {
        return Err(ActionRejected::ChunkNotAdjacent(id));
    }
    ensure_coins(state, chunk.cost)?;

    state.coins -= chunk.cost;
    for owned in state.chunks.iter_mut().filter(|chunk| chunk.id == id) {
        owned.is_owned = true;
    }
    for tile in state.tiles.iter_mut().filter(|tile| tile.chunk == id) {
        tile.is_locked = false;
    }
    Ok(())
}

pub(crate) fn buy_seeds(state: &mut GameState, crop: CropKind, quantity: u32) -> ActionResult {
    logged("buy_seeds", try_buy_seeds(state, crop, quantity))
}

fn try_buy_seeds(state: &mut GameState, crop: CropKind, quantity: u32) -> ActionResult {
    if quantity == 0 {
        return Err(ActionRejected::ZeroQuantity);
    }
    let def = crop.def();
    ensure_level(state, def.unlock_level)?;
    let total_cost = def.seed_cost.saturating_mul(quantity);
    ensure_coins(state, total_cost)?;

    let capacity = seed_capacity(state);
    state.inventory.try_add_seeds(crop, quantity, capacity)?;
    state.coins -= total_cost;
    Ok(())
}

pub(crate) fn buy_tool(state: &mut GameState, tool: ToolKind) -> ActionResult {
    logged("buy_tool", try_buy_tool(state, tool))
}

fn try_buy_tool(state: &mut GameState, tool: ToolKind) -> ActionResult {
    if state.owns_tool(tool) {
        return Err(ActionRejected::ToolOwned(tool));
    }
    let def = tool.def();
    ensure_level(state, def.unlock_level)?;
    ensure_coins(state, def.cost)?;

    state.coins -= def.cost;
    state.owned_tools.push(tool);
    Ok(())
}

pub(crate) fn sell_food(state: &mut GameState, food: FoodKind, quantity: u32) -> ActionResult {
    logged("sell_food", try_sell_food(state, food, quantity))
}

fn try_sell_food(state: &mut GameState, food: FoodKind, quantity: u32) -> ActionResult {
    if quantity == 0 {
        return Err(ActionRejected::ZeroQuantity);
    }
    let value = food.sell_value().ok_or(ActionRejected::NotSellable(food))?;
    if !state.inventory.take_food(food, quantity) {
        return Err(ActionRejected::NotEnoughProduce(food));
    }
    state.coins = state.coins.saturating_add(value.saturating_mul(quantity));
    Ok(())
}

pub(crate) fn select_tool(state: &mut GameState, tool: Tool) -> ActionResult {
    logged("select_tool", try_select_tool(state, tool))
}

fn try_select_tool(state: &mut GameState, tool: Tool) -> ActionResult {
    if let Some(required) = tool.required_tool() {
        if !state.owns_tool(required) {
            return Err(ActionRejected::MissingTool(required));
        }
    }
    state.selected_tool = tool;
    Ok(())
}

fn unlocked_tile_index(state: &GameState, x: i32, z: i32) -> Result<usize, ActionRejected> {
    let index = state
        .tile_index(x, z)
        .ok_or(ActionRejected::NoTile { x, z })?;
    if state.tiles[index].is_locked {
        return Err(ActionRejected::Locked);
    }
    Ok(index)
}

fn tree_index(state: &GameState, x: i32, z: i32) -> Result<usize, ActionRejected> {
    state
        .placeable_index(x, z)
        .filter(|index| matches!(state.placeables[*index].object, PlaceableData::Tree(_)))
        .ok_or(ActionRejected::NoTree)
}

fn ensure_placeable_site(state: &GameState, x: i32, z: i32) -> ActionResult {
    if (x as f32).abs() < HUT_ZONE_HALF_EXTENT && (z as f32).abs() < HUT_ZONE_HALF_EXTENT {
        return Err(ActionRejected::HutZone);
    }
    let index = unlocked_tile_index(state, x, z)?;
    let tile = &state.tiles[index];
    if tile.is_plowed || tile.crop.is_some() || state.placeable_index(x, z).is_some() {
        return Err(ActionRejected::Occupied);
    }
    Ok(())
}

fn ensure_level(state: &GameState, required: u32) -> ActionResult {
    if state.level < required {
        return Err(ActionRejected::LevelTooLow { required });
    }
    Ok(())
}

fn ensure_coins(state: &GameState, needed: u32) -> ActionResult {
    if state.coins < needed {
        return Err(ActionRejected::NotEnoughCoins {
            needed,
            have: state.coins,
        });
    }
    Ok(())
}
