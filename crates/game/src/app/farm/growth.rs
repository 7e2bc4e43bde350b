use super::definitions::{BuildingKind, ToolKind};
use super::state::{GameState, PlaceableData};

const WATERING_CAN_MULTIPLIER: f32 = 1.2;
const WELL_MULTIPLIER: f32 = 1.1;

pub(crate) fn growth_multiplier(state: &GameState) -> f32 {
    let mut multiplier = 1.0;
    if state.owns_tool(ToolKind::WateringCan) {
        multiplier *= WATERING_CAN_MULTIPLIER;
    }
    if state.has_building(BuildingKind::Well) {
        multiplier *= WELL_MULTIPLIER;
    }
    multiplier
}

/// Grows crops by `dt_secs` scaled by the growth multiplier and trees by
/// plain `dt_secs`, then stamps `last_update_ms`. Returns how many stage
/// transitions happened.
pub(crate) fn advance_growth(state: &mut GameState, dt_secs: f32, now_ms: u64) -> u32 {
    let crop_dt = dt_secs * growth_multiplier(state);
    let mut advanced = 0;
    for crop in state.tiles.iter_mut().filter_map(|tile| tile.crop.as_mut()) {
        advanced += crop.growth.fast_forward(crop_dt);
    }
    for placeable in &mut state.placeables {
        if let PlaceableData::Tree(tree) = &mut placeable.object {
            advanced += tree.growth.fast_forward(dt_secs);
        }
    }
    state.last_update_ms = now_ms;
    advanced
}

/// Applies the wall-clock time elapsed since the last growth step.
pub(crate) fn catch_up(state: &mut GameState, now_ms: u64) -> u32 {
    let elapsed_ms = now_ms.saturating_sub(state.last_update_ms);
    advance_growth(state, elapsed_ms as f32 / 1000.0, now_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::farm::actions::place_tree;
    use crate::app::farm::definitions::{CropKind, TreeKind};
    use crate::app::farm::state::Crop;

    fn with_crop(kind: CropKind) -> GameState {
        let mut state = GameState::initial(0);
        let index = state.tile_index(2, 2).expect("tile");
        state.tiles[index].is_plowed = true;
        state.tiles[index].crop = Some(Crop::new(kind, 0));
        state
    }

    fn progress_at(state: &GameState) -> f32 {
        state
            .tile(2, 2)
            .and_then(|tile| tile.crop)
            .map(|crop| crop.progress())
            .expect("crop")
    }

    #[test]
    fn multiplier_stacks_watering_can_and_well() {
        let mut state = GameState::initial(0);
        assert_eq!(growth_multiplier(&state), 1.0);

        state.owned_tools.push(ToolKind::WateringCan);
        state.placeables.push(crate::app::farm::state::Placeable {
            x: 3,
            z: 3,
            object: PlaceableData::Well { built_at_ms: 0 },
        });

        assert!((growth_multiplier(&state) - 1.32).abs() < 0.0001);
    }

    #[test]
    fn wheat_matures_after_twenty_seconds() {
        let mut state = with_crop(CropKind::Wheat);

        assert_eq!(advance_growth(&mut state, 20.0, 20_000), 2);

        assert_eq!(progress_at(&state), 1.0);
        assert_eq!(state.last_update_ms, 20_000);
    }

    #[test]
    fn many_small_steps_match_one_large_step() {
        let mut stepped = with_crop(CropKind::Tomato);
        let mut jumped = with_crop(CropKind::Tomato);

        for tick in 1..=50u64 {
            advance_growth(&mut stepped, 0.25, tick * 250);
        }
        advance_growth(&mut jumped, 12.5, 12_500);

        assert!((progress_at(&stepped) - progress_at(&jumped)).abs() < 0.001);
    }

    #[test]
    fn bonuses_speed_up_crops_but_not_trees() {
        let mut state = with_crop(CropKind::Wheat);
        state.owned_tools.push(ToolKind::WateringCan);
        place_tree(&mut state, 4, 4, TreeKind::Pine, 0).expect("placed");

        advance_growth(&mut state, 10.0, 10_000);

        let tree_progress = match state.placeables[0].object {
            PlaceableData::Tree(tree) => tree.progress(),
            _ => panic!("expected a tree"),
        };
        assert!((tree_progress - 10.0 / 60.0).abs() < 0.0001, "{tree_progress}");
        assert!((progress_at(&state) - 0.6).abs() < 0.0001);
    }

    #[test]
    fn catch_up_uses_time_since_last_update() {
        let mut state = with_crop(CropKind::Wheat);
        state.last_update_ms = 1_000;

        catch_up(&mut state, 6_000);

        assert!((progress_at(&state) - 0.25).abs() < 0.0001);
        assert_eq!(state.last_update_ms, 6_000);
    }
}
