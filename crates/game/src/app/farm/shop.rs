//! One-key shop trades driven by the hotbar selection.

use super::actions::{buy_seeds, buy_tool, logged, sell_food, ActionRejected, ActionResult};
use super::definitions::{CropKind, ToolKind};
use super::state::GameState;
use super::tools::Tool;

fn selected_crop(state: &GameState) -> Result<CropKind, ActionRejected> {
    match state.selected_tool {
        Tool::Plant(crop) => Ok(crop),
        _ => Err(ActionRejected::NoCropSelected),
    }
}

/// Buys one seed of the crop currently selected in the hotbar.
pub(crate) fn buy_selected_seed(state: &mut GameState) -> ActionResult {
    match selected_crop(state) {
        Ok(crop) => buy_seeds(state, crop, 1),
        Err(rejection) => logged("buy_seeds", Err(rejection)),
    }
}

/// Sells one unit of the selected crop's produce.
pub(crate) fn sell_selected_produce(state: &mut GameState) -> ActionResult {
    match selected_crop(state) {
        Ok(crop) => sell_food(state, crop.food(), 1),
        Err(rejection) => logged("sell_food", Err(rejection)),
    }
}

/// Buys the cheapest tool not owned yet.
pub(crate) fn buy_next_tool(state: &mut GameState) -> ActionResult {
    let next = ToolKind::BY_COST
        .into_iter()
        .find(|tool| !state.owns_tool(*tool));
    match next {
        Some(tool) => buy_tool(state, tool),
        None => logged("buy_tool", Err(ActionRejected::AllToolsOwned)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_purchase_follows_the_selected_crop() {
        let mut state = GameState::initial(0);
        state.selected_tool = Tool::Plant(CropKind::Carrot);

        buy_selected_seed(&mut state).expect("bought");

        assert_eq!(state.inventory.seed_count(CropKind::Carrot), 1);
        assert_eq!(state.coins, 5000 - CropKind::Carrot.def().seed_cost);
    }

    #[test]
    fn trades_without_a_crop_selected_are_rejected() {
        let mut state = GameState::initial(0);
        let before = state.clone();

        assert_eq!(
            buy_selected_seed(&mut state),
            Err(ActionRejected::NoCropSelected)
        );
        assert_eq!(
            sell_selected_produce(&mut state),
            Err(ActionRejected::NoCropSelected)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn selling_needs_produce_of_the_selected_crop() {
        let mut state = GameState::initial(0);
        state.selected_tool = Tool::Plant(CropKind::Wheat);

        assert_eq!(
            sell_selected_produce(&mut state),
            Err(ActionRejected::NotEnoughProduce(CropKind::Wheat.food()))
        );
    }

    #[test]
    fn tools_are_bought_cheapest_first_until_all_owned() {
        let mut state = GameState::initial(0);

        buy_next_tool(&mut state).expect("watering can");
        assert!(state.owns_tool(ToolKind::WateringCan));
        buy_next_tool(&mut state).expect("scythe");
        assert!(state.owns_tool(ToolKind::Scythe));

        assert_eq!(buy_next_tool(&mut state), Err(ActionRejected::AllToolsOwned));
        assert_eq!(state.coins, 5000 - 50 - 150);
    }
}
