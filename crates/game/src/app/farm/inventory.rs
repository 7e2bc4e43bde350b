use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::actions::ActionRejected;
use super::definitions::{BuildingKind, CropKind, FoodKind};
use super::state::GameState;

pub(crate) const BASE_FOOD_CAPACITY: u32 = 20;
pub(crate) const BASE_SEED_CAPACITY: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Inventory {
    pub(crate) seeds: BTreeMap<CropKind, u32>,
    pub(crate) food: BTreeMap<FoodKind, u32>,
    pub(crate) wood: u32,
}

impl Inventory {
    pub(crate) fn starting(wood: u32) -> Self {
        Self {
            wood,
            ..Self::default()
        }
    }

    pub(crate) fn seed_count(&self, kind: CropKind) -> u32 {
        self.seeds.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn food_count(&self, kind: FoodKind) -> u32 {
        self.food.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn seed_total(&self) -> u32 {
        self.seeds.values().sum()
    }

    pub(crate) fn food_total(&self) -> u32 {
        self.food.values().sum()
    }

    /// All-or-nothing: either every unit fits or nothing changes.
    pub(crate) fn try_add_food(
        &mut self,
        kind: FoodKind,
        amount: u32,
        capacity: u32,
    ) -> Result<(), ActionRejected> {
        ensure_room(self.food_total(), amount, capacity)?;
        *self.food.entry(kind).or_insert(0) += amount;
        Ok(())
    }

    pub(crate) fn try_add_seeds(
        &mut self,
        kind: CropKind,
        amount: u32,
        capacity: u32,
    ) -> Result<(), ActionRejected> {
        ensure_room(self.seed_total(), amount, capacity)?;
        *self.seeds.entry(kind).or_insert(0) += amount;
        Ok(())
    }

    pub(crate) fn take_seed(&mut self, kind: CropKind) -> bool {
        take(&mut self.seeds, kind, 1)
    }

    pub(crate) fn take_food(&mut self, kind: FoodKind, amount: u32) -> bool {
        take(&mut self.food, kind, amount)
    }
}

fn ensure_room(current: u32, amount: u32, capacity: u32) -> Result<(), ActionRejected> {
    match current.checked_add(amount) {
        Some(total) if total <= capacity => Ok(()),
        _ => Err(ActionRejected::InventoryFull {
            needed: amount,
            free: capacity.saturating_sub(current),
        }),
    }
}

fn take<K: Ord>(counts: &mut BTreeMap<K, u32>, kind: K, amount: u32) -> bool {
    let Some(count) = counts.get_mut(&kind) else {
        return false;
    };
    if *count < amount {
        return false;
    }
    *count -= amount;
    if *count == 0 {
        counts.remove(&kind);
    }
    true
}

pub(crate) fn food_capacity(state: &GameState) -> u32 {
    BASE_FOOD_CAPACITY + storage_bonus(state, BuildingKind::Barn)
}

pub(crate) fn seed_capacity(state: &GameState) -> u32 {
    BASE_SEED_CAPACITY + storage_bonus(state, BuildingKind::SeedStorage)
}

fn storage_bonus(state: &GameState, kind: BuildingKind) -> u32 {
    state
        .placeables
        .iter()
        .filter(|placeable| placeable.object.building_kind() == Some(kind))
        .map(|_| kind.def().storage_bonus)
        .sum()
}
