use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CropKind {
    Wheat,
    Carrot,
    Potato,
    Tomato,
    Corn,
    Pumpkin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ToolKind {
    Hoe,
    WateringCan,
    Scythe,
    Axe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TreeKind {
    Pine,
    Oak,
    Apple,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BuildingKind {
    SeedStorage,
    Barn,
    Well,
}

/// Anything that sits in the produce store: harvested crops and picked fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FoodKind {
    Wheat,
    Carrot,
    Potato,
    Tomato,
    Corn,
    Pumpkin,
    Apple,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CropDef {
    pub(crate) name: &'static str,
    pub(crate) seed_cost: u32,
    pub(crate) growth_seconds: f32,
    pub(crate) harvest_value: u32,
    pub(crate) harvest_xp: u32,
    pub(crate) unlock_level: u32,
    pub(crate) max_stage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ToolDef {
    pub(crate) name: &'static str,
    pub(crate) cost: u32,
    pub(crate) unlock_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FruitDef {
    pub(crate) interval_seconds: f32,
    pub(crate) yield_count: u32,
    pub(crate) food: FoodKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TreeDef {
    pub(crate) name: &'static str,
    pub(crate) cost: u32,
    pub(crate) growth_seconds: f32,
    pub(crate) wood_yield: u32,
    pub(crate) unlock_level: u32,
    pub(crate) fruit: Option<FruitDef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BuildingDef {
    pub(crate) name: &'static str,
    pub(crate) wood_cost: u32,
    pub(crate) coin_cost: u32,
    pub(crate) unlock_level: u32,
    pub(crate) storage_bonus: u32,
}

pub(crate) const FRUIT_HARVEST_XP: u32 = 10;
pub(crate) const CHOP_XP: u32 = 15;
const TREE_GROWTH_STAGES: u32 = 2;

impl CropKind {
    pub(crate) const ALL: [CropKind; 6] = [
        CropKind::Wheat,
        CropKind::Carrot,
        CropKind::Potato,
        CropKind::Tomato,
        CropKind::Corn,
        CropKind::Pumpkin,
    ];

    pub(crate) const fn def(self) -> CropDef {
        match self {
            CropKind::Wheat => CropDef {
                name: "Wheat",
                seed_cost: 10,
                growth_seconds: 20.0,
                harvest_value: 25,
                harvest_xp: 5,
                unlock_level: 1,
                max_stage: 2,
            },
            CropKind::Carrot => CropDef {
                name: "Carrot",
                seed_cost: 15,
                growth_seconds: 25.0,
                harvest_value: 35,
                harvest_xp: 8,
                unlock_level: 1,
                max_stage: 2,
            },
            CropKind::Potato => CropDef {
                name: "Potato",
                seed_cost: 20,
                growth_seconds: 30.0,
                harvest_value: 45,
                harvest_xp: 10,
                unlock_level: 1,
                max_stage: 2,
            },
            CropKind::Tomato => CropDef {
                name: "Tomato",
                seed_cost: 30,
                growth_seconds: 35.0,
                harvest_value: 60,
                harvest_xp: 15,
                unlock_level: 3,
                max_stage: 3,
            },
            CropKind::Corn => CropDef {
                name: "Corn",
                seed_cost: 40,
                growth_seconds: 40.0,
                harvest_value: 80,
                harvest_xp: 20,
                unlock_level: 5,
                max_stage: 3,
            },
            CropKind::Pumpkin => CropDef {
                name: "Pumpkin",
                seed_cost: 60,
                growth_seconds: 50.0,
                harvest_value: 120,
                harvest_xp: 30,
                unlock_level: 8,
                max_stage: 3,
            },
        }
    }

    pub(crate) const fn food(self) -> FoodKind {
        match self {
            CropKind::Wheat => FoodKind::Wheat,
            CropKind::Carrot => FoodKind::Carrot,
            CropKind::Potato => FoodKind::Potato,
            CropKind::Tomato => FoodKind::Tomato,
            CropKind::Corn => FoodKind::Corn,
            CropKind::Pumpkin => FoodKind::Pumpkin,
        }
    }
}

impl ToolKind {
    /// Shop order, cheapest first.
    pub(crate) const BY_COST: [ToolKind; 4] = [
        ToolKind::Hoe,
        ToolKind::WateringCan,
        ToolKind::Axe,
        ToolKind::Scythe,
    ];

    pub(crate) const fn def(self) -> ToolDef {
        match self {
            ToolKind::Hoe => ToolDef {
                name: "Hoe",
                cost: 0,
                unlock_level: 1,
            },
            ToolKind::WateringCan => ToolDef {
                name: "Watering Can",
                cost: 50,
                unlock_level: 2,
            },
            ToolKind::Scythe => ToolDef {
                name: "Scythe",
                cost: 150,
                unlock_level: 4,
            },
            ToolKind::Axe => ToolDef {
                name: "Axe",
                cost: 100,
                unlock_level: 3,
            },
        }
    }
}

impl TreeKind {
    pub(crate) const fn def(self) -> TreeDef {
        match self {
            TreeKind::Pine => TreeDef {
                name: "Pine",
                cost: 50,
                growth_seconds: 60.0,
                wood_yield: 10,
                unlock_level: 2,
                fruit: None,
            },
            TreeKind::Oak => TreeDef {
                name: "Oak",
                cost: 80,
                growth_seconds: 90.0,
                wood_yield: 15,
                unlock_level: 4,
                fruit: None,
            },
            TreeKind::Apple => TreeDef {
                name: "Apple Tree",
                cost: 120,
                growth_seconds: 120.0,
                wood_yield: 8,
                unlock_level: 5,
                fruit: Some(FruitDef {
                    interval_seconds: 40.0,
                    yield_count: 3,
                    food: FoodKind::Apple,
                }),
            },
            TreeKind::Orange => TreeDef {
                name: "Orange Tree",
                cost: 150,
                growth_seconds: 120.0,
                wood_yield: 8,
                unlock_level: 6,
                fruit: Some(FruitDef {
                    interval_seconds: 50.0,
                    yield_count: 4,
                    food: FoodKind::Orange,
                }),
            },
        }
    }

    /// Fruit trees carry one extra terminal stage in which they bear fruit.
    pub(crate) const fn max_stage(self) -> u32 {
        match self.def().fruit {
            Some(_) => TREE_GROWTH_STAGES + 1,
            None => TREE_GROWTH_STAGES,
        }
    }
}

impl BuildingKind {
    pub(crate) const fn def(self) -> BuildingDef {
        match self {
            BuildingKind::SeedStorage => BuildingDef {
                name: "Seed Storage",
                wood_cost: 20,
                coin_cost: 100,
                unlock_level: 3,
                storage_bonus: 50,
            },
            BuildingKind::Barn => BuildingDef {
                name: "Barn",
                wood_cost: 50,
                coin_cost: 300,
                unlock_level: 5,
                storage_bonus: 100,
            },
            BuildingKind::Well => BuildingDef {
                name: "Well",
                wood_cost: 30,
                coin_cost: 200,
                unlock_level: 4,
                storage_bonus: 0,
            },
        }
    }
}

impl FoodKind {
    /// Only field crops have a market price; fruit is kept for later use.
    pub(crate) const fn sell_value(self) -> Option<u32> {
        match self.crop() {
            Some(crop) => Some(crop.def().harvest_value),
            None => None,
        }
    }

    pub(crate) const fn crop(self) -> Option<CropKind> {
        match self {
            FoodKind::Wheat => Some(CropKind::Wheat),
            FoodKind::Carrot => Some(CropKind::Carrot),
            FoodKind::Potato => Some(CropKind::Potato),
            FoodKind::Tomato => Some(CropKind::Tomato),
            FoodKind::Corn => Some(CropKind::Corn),
            FoodKind::Pumpkin => Some(CropKind::Pumpkin),
            FoodKind::Apple | FoodKind::Orange => None,
        }
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoodKind::Apple => "Apple",
            FoodKind::Orange => "Orange",
            _ => match self.crop() {
                Some(crop) => crop.def().name,
                None => "Produce",
            },
        };
        f.write_str(name)
    }
}
