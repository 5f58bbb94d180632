//! Shared resources, events, and states for Farming Comic Game.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod grid;
mod ledger;

pub use grid::*;
pub use ledger::*;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// CROPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Wheat,
    Corn,
    Tomato,
    Potato,
}

impl CropType {
    pub const ALL: [CropType; 4] = [
        CropType::Wheat,
        CropType::Corn,
        CropType::Tomato,
        CropType::Potato,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CropType::Wheat => "wheat",
            CropType::Corn => "corn",
            CropType::Tomato => "tomato",
            CropType::Potato => "potato",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Corn => "Corn",
            CropType::Tomato => "Tomato",
            CropType::Potato => "Potato",
        }
    }
}

/// Growth stages in planting order. `advance` saturates at `HarvestReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Seed,
    Sprout,
    Mature,
    HarvestReady,
}

impl GrowthStage {
    pub fn next(self) -> Self {
        match self {
            GrowthStage::Seed => GrowthStage::Sprout,
            GrowthStage::Sprout => GrowthStage::Mature,
            GrowthStage::Mature => GrowthStage::HarvestReady,
            GrowthStage::HarvestReady => GrowthStage::HarvestReady,
        }
    }

    pub fn is_ready(self) -> bool {
        self == GrowthStage::HarvestReady
    }

    pub fn index(self) -> u8 {
        match self {
            GrowthStage::Seed => 0,
            GrowthStage::Sprout => 1,
            GrowthStage::Mature => 2,
            GrowthStage::HarvestReady => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropInstance {
    pub crop: CropType,
    pub stage: GrowthStage,
}

impl CropInstance {
    pub fn planted(crop: CropType) -> Self {
        Self {
            crop,
            stage: GrowthStage::Seed,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ECONOMY TABLE & FARM CONFIG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropEconomy {
    pub seed_cost: u32,
    pub harvest_reward: u32,
}

/// Static per-crop prices. Read-only once the game is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyTable {
    pub crops: HashMap<CropType, CropEconomy>,
}

impl EconomyTable {
    pub fn get(&self, crop: CropType) -> Option<CropEconomy> {
        self.crops.get(&crop).copied()
    }

    pub fn seed_cost(&self, crop: CropType) -> u32 {
        self.get(crop).map(|e| e.seed_cost).unwrap_or(0)
    }

    pub fn harvest_reward(&self, crop: CropType) -> u32 {
        self.get(crop).map(|e| e.harvest_reward).unwrap_or(0)
    }
}

impl Default for EconomyTable {
    fn default() -> Self {
        FarmConfig::standard().economy
    }
}

/// The two rule variations the farm supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FarmPolicy {
    /// Harvesting gives one seed of the same crop back.
    pub harvest_returns_seed: bool,
    /// Planting also debits `seed_cost` from money.
    pub planting_costs_money: bool,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmConfig {
    pub rows: usize,
    pub cols: usize,
    pub starting_money: u32,
    pub starting_seeds: HashMap<CropType, u32>,
    pub economy: EconomyTable,
    pub policy: FarmPolicy,
}

impl FarmConfig {
    /// 5×5 farm, free planting, harvest returns a seed.
    pub fn standard() -> Self {
        Self {
            rows: 5,
            cols: 5,
            starting_money: 1000,
            starting_seeds: HashMap::from([
                (CropType::Wheat, 10),
                (CropType::Corn, 8),
                (CropType::Tomato, 5),
                (CropType::Potato, 7),
            ]),
            economy: EconomyTable {
                crops: HashMap::from([
                    (CropType::Wheat, CropEconomy { seed_cost: 5, harvest_reward: 20 }),
                    (CropType::Corn, CropEconomy { seed_cost: 6, harvest_reward: 25 }),
                    (CropType::Tomato, CropEconomy { seed_cost: 7, harvest_reward: 35 }),
                    (CropType::Potato, CropEconomy { seed_cost: 8, harvest_reward: 30 }),
                ]),
            },
            policy: FarmPolicy {
                harvest_returns_seed: true,
                planting_costs_money: false,
            },
        }
    }

    /// 4×4 farm where planting costs money and harvest only pays out.
    pub fn compact() -> Self {
        Self {
            rows: 4,
            cols: 4,
            starting_money: 100,
            starting_seeds: CropType::ALL.iter().map(|&c| (c, 10)).collect(),
            economy: EconomyTable {
                crops: HashMap::from([
                    (CropType::Wheat, CropEconomy { seed_cost: 5, harvest_reward: 20 }),
                    (CropType::Corn, CropEconomy { seed_cost: 7, harvest_reward: 25 }),
                    (CropType::Tomato, CropEconomy { seed_cost: 6, harvest_reward: 22 }),
                    (CropType::Potato, CropEconomy { seed_cost: 8, harvest_reward: 30 }),
                ]),
            },
            policy: FarmPolicy {
                harvest_returns_seed: false,
                planting_costs_money: true,
            },
        }
    }

    pub fn starting_ledger(&self) -> ResourceLedger {
        ResourceLedger::new(self.starting_money, self.starting_seeds.clone())
    }

    pub fn empty_grid(&self) -> FarmGrid {
        FarmGrid::new(self.rows, self.cols)
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Grid + ledger pair. This is the opaque game state handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub grid: FarmGrid,
    pub ledger: ResourceLedger,
}

// ═══════════════════════════════════════════════════════════════════════
// FARM EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmAction {
    Plant(CropType),
    /// Water the crop, advancing it one growth stage.
    Water,
    Harvest,
}

/// UI request against one cell. All farm actions travel on this single event
/// so they are applied strictly in the order they were sent.
#[derive(Event, Debug, Clone)]
pub struct FarmActionEvent {
    pub row: usize,
    pub col: usize,
    pub action: FarmAction,
}

impl FarmActionEvent {
    pub fn plant(row: usize, col: usize, crop: CropType) -> Self {
        Self { row, col, action: FarmAction::Plant(crop) }
    }

    pub fn water(row: usize, col: usize) -> Self {
        Self { row, col, action: FarmAction::Water }
    }

    pub fn harvest(row: usize, col: usize) -> Self {
        Self { row, col, action: FarmAction::Harvest }
    }
}

/// Throw away the current farm and start again from `FarmConfig`.
#[derive(Event, Debug, Clone, Default)]
pub struct NewFarmEvent;

/// Sent whenever a cell's contents change. The presentation layer re-renders from this.
#[derive(Event, Debug, Clone)]
pub struct FarmChangedEvent {
    pub row: usize,
    pub col: usize,
    pub cell: Cell,
}

#[derive(Event, Debug, Clone)]
pub struct CropPlantedEvent {
    pub row: usize,
    pub col: usize,
    pub crop: CropType,
}

#[derive(Event, Debug, Clone)]
pub struct CropWateredEvent {
    pub row: usize,
    pub col: usize,
    pub crop: CropType,
    pub stage: GrowthStage,
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub row: usize,
    pub col: usize,
    pub crop: CropType,
    pub reward: u32,
    pub seed_returned: bool,
}

/// Sent after any mutation of the ResourceLedger.
#[derive(Event, Debug, Clone)]
pub struct LedgerChangedEvent {
    pub money: u32,
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CROSS-DOMAIN NOTIFICATIONS
// ═══════════════════════════════════════════════════════════════════════

/// A comic panel was generated and pushed into the panel history.
#[derive(Event, Debug, Clone)]
pub struct ComicPanelGeneratedEvent {
    pub panel_id: String,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Purchase,
    Refund,
}

/// A market purchase or refund went through.
#[derive(Event, Debug, Clone)]
pub struct TradeCompletedEvent {
    pub item_id: String,
    pub price: u32,
    pub kind: TradeKind,
}

/// Experience earned in one of the tracked skills.
#[derive(Event, Debug, Clone)]
pub struct GainExperienceEvent {
    pub skill: SkillKind,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Farming,
    Crafting,
    Trading,
}

impl SkillKind {
    pub const ALL: [SkillKind; 3] = [SkillKind::Farming, SkillKind::Crafting, SkillKind::Trading];

    pub fn name(self) -> &'static str {
        match self {
            SkillKind::Farming => "Farming",
            SkillKind::Crafting => "Crafting",
            SkillKind::Trading => "Trading",
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct AchievementUnlockedEvent {
    pub achievement_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// FARM LEVELS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmLevelDef {
    pub level: u32,
    pub title: &'static str,
    pub required_experience: u64,
    pub rewards: &'static [&'static str],
}

/// Ascending by `required_experience`.
pub const FARM_LEVELS: &[FarmLevelDef] = &[
    FarmLevelDef {
        level: 1,
        title: "Novice Farmer",
        required_experience: 0,
        rewards: &["Basic Seeds", "Small Farm Plot"],
    },
    FarmLevelDef {
        level: 2,
        title: "Crop Apprentice",
        required_experience: 100,
        rewards: &["Advanced Seeds", "Farm Expansion"],
    },
    FarmLevelDef {
        level: 3,
        title: "Farm Master",
        required_experience: 500,
        rewards: &["Rare Crops", "Advanced Tools"],
    },
];

/// Highest level whose requirement `experience` meets.
pub fn farm_level_for(experience: u64) -> &'static FarmLevelDef {
    FARM_LEVELS
        .iter()
        .rev()
        .find(|def| experience >= def.required_experience)
        .unwrap_or(&FARM_LEVELS[0])
}

// ═══════════════════════════════════════════════════════════════════════
// USER RECORD
// ═══════════════════════════════════════════════════════════════════════

/// The persisted player profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub farm_level: u32,
    pub experience: u64,
    pub achievements: Vec<String>,
    pub resources: ResourceLedger,
    /// Seconds since the Unix epoch.
    pub last_login: u64,
}

impl User {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }
}

/// The logged-in player, if any.
#[derive(Resource, Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// Persist the session user. The ledger is copied into the record first.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveUserProgressEvent;

/// Replace the session user with the stored record, when one exists.
#[derive(Event, Debug, Clone)]
pub struct LoadUserProgressEvent {
    pub user_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct UserProgressSavedEvent {
    pub success: bool,
}

#[derive(Event, Debug, Clone)]
pub struct UserProgressLoadedEvent {
    pub user_id: String,
    pub found: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

/// Seconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn current_timestamp() -> u64 {
    current_timestamp_millis() / 1000
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn current_timestamp_millis() -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_stage_saturates() {
        let mut stage = GrowthStage::Seed;
        for _ in 0..10 {
            stage = stage.next();
        }
        assert!(stage.is_ready());
        assert_eq!(stage.index(), 3);
    }

    #[test]
    fn test_farm_level_table() {
        assert_eq!(farm_level_for(0).title, "Novice Farmer");
        assert_eq!(farm_level_for(99).level, 1);
        assert_eq!(farm_level_for(100).level, 2);
        assert_eq!(farm_level_for(499).title, "Crop Apprentice");
        assert_eq!(farm_level_for(u64::MAX).level, 3);
    }

    #[test]
    fn test_presets_cover_every_crop() {
        for config in [FarmConfig::standard(), FarmConfig::compact()] {
            for crop in CropType::ALL {
                assert!(config.economy.get(crop).is_some());
                assert!(config.starting_seeds.contains_key(&crop));
            }
        }
    }
}
