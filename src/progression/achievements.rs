//! Achievement definitions and unlock bookkeeping.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::skills::Skills;

pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points: u32,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_harvest",
        name: "First Harvest",
        description: "Harvest your first crop",
        points: 10,
    },
    AchievementDef {
        id: "master_farmer",
        name: "Master Farmer",
        description: "Reach level 10 in Farming",
        points: 50,
    },
    AchievementDef {
        id: "trading_master",
        name: "Trading Master",
        description: "Complete 50 successful trades",
        points: 50,
    },
    AchievementDef {
        id: "comic_creator",
        name: "Comic Creator",
        description: "Generate 5 unique comic panels",
        points: 25,
    },
];

pub const MASTER_FARMER_LEVEL: u64 = 10;
pub const TRADING_MASTER_TRADES: u64 = 50;
pub const COMIC_CREATOR_PANELS: u64 = 5;

pub fn achievement_def(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AchievementError {
    #[error("unknown achievement '{0}'")]
    Unknown(String),
}

/// Unlocked ids plus the counters the automatic unlocks are checked against.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    pub unlocked: Vec<String>,
    pub harvests: u64,
    pub trades: u64,
    /// Distinct panels generated. Regenerating a seed does not count twice.
    pub panels_generated: u64,
    #[serde(default)]
    pub panel_ids: HashSet<String>,
}

impl Achievements {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Marks an achievement complete. `Ok(false)` when it already was.
    pub fn complete(&mut self, id: &str) -> Result<bool, AchievementError> {
        let def = achievement_def(id).ok_or_else(|| AchievementError::Unknown(id.to_string()))?;
        if self.is_unlocked(def.id) {
            return Ok(false);
        }
        self.unlocked.push(def.id.to_string());
        Ok(true)
    }

    /// Returns whether the panel id was new.
    pub fn record_panel(&mut self, panel_id: &str) -> bool {
        if !self.panel_ids.insert(panel_id.to_string()) {
            return false;
        }
        self.panels_generated = self.panel_ids.len() as u64;
        true
    }

    pub fn points(&self) -> u32 {
        self.unlocked
            .iter()
            .filter_map(|id| achievement_def(id))
            .map(|def| def.points)
            .sum()
    }

    /// Ids whose conditions now hold but are not yet unlocked.
    pub fn pending_unlocks(&self, skills: &Skills) -> Vec<&'static str> {
        ACHIEVEMENTS
            .iter()
            .filter(|def| !self.is_unlocked(def.id))
            .filter(|def| match def.id {
                "first_harvest" => self.harvests >= 1,
                "master_farmer" => skills.farming.level() >= MASTER_FARMER_LEVEL,
                "trading_master" => self.trades >= TRADING_MASTER_TRADES,
                "comic_creator" => self.panels_generated >= COMIC_CREATOR_PANELS,
                _ => false,
            })
            .map(|def| def.id)
            .collect()
    }
}
