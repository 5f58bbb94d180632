use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

/// What automatically advances a quest's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestObjective {
    /// One point per harvested crop.
    HarvestCrops,
    /// One point per crop type planted for the first time.
    PlantDistinctCrops,
    /// Harvest rewards, in money.
    EarnFromHarvests,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmQuest {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub reward: u32,
    pub difficulty: Difficulty,
    pub status: QuestStatus,
    pub progress: u32,
    pub target: u32,
    pub objective: QuestObjective,
}

impl FarmQuest {
    pub fn is_target_met(&self) -> bool {
        self.progress >= self.target
    }

    /// Progress as a fraction in 0.0..=1.0.
    pub fn fraction(&self) -> f32 {
        if self.target == 0 {
            return 1.0;
        }
        self.progress as f32 / self.target as f32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestRejection {
    #[error("no quest with id '{0}'")]
    UnknownQuest(String),
    #[error("quest '{id}' is {status:?}, only active quests can change")]
    NotActive { id: String, status: QuestStatus },
    #[error("quests can only move to completed or failed")]
    InvalidTarget,
    #[error("quest '{0}' is full")]
    Full(String),
    #[error("quest '{0}' is already completed")]
    AlreadyCompleted(String),
    #[error("quest '{0}' is not open for joining")]
    NotOpen(String),
    #[error("quest '{0}' has not started yet")]
    NotInProgress(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBoard {
    pub quests: Vec<FarmQuest>,
    /// Crop types already counted toward `PlantDistinctCrops`.
    pub planted_kinds: HashSet<CropType>,
}

impl Default for QuestBoard {
    fn default() -> Self {
        let quest = |id, title: &str, description: &str, reward, difficulty, progress, target, objective| FarmQuest {
            id,
            title: title.to_string(),
            description: description.to_string(),
            reward,
            difficulty,
            status: QuestStatus::Active,
            progress,
            target,
            objective,
        };
        Self {
            quests: vec![
                quest(1, "First Harvest", "Harvest your first crop", 50, Difficulty::Easy, 0, 1, QuestObjective::HarvestCrops),
                quest(
                    2,
                    "Crop Diversity",
                    "Plant 3 different types of crops",
                    100,
                    Difficulty::Medium,
                    1,
                    3,
                    QuestObjective::PlantDistinctCrops,
                ),
                quest(
                    3,
                    "Farm Tycoon",
                    "Earn $500 from selling crops",
                    250,
                    Difficulty::Hard,
                    200,
                    500,
                    QuestObjective::EarnFromHarvests,
                ),
            ],
            planted_kinds: HashSet::new(),
        }
    }
}

impl QuestBoard {
    pub fn get(&self, id: u32) -> Option<&FarmQuest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn by_status(&self, status: QuestStatus) -> impl Iterator<Item = &FarmQuest> {
        self.quests.iter().filter(move |q| q.status == status)
    }

    /// Adds `amount` to every active quest with this objective, clamped to
    /// its target. Returns the ids that reached their target on this call.
    pub fn record(&mut self, objective: QuestObjective, amount: u32) -> Vec<u32> {
        let mut reached = Vec::new();
        for quest in self
            .quests
            .iter_mut()
            .filter(|q| q.status == QuestStatus::Active && q.objective == objective)
        {
            let was_met = quest.is_target_met();
            quest.progress = quest.progress.saturating_add(amount).min(quest.target);
            if !was_met && quest.is_target_met() {
                reached.push(quest.id);
            }
        }
        reached
    }

    /// Counts a planting toward `PlantDistinctCrops` the first time each crop type is seen.
    pub fn record_planting(&mut self, crop: CropType) -> Vec<u32> {
        if self.planted_kinds.insert(crop) {
            self.record(QuestObjective::PlantDistinctCrops, 1)
        } else {
            Vec::new()
        }
    }

    /// Moves an active quest to `Completed` or `Failed`. Completing credits
    /// the reward; on any rejection board and ledger are untouched.
    pub fn set_status(
        &mut self,
        ledger: &mut ResourceLedger,
        id: u32,
        status: QuestStatus,
    ) -> Result<u32, QuestRejection> {
        if status == QuestStatus::Active {
            return Err(QuestRejection::InvalidTarget);
        }
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| QuestRejection::UnknownQuest(id.to_string()))?;
        if quest.status != QuestStatus::Active {
            return Err(QuestRejection::NotActive {
                id: id.to_string(),
                status: quest.status,
            });
        }

        let credited = match status {
            QuestStatus::Completed => {
                ledger.credit(quest.reward)?;
                quest.reward
            }
            _ => 0,
        };
        quest.status = status;
        Ok(credited)
    }
}
