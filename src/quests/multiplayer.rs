//! Local multiplayer quest board. Participant counts are local mock state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::board::{Difficulty, QuestRejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiplayerStatus {
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub coins: u32,
    pub experience: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub current: u32,
    pub max: u32,
}

impl Participants {
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplayerQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reward: QuestReward,
    pub participants: Participants,
    pub time_limit_minutes: u32,
    pub status: MultiplayerStatus,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplayerBoard {
    pub quests: Vec<MultiplayerQuest>,
}

impl Default for MultiplayerBoard {
    fn default() -> Self {
        let quest = |id: &str,
                     title: &str,
                     description: &str,
                     difficulty,
                     (coins, experience),
                     (current, max),
                     time_limit_minutes,
                     status| MultiplayerQuest {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            reward: QuestReward { coins, experience },
            participants: Participants { current, max },
            time_limit_minutes,
            status,
        };
        Self {
            quests: vec![
                quest(
                    "quest-1",
                    "Community Harvest",
                    "Collaborate to harvest 1000 magical crops across all farms",
                    Difficulty::Medium,
                    (500, 100),
                    (3, 10),
                    60,
                    MultiplayerStatus::Open,
                ),
                quest(
                    "quest-2",
                    "Comic Farm Story",
                    "Create a collaborative comic panel about farm adventures",
                    Difficulty::Hard,
                    (750, 200),
                    (5, 6),
                    120,
                    MultiplayerStatus::InProgress,
                ),
                quest(
                    "quest-3",
                    "Market Trade Challenge",
                    "Complete 50 unique trades in the farm market",
                    Difficulty::Easy,
                    (250, 50),
                    (1, 15),
                    30,
                    MultiplayerStatus::Open,
                ),
            ],
        }
    }
}

impl MultiplayerBoard {
    pub fn get(&self, id: &str) -> Option<&MultiplayerQuest> {
        self.quests.iter().find(|q| q.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut MultiplayerQuest, QuestRejection> {
        self.quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| QuestRejection::UnknownQuest(id.to_string()))
    }

    /// Adds one participant to an open quest. Filling the last slot moves it
    /// to in-progress.
    pub fn join(&mut self, id: &str) -> Result<MultiplayerStatus, QuestRejection> {
        let quest = self.get_mut(id)?;
        match quest.status {
            MultiplayerStatus::Completed => {
                return Err(QuestRejection::AlreadyCompleted(id.to_string()))
            }
            MultiplayerStatus::InProgress => return Err(QuestRejection::NotOpen(id.to_string())),
            MultiplayerStatus::Open => {}
        }
        if quest.participants.is_full() {
            return Err(QuestRejection::Full(id.to_string()));
        }
        quest.participants.current += 1;
        if quest.participants.is_full() {
            quest.status = MultiplayerStatus::InProgress;
        }
        Ok(quest.status)
    }

    /// The reward `complete` would pay, without changing anything.
    pub fn completion_reward(&self, id: &str) -> Result<QuestReward, QuestRejection> {
        let quest = self
            .get(id)
            .ok_or_else(|| QuestRejection::UnknownQuest(id.to_string()))?;
        match quest.status {
            MultiplayerStatus::InProgress => Ok(quest.reward),
            MultiplayerStatus::Completed => Err(QuestRejection::AlreadyCompleted(id.to_string())),
            MultiplayerStatus::Open => Err(QuestRejection::NotInProgress(id.to_string())),
        }
    }

    /// Only in-progress quests can complete. Completed is terminal.
    pub fn complete(&mut self, id: &str) -> Result<QuestReward, QuestRejection> {
        let reward = self.completion_reward(id)?;
        let quest = self.get_mut(id)?;
        quest.status = MultiplayerStatus::Completed;
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_fills_and_starts_quest() {
        let mut board = MultiplayerBoard::default();
        for _ in 0..6 {
            assert_eq!(board.join("quest-1"), Ok(MultiplayerStatus::Open));
        }
        assert_eq!(board.join("quest-1"), Ok(MultiplayerStatus::InProgress));
        assert_eq!(board.get("quest-1").map(|q| q.participants.current), Some(10));
        assert_eq!(board.join("quest-1"), Err(QuestRejection::NotOpen("quest-1".into())));
        assert_eq!(board.get("quest-1").map(|q| q.participants.current), Some(10));
    }

    #[test]
    fn test_join_below_capacity_keeps_status() {
        let mut board = MultiplayerBoard::default();
        assert_eq!(board.join("quest-1"), Ok(MultiplayerStatus::Open));
        assert_eq!(board.get("quest-1").map(|q| q.participants.current), Some(4));
    }

    #[test]
    fn test_cannot_join_started_quest() {
        let mut board = MultiplayerBoard::default();
        assert_eq!(board.join("quest-2"), Err(QuestRejection::NotOpen("quest-2".into())));
        assert_eq!(board.get("quest-2").map(|q| q.participants.current), Some(5));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut board = MultiplayerBoard::default();
        for _ in 0..40 {
            let _ = board.join("quest-3");
        }
        let quest = board.get("quest-3").unwrap();
        assert_eq!(quest.participants.current, quest.participants.max);
        assert_eq!(quest.status, MultiplayerStatus::InProgress);
    }

    #[test]
    fn test_open_quest_cannot_complete() {
        let mut board = MultiplayerBoard::default();
        assert_eq!(
            board.complete("quest-1"),
            Err(QuestRejection::NotInProgress("quest-1".into()))
        );
        let quest = board.get("quest-1").unwrap();
        assert_eq!(quest.status, MultiplayerStatus::Open);
        assert_eq!(quest.participants.current, 3);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut board = MultiplayerBoard::default();
        assert_eq!(board.completion_reward("quest-2").map(|r| r.coins), Ok(750));
        assert_eq!(board.complete("quest-2").map(|r| r.coins), Ok(750));
        assert_eq!(
            board.complete("quest-2"),
            Err(QuestRejection::AlreadyCompleted("quest-2".into()))
        );
        assert_eq!(
            board.join("quest-2"),
            Err(QuestRejection::AlreadyCompleted("quest-2".into()))
        );
        assert_eq!(board.join("quest-9"), Err(QuestRejection::UnknownQuest("quest-9".into())));
    }
}
