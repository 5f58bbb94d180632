//! Quests domain: the farm quest board and the multiplayer quest board.

use bevy::prelude::*;
use crate::shared::*;

pub mod board;
pub mod multiplayer;

pub use board::{Difficulty, FarmQuest, QuestBoard, QuestObjective, QuestRejection, QuestStatus};
pub use multiplayer::{MultiplayerBoard, MultiplayerQuest, MultiplayerStatus, QuestReward};

/// Player marks a farm quest completed or failed.
#[derive(Event, Debug, Clone)]
pub struct SetQuestStatusEvent {
    pub quest_id: u32,
    pub status: QuestStatus,
}

#[derive(Event, Debug, Clone)]
pub struct QuestStatusChangedEvent {
    pub quest_id: u32,
    pub status: QuestStatus,
    pub reward: u32,
}

/// A farm quest's progress reached its target. Status is unchanged.
#[derive(Event, Debug, Clone)]
pub struct QuestTargetReachedEvent {
    pub quest_id: u32,
}

#[derive(Event, Debug, Clone)]
pub struct JoinMultiplayerQuestEvent {
    pub quest_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct CompleteMultiplayerQuestEvent {
    pub quest_id: String,
}

pub struct QuestsPlugin;

impl Plugin for QuestsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuestBoard>()
            .init_resource::<MultiplayerBoard>()
            .add_event::<SetQuestStatusEvent>()
            .add_event::<QuestStatusChangedEvent>()
            .add_event::<QuestTargetReachedEvent>()
            .add_event::<JoinMultiplayerQuestEvent>()
            .add_event::<CompleteMultiplayerQuestEvent>()
            .add_systems(
                Update,
                (
                    track_quest_progress,
                    handle_quest_status,
                    handle_multiplayer_joins,
                    handle_multiplayer_completions,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn track_quest_progress(
    mut planted: EventReader<CropPlantedEvent>,
    mut harvested: EventReader<CropHarvestedEvent>,
    mut board: ResMut<QuestBoard>,
    mut reached_writer: EventWriter<QuestTargetReachedEvent>,
) {
    let mut reached = Vec::new();
    for ev in planted.read() {
        reached.extend(board.record_planting(ev.crop));
    }
    for ev in harvested.read() {
        reached.extend(board.record(QuestObjective::HarvestCrops, 1));
        reached.extend(board.record(QuestObjective::EarnFromHarvests, ev.reward));
    }
    for quest_id in reached {
        info!("[Quests] Quest {} is ready to turn in", quest_id);
        reached_writer.send(QuestTargetReachedEvent { quest_id });
    }
}

pub fn handle_quest_status(
    mut requests: EventReader<SetQuestStatusEvent>,
    mut board: ResMut<QuestBoard>,
    mut ledger: ResMut<ResourceLedger>,
    mut changed: EventWriter<QuestStatusChangedEvent>,
    mut ledger_changed: EventWriter<LedgerChangedEvent>,
) {
    for ev in requests.read() {
        match board.set_status(&mut ledger, ev.quest_id, ev.status) {
            Ok(reward) => {
                changed.send(QuestStatusChangedEvent {
                    quest_id: ev.quest_id,
                    status: ev.status,
                    reward,
                });
                if reward > 0 {
                    ledger_changed.send(LedgerChangedEvent {
                        money: ledger.money,
                        reason: format!("Quest {} reward", ev.quest_id),
                    });
                }
                info!("[Quests] Quest {} set to {:?} (+{})", ev.quest_id, ev.status, reward);
            }
            Err(e) => debug!("[Quests] Status change ignored: {}", e),
        }
    }
}

pub fn handle_multiplayer_joins(
    mut requests: EventReader<JoinMultiplayerQuestEvent>,
    mut board: ResMut<MultiplayerBoard>,
) {
    for ev in requests.read() {
        match board.join(&ev.quest_id) {
            Ok(status) => info!("[Quests] Joined '{}' ({:?})", ev.quest_id, status),
            Err(e) => debug!("[Quests] Join ignored: {}", e),
        }
    }
}

/// Pays coins into the ledger and the experience into the Farming skill.
/// Nothing changes unless the quest can complete and the coins can be credited.
pub fn handle_multiplayer_completions(
    mut requests: EventReader<CompleteMultiplayerQuestEvent>,
    mut board: ResMut<MultiplayerBoard>,
    mut ledger: ResMut<ResourceLedger>,
    mut ledger_changed: EventWriter<LedgerChangedEvent>,
    mut experience: EventWriter<GainExperienceEvent>,
) {
    for ev in requests.read() {
        let reward = match board.completion_reward(&ev.quest_id) {
            Ok(reward) => reward,
            Err(e) => {
                debug!("[Quests] Completion ignored: {}", e);
                continue;
            }
        };
        let mut next = ledger.clone();
        if let Err(e) = next.credit(reward.coins) {
            warn!("[Quests] Could not pay '{}' reward: {}", ev.quest_id, e);
            continue;
        }
        if let Err(e) = board.complete(&ev.quest_id) {
            debug!("[Quests] Completion ignored: {}", e);
            continue;
        }
        *ledger = next;

        ledger_changed.send(LedgerChangedEvent {
            money: ledger.money,
            reason: format!("Multiplayer quest {}", ev.quest_id),
        });
        experience.send(GainExperienceEvent {
            skill: SkillKind::Farming,
            amount: reward.experience,
        });
        info!("[Quests] Completed multiplayer quest '{}'", ev.quest_id);
    }
}
