//! Progression domain: skill experience and achievements.
//!
//! Listens to farm, market and comic events for the automatic unlocks and
//! fires `AchievementUnlockedEvent` when anything new is earned.

use bevy::prelude::*;
use crate::shared::*;

pub mod achievements;
pub mod skills;

pub use achievements::{AchievementDef, AchievementError, Achievements, ACHIEVEMENTS};
pub use skills::{SkillProgress, Skills};

/// Explicit request to mark an achievement complete.
#[derive(Event, Debug, Clone)]
pub struct CompleteAchievementEvent {
    pub achievement_id: String,
}

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Skills>()
            .init_resource::<Achievements>()
            .add_event::<CompleteAchievementEvent>()
            .add_systems(
                Update,
                (
                    apply_experience,
                    track_progress_counters,
                    handle_complete_requests,
                    check_achievements,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn apply_experience(mut events: EventReader<GainExperienceEvent>, mut skills: ResMut<Skills>) {
    for ev in events.read() {
        let before = skills.get(ev.skill).level();
        let after = skills.gain(ev.skill, ev.amount);
        if after > before {
            info!("[Progression] {} reached level {}", ev.skill.name(), after);
        }
    }
}

pub fn track_progress_counters(
    mut harvests: EventReader<CropHarvestedEvent>,
    mut trades: EventReader<TradeCompletedEvent>,
    mut panels: EventReader<ComicPanelGeneratedEvent>,
    mut achievements: ResMut<Achievements>,
) {
    let harvested = harvests.read().count() as u64;
    let traded = trades
        .read()
        .filter(|t| t.kind == TradeKind::Purchase)
        .count() as u64;
    if harvested > 0 {
        achievements.harvests += harvested;
    }
    if traded > 0 {
        achievements.trades += traded;
    }
    for ev in panels.read() {
        achievements.record_panel(&ev.panel_id);
    }
}

pub fn handle_complete_requests(
    mut requests: EventReader<CompleteAchievementEvent>,
    mut achievements: ResMut<Achievements>,
    mut unlocked: EventWriter<AchievementUnlockedEvent>,
) {
    for ev in requests.read() {
        match achievements.complete(&ev.achievement_id) {
            Ok(true) => {
                unlocked.send(AchievementUnlockedEvent {
                    achievement_id: ev.achievement_id.clone(),
                });
                info!("[Progression] Achievement completed: {}", ev.achievement_id);
            }
            Ok(false) => {}
            Err(e) => warn!("[Progression] {}", e),
        }
    }
}

pub fn check_achievements(
    skills: Res<Skills>,
    mut achievements: ResMut<Achievements>,
    mut unlocked: EventWriter<AchievementUnlockedEvent>,
) {
    for id in achievements.pending_unlocks(&skills) {
        if let Ok(true) = achievements.complete(id) {
            unlocked.send(AchievementUnlockedEvent {
                achievement_id: id.to_string(),
            });
            info!("[Progression] Achievement unlocked: {}", id);
        }
    }
}
