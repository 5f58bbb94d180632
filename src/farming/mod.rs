//! Farming domain: planting, watering, and harvesting on the farm grid.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.

use bevy::prelude::*;
use crate::shared::*;

pub mod actions;

pub use actions::{FarmRejection, FarmSummary, HarvestYield};

/// Set once the grid and ledger have been built from `FarmConfig`.
#[derive(Resource, Default, Debug)]
pub struct FarmInitialized(pub bool);

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmInitialized>()
            .add_systems(OnEnter(GameState::Playing), prepare_farm)
            .add_systems(
                Update,
                (handle_new_farm, handle_farm_actions)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Setup
// ─────────────────────────────────────────────────────────────────────────────

/// Builds the grid and starting ledger from config the first time play starts.
pub fn prepare_farm(
    config: Res<FarmConfig>,
    mut initialized: ResMut<FarmInitialized>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
) {
    if initialized.0 {
        return;
    }
    *grid = config.empty_grid();
    *ledger = config.starting_ledger();
    initialized.0 = true;
    info!(
        "[Farm] Prepared {}x{} farm with {} money and {} seeds",
        grid.rows(),
        grid.cols(),
        ledger.money,
        ledger.total_seeds()
    );
}

pub fn handle_new_farm(
    mut events: EventReader<NewFarmEvent>,
    config: Res<FarmConfig>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut changed: EventWriter<FarmChangedEvent>,
    mut ledger_changed: EventWriter<LedgerChangedEvent>,
) {
    if events.read().last().is_none() {
        return;
    }
    *grid = config.empty_grid();
    *ledger = config.starting_ledger();
    for ((row, col), _) in grid.iter() {
        changed.send(FarmChangedEvent { row, col, cell: None });
    }
    ledger_changed.send(LedgerChangedEvent {
        money: ledger.money,
        reason: "New farm".to_string(),
    });
    info!("[Farm] Started a new farm");
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Applies queued FarmActionEvents in send order. Rejected actions change
/// nothing and emit nothing.
pub fn handle_farm_actions(
    mut action_events: EventReader<FarmActionEvent>,
    config: Res<FarmConfig>,
    mut grid: ResMut<FarmGrid>,
    mut ledger: ResMut<ResourceLedger>,
    mut changed: EventWriter<FarmChangedEvent>,
    mut planted: EventWriter<CropPlantedEvent>,
    mut watered: EventWriter<CropWateredEvent>,
    mut harvested: EventWriter<CropHarvestedEvent>,
    mut ledger_changed: EventWriter<LedgerChangedEvent>,
) {
    for ev in action_events.read() {
        let (row, col) = (ev.row, ev.col);
        let result = match ev.action {
            FarmAction::Plant(crop) => actions::plant(
                &mut grid,
                &mut ledger,
                &config.economy,
                config.policy,
                row,
                col,
                crop,
            )
            .map(|()| {
                planted.send(CropPlantedEvent { row, col, crop });
                // Seed count changed even when planting is free.
                ledger_changed.send(LedgerChangedEvent {
                    money: ledger.money,
                    reason: format!("Planted {}", crop.display_name()),
                });
                debug!("[Farm] Planted {:?} at ({}, {})", crop, row, col);
            }),
            FarmAction::Water => actions::advance_growth(&mut grid, row, col).map(|stage| {
                if let Some(Some(crop)) = grid.get(row, col) {
                    watered.send(CropWateredEvent {
                        row,
                        col,
                        crop: crop.crop,
                        stage,
                    });
                }
                debug!("[Farm] Watered ({}, {}), now {:?}", row, col, stage);
            }),
            FarmAction::Harvest => actions::harvest(
                &mut grid,
                &mut ledger,
                &config.economy,
                config.policy,
                row,
                col,
            )
            .map(|yielded| {
                harvested.send(CropHarvestedEvent {
                    row,
                    col,
                    crop: yielded.crop,
                    reward: yielded.reward,
                    seed_returned: yielded.seed_returned,
                });
                ledger_changed.send(LedgerChangedEvent {
                    money: ledger.money,
                    reason: format!("Harvested {}", yielded.crop.display_name()),
                });
                info!(
                    "[Farm] Harvested {:?} at ({}, {}) for {}. Balance: {}",
                    yielded.crop, row, col, yielded.reward, ledger.money
                );
            }),
        };

        match result {
            Ok(()) => {
                let cell = grid.get(row, col).copied().flatten();
                changed.send(FarmChangedEvent { row, col, cell });
            }
            Err(reason) => {
                debug!(
                    "[Farm] Ignored {:?} at ({}, {}): {}",
                    ev.action, row, col, reason
                );
            }
        }
    }
}
