//! The farm state machine: plant → water → harvest over a (grid, ledger) pair.
//!
//! Each transition either applies completely or returns a `FarmRejection` and
//! leaves both the grid and the ledger untouched.

use thiserror::Error;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FarmRejection {
    #[error("cell ({row}, {col}) is outside the farm")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell is already planted")]
    Occupied,
    #[error("cell is empty")]
    Empty,
    #[error("crop is already ready to harvest")]
    AlreadyReady,
    #[error("crop is not ready to harvest (stage {0:?})")]
    NotReady(GrowthStage),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What a successful harvest paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestYield {
    pub crop: CropType,
    pub reward: u32,
    pub seed_returned: bool,
}

/// Empty cell + seed in stock (+ money when planting costs money) → cell holds a seed.
pub fn plant(
    grid: &mut FarmGrid,
    ledger: &mut ResourceLedger,
    economy: &EconomyTable,
    policy: FarmPolicy,
    row: usize,
    col: usize,
    crop: CropType,
) -> Result<(), FarmRejection> {
    let cell = grid
        .get_mut(row, col)
        .ok_or(FarmRejection::OutOfBounds { row, col })?;
    if cell.is_some() {
        return Err(FarmRejection::Occupied);
    }

    // Dry-run on a copy so a failed debit can't leave a half-applied ledger.
    let mut next = ledger.clone();
    next.decrement_seed(crop, 1)?;
    if policy.planting_costs_money {
        next.debit(economy.seed_cost(crop))?;
    }

    *ledger = next;
    *cell = Some(CropInstance::planted(crop));
    Ok(())
}

/// Watering. Returns the stage the crop reached.
pub fn advance_growth(
    grid: &mut FarmGrid,
    row: usize,
    col: usize,
) -> Result<GrowthStage, FarmRejection> {
    let cell = grid
        .get_mut(row, col)
        .ok_or(FarmRejection::OutOfBounds { row, col })?;
    let crop = cell.as_mut().ok_or(FarmRejection::Empty)?;
    if crop.stage.is_ready() {
        return Err(FarmRejection::AlreadyReady);
    }
    crop.stage = crop.stage.next();
    Ok(crop.stage)
}

/// Harvest-ready crop → empty cell, reward credited, optionally one seed back.
pub fn harvest(
    grid: &mut FarmGrid,
    ledger: &mut ResourceLedger,
    economy: &EconomyTable,
    policy: FarmPolicy,
    row: usize,
    col: usize,
) -> Result<HarvestYield, FarmRejection> {
    let cell = grid
        .get_mut(row, col)
        .ok_or(FarmRejection::OutOfBounds { row, col })?;
    let crop = (*cell).ok_or(FarmRejection::Empty)?;
    if !crop.stage.is_ready() {
        return Err(FarmRejection::NotReady(crop.stage));
    }

    let reward = economy.harvest_reward(crop.crop);
    let mut next = ledger.clone();
    next.credit(reward)?;
    if policy.harvest_returns_seed {
        next.increment_seed(crop.crop, 1)?;
    }

    *ledger = next;
    *cell = None;
    Ok(HarvestYield {
        crop: crop.crop,
        reward,
        seed_returned: policy.harvest_returns_seed,
    })
}

pub fn can_plant(
    ledger: &ResourceLedger,
    economy: &EconomyTable,
    policy: FarmPolicy,
    crop: CropType,
) -> bool {
    ledger.seeds(crop) > 0
        && (!policy.planting_costs_money || ledger.can_afford(economy.seed_cost(crop)))
}

pub fn harvest_reward(economy: &EconomyTable, crop: CropType) -> u32 {
    economy.harvest_reward(crop)
}

/// Cell counts for the farm overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarmSummary {
    pub total: usize,
    pub planted: usize,
    pub ready: usize,
}

impl FarmSummary {
    pub fn empty(&self) -> usize {
        self.total - self.planted
    }
}

pub fn summarize(grid: &FarmGrid) -> FarmSummary {
    grid.iter().fold(FarmSummary::default(), |mut s, (_, cell)| {
        s.total += 1;
        if let Some(crop) = cell {
            s.planted += 1;
            if crop.stage.is_ready() {
                s.ready += 1;
            }
        }
        s
    })
}
