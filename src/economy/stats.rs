use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::*;

/// Running totals for the progress overview and trade-based achievements.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyStats {
    pub total_earned: u64,
    pub total_spent: u64,
    pub trades: u64,
    /// Key = crop, Value = (harvest count, revenue).
    pub harvests: HashMap<CropType, (u32, u64)>,
}

impl EconomyStats {
    pub fn harvest_count(&self) -> u32 {
        self.harvests.values().map(|(n, _)| n).sum()
    }
}

pub fn track_harvest_income(
    mut events: EventReader<CropHarvestedEvent>,
    mut stats: ResMut<EconomyStats>,
) {
    for ev in events.read() {
        let entry = stats.harvests.entry(ev.crop).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(1);
        entry.1 = entry.1.saturating_add(ev.reward as u64);
        stats.total_earned = stats.total_earned.saturating_add(ev.reward as u64);
    }
}

pub fn track_trades(mut events: EventReader<TradeCompletedEvent>, mut stats: ResMut<EconomyStats>) {
    for ev in events.read() {
        match ev.kind {
            TradeKind::Purchase => {
                stats.total_spent = stats.total_spent.saturating_add(ev.price as u64);
            }
            TradeKind::Refund => {
                stats.total_earned = stats.total_earned.saturating_add(ev.price as u64);
            }
        }
        stats.trades += 1;
    }
}
