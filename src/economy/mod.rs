//! Economy domain: the seed and goods market, trade bookkeeping.
//!
//! All cross-domain communication goes through `crate::shared::*` events and resources.
//! No other domain module is imported here.

use bevy::prelude::*;
use crate::shared::*;

pub mod market;
pub mod stats;

pub use market::{
    purchase, refund, ListingKind, MarketCatalog, MarketInventory, MarketListing, MarketRejection,
    Rarity,
};
pub use stats::EconomyStats;
use stats::{track_harvest_income, track_trades};

/// UI request to buy one unit of a listing.
#[derive(Event, Debug, Clone)]
pub struct PurchaseRequestEvent {
    pub item_id: String,
}

/// UI request to return one unit of a listing.
#[derive(Event, Debug, Clone)]
pub struct RefundRequestEvent {
    pub item_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarketCatalog>()
            .init_resource::<MarketInventory>()
            .init_resource::<EconomyStats>();

        app.add_event::<PurchaseRequestEvent>()
            .add_event::<RefundRequestEvent>();

        app.add_systems(OnEnter(GameState::Playing), stock_market);

        app.add_systems(
            Update,
            (
                (handle_purchases, handle_refunds).chain(),
                track_harvest_income,
                track_trades,
            )
                .run_if(in_state(GameState::Playing)),
        );

        info!("[Economy] EconomyPlugin registered.");
    }
}

/// Fills the catalog from the loaded economy table the first time play starts.
pub fn stock_market(config: Res<FarmConfig>, mut catalog: ResMut<MarketCatalog>) {
    if !catalog.is_empty() {
        return;
    }
    *catalog = MarketCatalog::from_economy(&config.economy);
    info!("[Economy] Market stocked with {} listings", catalog.listings.len());
}

pub fn handle_purchases(
    mut requests: EventReader<PurchaseRequestEvent>,
    mut catalog: ResMut<MarketCatalog>,
    mut inventory: ResMut<MarketInventory>,
    mut ledger: ResMut<ResourceLedger>,
    mut trade_writer: EventWriter<TradeCompletedEvent>,
    mut ledger_writer: EventWriter<LedgerChangedEvent>,
) {
    for ev in requests.read() {
        match purchase(&mut catalog, &mut inventory, &mut ledger, &ev.item_id) {
            Ok(balance) => {
                let price = catalog.get(&ev.item_id).map_or(0, |l| l.price);
                trade_writer.send(TradeCompletedEvent {
                    item_id: ev.item_id.clone(),
                    price,
                    kind: TradeKind::Purchase,
                });
                ledger_writer.send(LedgerChangedEvent {
                    money: balance,
                    reason: format!("Bought {}", ev.item_id),
                });
                info!("[Economy] Bought '{}' for {}. Balance: {}", ev.item_id, price, balance);
            }
            Err(reason) => {
                debug!("[Economy] Purchase of '{}' refused: {}", ev.item_id, reason);
            }
        }
    }
}

pub fn handle_refunds(
    mut requests: EventReader<RefundRequestEvent>,
    mut catalog: ResMut<MarketCatalog>,
    mut inventory: ResMut<MarketInventory>,
    mut ledger: ResMut<ResourceLedger>,
    mut trade_writer: EventWriter<TradeCompletedEvent>,
    mut ledger_writer: EventWriter<LedgerChangedEvent>,
) {
    for ev in requests.read() {
        match refund(&mut catalog, &mut inventory, &mut ledger, &ev.item_id) {
            Ok(balance) => {
                let price = catalog.get(&ev.item_id).map_or(0, |l| l.price);
                trade_writer.send(TradeCompletedEvent {
                    item_id: ev.item_id.clone(),
                    price,
                    kind: TradeKind::Refund,
                });
                ledger_writer.send(LedgerChangedEvent {
                    money: balance,
                    reason: format!("Returned {}", ev.item_id),
                });
                info!("[Economy] Refunded '{}'. Balance: {}", ev.item_id, balance);
            }
            Err(reason) => {
                debug!("[Economy] Refund of '{}' refused: {}", ev.item_id, reason);
            }
        }
    }
}
