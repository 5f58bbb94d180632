use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingKind {
    Seed(CropType),
    Tool,
    Upgrade,
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketListing {
    pub id: String,
    pub name: String,
    pub kind: ListingKind,
    pub price: u32,
    pub rarity: Rarity,
    /// `None` means unlimited.
    pub in_stock: Option<u32>,
}

impl MarketListing {
    fn item(id: &str, name: &str, kind: ListingKind, price: u32, rarity: Rarity, stock: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            price,
            rarity,
            in_stock: Some(stock),
        }
    }

    pub fn is_available(&self) -> bool {
        self.in_stock.map_or(true, |n| n > 0)
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketCatalog {
    pub listings: Vec<MarketListing>,
}

impl MarketCatalog {
    /// Seed listings priced from the economy table, followed by the fixed goods.
    pub fn from_economy(economy: &EconomyTable) -> Self {
        let mut listings: Vec<MarketListing> = CropType::ALL
            .iter()
            .filter_map(|&crop| {
                economy.get(crop).map(|e| MarketListing {
                    id: format!("seed-{}", crop.id()),
                    name: format!("{} Seeds", crop.display_name()),
                    kind: ListingKind::Seed(crop),
                    price: e.seed_cost,
                    rarity: Rarity::Common,
                    in_stock: None,
                })
            })
            .collect();

        listings.extend([
            MarketListing::item("tool-basic", "Basic Hoe", ListingKind::Tool, 100, Rarity::Common, 50),
            MarketListing::item(
                "tool-watering-can",
                "Enchanted Watering Can",
                ListingKind::Tool,
                200,
                Rarity::Rare,
                25,
            ),
            MarketListing::item("upgrade-plot", "Farm Plot Expansion", ListingKind::Upgrade, 250, Rarity::Rare, 5),
            MarketListing::item(
                "decoration-scarecrow",
                "Comic Scarecrow",
                ListingKind::Decoration,
                150,
                Rarity::Legendary,
                10,
            ),
        ]);

        Self { listings }
    }

    pub fn get(&self, item_id: &str) -> Option<&MarketListing> {
        self.listings.iter().find(|l| l.id == item_id)
    }

    fn get_mut(&mut self, item_id: &str) -> Option<&mut MarketListing> {
        self.listings.iter_mut().find(|l| l.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Non-seed goods the player owns. Seeds go straight into the ledger.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInventory {
    pub owned: HashMap<String, u32>,
}

impl MarketInventory {
    pub fn count(&self, item_id: &str) -> u32 {
        self.owned.get(item_id).copied().unwrap_or(0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TRANSACTIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketRejection {
    #[error("no listing named '{0}'")]
    UnknownItem(String),
    #[error("'{0}' is out of stock")]
    OutOfStock(String),
    #[error("nothing to refund for '{0}'")]
    NothingToRefund(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Buys one unit. On rejection catalog, inventory and ledger are untouched.
pub fn purchase(
    catalog: &mut MarketCatalog,
    inventory: &mut MarketInventory,
    ledger: &mut ResourceLedger,
    item_id: &str,
) -> Result<u32, MarketRejection> {
    let listing = catalog
        .get(item_id)
        .ok_or_else(|| MarketRejection::UnknownItem(item_id.to_string()))?;
    if !listing.is_available() {
        return Err(MarketRejection::OutOfStock(item_id.to_string()));
    }
    let (price, kind) = (listing.price, listing.kind);

    // Dry run on a copy, commit only when every step succeeds.
    let mut next = ledger.clone();
    next.debit(price)?;
    if let ListingKind::Seed(crop) = kind {
        next.increment_seed(crop, 1)?;
    }
    *ledger = next;

    if let Some(listing) = catalog.get_mut(item_id) {
        if let Some(stock) = listing.in_stock.as_mut() {
            *stock -= 1;
        }
    }
    if !matches!(kind, ListingKind::Seed(_)) {
        *inventory.owned.entry(item_id.to_string()).or_insert(0) += 1;
    }
    Ok(ledger.money)
}

/// Returns one previously bought unit at the listing price.
pub fn refund(
    catalog: &mut MarketCatalog,
    inventory: &mut MarketInventory,
    ledger: &mut ResourceLedger,
    item_id: &str,
) -> Result<u32, MarketRejection> {
    let listing = catalog
        .get(item_id)
        .ok_or_else(|| MarketRejection::UnknownItem(item_id.to_string()))?;
    let (price, kind) = (listing.price, listing.kind);

    let mut next = ledger.clone();
    match kind {
        ListingKind::Seed(crop) => {
            next.decrement_seed(crop, 1)
                .map_err(|_| MarketRejection::NothingToRefund(item_id.to_string()))?;
        }
        _ if inventory.count(item_id) == 0 => {
            return Err(MarketRejection::NothingToRefund(item_id.to_string()));
        }
        _ => {}
    }
    next.credit(price)?;
    *ledger = next;

    if let Some(listing) = catalog.get_mut(item_id) {
        if let Some(stock) = listing.in_stock.as_mut() {
            *stock = stock.saturating_add(1);
        }
    }
    if !matches!(kind, ListingKind::Seed(_)) {
        if let Some(n) = inventory.owned.get_mut(item_id) {
            *n -= 1;
            if *n == 0 {
                inventory.owned.remove(item_id);
            }
        }
    }
    Ok(ledger.money)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(money: u32) -> (MarketCatalog, MarketInventory, ResourceLedger) {
        (
            MarketCatalog::from_economy(&EconomyTable::default()),
            MarketInventory::default(),
            ResourceLedger::new(money, HashMap::new()),
        )
    }

    #[test]
    fn test_seed_listings_follow_economy() {
        let catalog = MarketCatalog::from_economy(&FarmConfig::compact().economy);
        let corn = catalog.get("seed-corn").unwrap();
        assert_eq!(corn.price, 7);
        assert_eq!(corn.kind, ListingKind::Seed(CropType::Corn));
        assert_eq!(corn.in_stock, None);
    }

    #[test]
    fn test_purchase_seed_credits_ledger() {
        let (mut catalog, mut inv, mut ledger) = setup(20);
        assert_eq!(purchase(&mut catalog, &mut inv, &mut ledger, "seed-wheat"), Ok(15));
        assert_eq!(ledger.seeds(CropType::Wheat), 1);
        assert!(inv.owned.is_empty());
    }

    #[test]
    fn test_purchase_tool_decrements_stock() {
        let (mut catalog, mut inv, mut ledger) = setup(1000);
        purchase(&mut catalog, &mut inv, &mut ledger, "tool-watering-can").unwrap();
        assert_eq!(ledger.money, 800);
        assert_eq!(inv.count("tool-watering-can"), 1);
        assert_eq!(catalog.get("tool-watering-can").unwrap().in_stock, Some(24));
    }

    #[test]
    fn test_purchase_rejections_leave_state_untouched() {
        let (mut catalog, mut inv, mut ledger) = setup(100);
        catalog.get_mut("decoration-scarecrow").unwrap().in_stock = Some(0);
        let before = (catalog.clone(), inv.clone(), ledger.clone());

        assert_eq!(
            purchase(&mut catalog, &mut inv, &mut ledger, "seed-carrot"),
            Err(MarketRejection::UnknownItem("seed-carrot".into()))
        );
        assert_eq!(
            purchase(&mut catalog, &mut inv, &mut ledger, "decoration-scarecrow"),
            Err(MarketRejection::OutOfStock("decoration-scarecrow".into()))
        );
        assert!(matches!(
            purchase(&mut catalog, &mut inv, &mut ledger, "upgrade-plot"),
            Err(MarketRejection::Ledger(LedgerError::InsufficientMoney { .. }))
        ));
        assert_eq!((catalog, inv, ledger), before);
    }

    #[test]
    fn test_refund_restores_money_and_stock() {
        let (mut catalog, mut inv, mut ledger) = setup(300);
        purchase(&mut catalog, &mut inv, &mut ledger, "upgrade-plot").unwrap();
        assert_eq!(refund(&mut catalog, &mut inv, &mut ledger, "upgrade-plot"), Ok(300));
        assert_eq!(inv.count("upgrade-plot"), 0);
        assert_eq!(catalog.get("upgrade-plot").unwrap().in_stock, Some(5));
    }

    #[test]
    fn test_refund_without_purchase_is_rejected() {
        let (mut catalog, mut inv, mut ledger) = setup(0);
        assert_eq!(
            refund(&mut catalog, &mut inv, &mut ledger, "seed-potato"),
            Err(MarketRejection::NothingToRefund("seed-potato".into()))
        );
        assert_eq!(
            refund(&mut catalog, &mut inv, &mut ledger, "tool-basic"),
            Err(MarketRejection::NothingToRefund("tool-basic".into()))
        );
        assert_eq!(ledger.money, 0);
    }
}
