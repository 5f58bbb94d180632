use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::CropType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient money: need {needed}, have {available}")]
    InsufficientMoney { needed: u32, available: u32 },
    #[error("insufficient {crop:?} seeds: need {needed}, have {available}")]
    InsufficientSeeds {
        crop: CropType,
        needed: u32,
        available: u32,
    },
    #[error("balance overflow")]
    Overflow,
}

/// Money plus per-crop seed counts.
///
/// Balances are unsigned and every debit is checked before it is applied, so a
/// failed operation leaves the ledger exactly as it was.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub money: u32,
    pub seeds: HashMap<CropType, u32>,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new(0, HashMap::new())
    }
}

impl ResourceLedger {
    pub fn new(money: u32, seeds: HashMap<CropType, u32>) -> Self {
        Self { money, seeds }
    }

    pub fn seeds(&self, crop: CropType) -> u32 {
        self.seeds.get(&crop).copied().unwrap_or(0)
    }

    /// Returns the new balance.
    pub fn credit(&mut self, amount: u32) -> Result<u32, LedgerError> {
        self.money = self.money.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(self.money)
    }

    /// Returns the new balance. Fails closed when funds are short.
    pub fn debit(&mut self, amount: u32) -> Result<u32, LedgerError> {
        let remaining = self
            .money
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientMoney {
                needed: amount,
                available: self.money,
            })?;
        self.money = remaining;
        Ok(remaining)
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.money >= amount
    }

    pub fn increment_seed(&mut self, crop: CropType, n: u32) -> Result<u32, LedgerError> {
        let count = self
            .seeds(crop)
            .checked_add(n)
            .ok_or(LedgerError::Overflow)?;
        self.seeds.insert(crop, count);
        Ok(count)
    }

    pub fn decrement_seed(&mut self, crop: CropType, n: u32) -> Result<u32, LedgerError> {
        let available = self.seeds(crop);
        let count = available
            .checked_sub(n)
            .ok_or(LedgerError::InsufficientSeeds {
                crop,
                needed: n,
                available,
            })?;
        self.seeds.insert(crop, count);
        Ok(count)
    }

    pub fn total_seeds(&self) -> u32 {
        self.seeds.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(money: u32) -> ResourceLedger {
        ResourceLedger::new(money, HashMap::from([(CropType::Wheat, 2)]))
    }

    #[test]
    fn test_credit_and_debit() {
        let mut l = ledger(10);
        assert_eq!(l.credit(15), Ok(25));
        assert_eq!(l.debit(20), Ok(5));
        assert_eq!(l.money, 5);
    }

    #[test]
    fn test_debit_fails_closed() {
        let mut l = ledger(10);
        let before = l.clone();
        assert_eq!(
            l.debit(11),
            Err(LedgerError::InsufficientMoney {
                needed: 11,
                available: 10
            })
        );
        assert_eq!(l, before);
    }

    #[test]
    fn test_debit_exact_balance_reaches_zero() {
        let mut l = ledger(7);
        assert_eq!(l.debit(7), Ok(0));
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let mut l = ledger(u32::MAX);
        assert_eq!(l.credit(1), Err(LedgerError::Overflow));
        assert_eq!(l.money, u32::MAX);
    }

    #[test]
    fn test_seed_counts() {
        let mut l = ledger(0);
        assert_eq!(l.seeds(CropType::Corn), 0);
        assert_eq!(l.increment_seed(CropType::Corn, 3), Ok(3));
        assert_eq!(l.decrement_seed(CropType::Wheat, 2), Ok(0));
        assert_eq!(l.total_seeds(), 3);
    }

    #[test]
    fn test_decrement_seed_fails_closed() {
        let mut l = ledger(0);
        let before = l.clone();
        assert!(matches!(
            l.decrement_seed(CropType::Wheat, 3),
            Err(LedgerError::InsufficientSeeds { available: 2, .. })
        ));
        assert!(l.decrement_seed(CropType::Potato, 1).is_err());
        assert_eq!(l, before);
    }
}
