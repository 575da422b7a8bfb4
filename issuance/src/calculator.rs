//! Full-year issuance from the frozen base supply

use serde::Serialize;

use crate::constants::{BASIS_POINTS, MAX_BASE_SUPPLY, TOKEN_UNIT};
use crate::error::{IssuanceError, Result};
use crate::schedule::ScheduleTable;

/// Convert a whole-token supply into 18-decimal base units
pub fn base_supply_from_tokens(tokens: u128) -> Result<u128> {
    if tokens == 0 {
        return Err(IssuanceError::ZeroInitialSupply);
    }

    tokens
        .checked_mul(TOKEN_UNIT)
        .filter(|units| *units <= MAX_BASE_SUPPLY)
        .ok_or(IssuanceError::SupplyTooLarge(tokens))
}

/// Computes the issuance of one whole year.
///
/// Every year is priced off the same base supply captured at construction,
/// never off the live total supply, so issuance does not compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyIssuanceCalculator {
    base_supply: u128,
    schedule: ScheduleTable,
}

impl YearlyIssuanceCalculator {
    /// `base_supply` is in base units
    pub fn new(base_supply: u128, schedule: ScheduleTable) -> Result<Self> {
        if base_supply == 0 {
            return Err(IssuanceError::ZeroInitialSupply);
        }
        if base_supply > MAX_BASE_SUPPLY {
            return Err(IssuanceError::SupplyTooLarge(base_supply));
        }

        Ok(Self {
            base_supply,
            schedule,
        })
    }

    pub fn base_supply(&self) -> u128 {
        self.base_supply
    }

    pub fn schedule(&self) -> &ScheduleTable {
        &self.schedule
    }

    /// Tokens issued over the whole of `year`: `base * rate / 10_000`, floored
    pub fn tokens_per_year(&self, year: u64) -> u128 {
        // base_supply <= MAX_BASE_SUPPLY keeps this product far from u128::MAX
        self.base_supply * u128::from(self.schedule.rate(year)) / BASIS_POINTS
    }
}
