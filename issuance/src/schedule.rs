//! Annual inflation schedule lookup

use serde::Serialize;

use crate::error::{IssuanceError, Result};

/// Per-year inflation rates in basis points.
///
/// Index 0 is a sentinel and always holds 0, so `rates[1]` is the rate of
/// the first year after the epoch. Years at or past `rates.len()` use the
/// final rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleTable {
    rates: Vec<u16>,
    final_rate: u16,
}

impl ScheduleTable {
    /// Build a schedule, rejecting an empty array or a non-zero sentinel
    pub fn new(rates: Vec<u16>, final_rate: u16) -> Result<Self> {
        if rates.first() != Some(&0) {
            return Err(IssuanceError::InvalidInflationArray(rates));
        }

        Ok(Self { rates, final_rate })
    }

    /// Rate for a 1-based year index
    pub fn rate(&self, year: u64) -> u16 {
        usize::try_from(year)
            .ok()
            .and_then(|idx| self.rates.get(idx))
            .copied()
            .unwrap_or(self.final_rate)
    }

    pub fn rates(&self) -> &[u16] {
        &self.rates
    }

    pub fn final_rate(&self) -> u16 {
        self.final_rate
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false, a valid schedule holds at least the sentinel
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// First year index served by the final rate
    pub fn plateau_year(&self) -> u64 {
        self.rates.len() as u64
    }
}
