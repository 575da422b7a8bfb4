//! Issuance accrual between a mint watermark and a later instant
//!
//! A span inside one year is weighted by the seconds it covers. A span that
//! crosses year boundaries is split into three terms, each floored on its
//! own:
//! - what was left of the starting year
//! - every fully elapsed year in between, added unweighted
//! - the part of the ending year reached so far

use serde::{Deserialize, Serialize};

use crate::calculator::YearlyIssuanceCalculator;
use crate::constants::YEAR_SECONDS;
use crate::error::{IssuanceError, Result};
use crate::resolver::YearResolver;
use crate::schedule::ScheduleTable;

/// Per-term result of one accrual calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualBreakdown {
    pub start_year: u64,
    pub end_year: u64,
    /// Starting year's share (the whole span when it stays in one year)
    pub remainder: u128,
    /// Fully elapsed intermediate years
    pub full_years: u128,
    /// Ending year's share, zero when the span stays in one year
    pub partial: u128,
}

impl AccrualBreakdown {
    pub fn total(&self) -> Result<u128> {
        self.remainder
            .checked_add(self.full_years)
            .and_then(|sum| sum.checked_add(self.partial))
            .ok_or(IssuanceError::ArithmeticOverflow)
    }

    pub fn crosses_boundary(&self) -> bool {
        self.end_year > self.start_year
    }
}

/// The accrual engine: immutable configuration, no state of its own.
///
/// The watermark is passed in by the caller, which keeps every query pure
/// and safe to run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccrualEngine {
    resolver: YearResolver,
    calculator: YearlyIssuanceCalculator,
}

impl AccrualEngine {
    pub fn new(resolver: YearResolver, calculator: YearlyIssuanceCalculator) -> Self {
        Self {
            resolver,
            calculator,
        }
    }

    pub fn resolver(&self) -> &YearResolver {
        &self.resolver
    }

    pub fn calculator(&self) -> &YearlyIssuanceCalculator {
        &self.calculator
    }

    pub fn schedule(&self) -> &ScheduleTable {
        self.calculator.schedule()
    }

    pub fn deploy_time(&self) -> u64 {
        self.resolver.deploy_time()
    }

    pub fn base_supply(&self) -> u128 {
        self.calculator.base_supply()
    }

    pub fn current_inflation_rate(&self, year: u64) -> u16 {
        self.schedule().rate(year)
    }

    pub fn year_since_deploy(&self, timestamp: u64) -> Result<u64> {
        self.resolver.year_since_deploy(timestamp)
    }

    pub fn tokens_per_year(&self, year: u64) -> u128 {
        self.calculator.tokens_per_year(year)
    }

    /// Tokens mintable for `(last_mint_time, current_time]`
    pub fn calculate_mintable_tokens(&self, last_mint_time: u64, current_time: u64) -> Result<u128> {
        self.breakdown(last_mint_time, current_time)?.total()
    }

    /// Same as `calculate_mintable_tokens`, keeping the three terms apart
    pub fn breakdown(&self, last_mint_time: u64, current_time: u64) -> Result<AccrualBreakdown> {
        if current_time <= last_mint_time {
            return Err(IssuanceError::InvalidTime {
                lower_bound: last_mint_time,
                actual: current_time,
            });
        }

        let start_year = self.resolver.year_since_deploy(last_mint_time)?;
        let end_year = self.resolver.year_since_deploy(current_time)?;

        let breakdown = if start_year == end_year {
            AccrualBreakdown {
                start_year,
                end_year,
                remainder: self.weighted(start_year, current_time - last_mint_time)?,
                full_years: 0,
                partial: 0,
            }
        } else {
            let elapsed_in_start = self.resolver.offset_in_year(last_mint_time, start_year);
            let elapsed_in_end = self.resolver.offset_in_year(current_time, end_year);

            AccrualBreakdown {
                start_year,
                end_year,
                remainder: self.weighted(start_year, YEAR_SECONDS - elapsed_in_start)?,
                full_years: self.full_years_between(start_year, end_year)?,
                partial: self.weighted(end_year, elapsed_in_end)?,
            }
        };

        log::trace!(
            "accrual {}..{} years {}..{}: {:?}",
            last_mint_time,
            current_time,
            start_year,
            end_year,
            breakdown
        );

        Ok(breakdown)
    }

    /// `tokens_per_year(year) * seconds / YEAR_SECONDS`, floored
    fn weighted(&self, year: u64, seconds: u64) -> Result<u128> {
        debug_assert!(seconds <= YEAR_SECONDS);
        // Only rates up to 100% are guaranteed to fit here
        self.calculator
            .tokens_per_year(year)
            .checked_mul(u128::from(seconds))
            .map(|product| product / u128::from(YEAR_SECONDS))
            .ok_or(IssuanceError::ArithmeticOverflow)
    }

    /// Sum of full issuance for every year strictly between `start` and `end`.
    ///
    /// Years past the schedule all issue the same amount, so that stretch is
    /// a single multiplication however many decades it covers.
    fn full_years_between(&self, start: u64, end: u64) -> Result<u128> {
        let first = start + 1;
        if first >= end {
            return Ok(0);
        }

        let plateau = self.schedule().plateau_year().max(first);
        let mut sum: u128 = 0;

        for year in first..plateau.min(end) {
            sum = sum
                .checked_add(self.calculator.tokens_per_year(year))
                .ok_or(IssuanceError::ArithmeticOverflow)?;
        }

        if end > plateau {
            let flat = self
                .calculator
                .tokens_per_year(plateau)
                .checked_mul(u128::from(end - plateau))
                .ok_or(IssuanceError::ArithmeticOverflow)?;
            sum = sum
                .checked_add(flat)
                .ok_or(IssuanceError::ArithmeticOverflow)?;
        }

        Ok(sum)
    }
}
