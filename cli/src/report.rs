//! Offline issuance reports

use serde::Serialize;
use z_issuance::constants::{BASIS_POINTS, TOKEN_DECIMALS, TOKEN_UNIT};
use z_issuance::AccrualEngine;
use z_token::TokenError;

use crate::config::{Config, ConfigError, Result};

/// One line of the projected schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub year: u64,
    pub rate_bps: u16,
    pub tokens: u128,
}

/// Rates and full-year issuance for years `1..=years`
pub fn schedule_rows(engine: &AccrualEngine, years: u64) -> Vec<ScheduleRow> {
    (1..=years)
        .map(|year| ScheduleRow {
            year,
            rate_bps: engine.current_inflation_rate(year),
            tokens: engine.tokens_per_year(year),
        })
        .collect()
}

/// Largest number of mints a single simulation may run
pub const MAX_SIMULATION_MINTS: u64 = 1_000_000;

/// Mints of one issuance year, keyed by the year of the last second each mint covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: u64,
    pub mints: u64,
    pub minted: u128,
    pub burned: u128,
    /// Total supply after the year's last mint
    pub total_supply: u128,
}

/// Result of replaying periodic mints against a manual clock
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub deploy_time: u64,
    pub base_supply: u128,
    pub mints: u64,
    pub last_mint_time: u64,
    pub years: Vec<YearSummary>,
    pub total_minted: u128,
    pub total_burned: u128,
    pub final_supply: u128,
    /// What a single mint covering the whole run would have credited
    pub single_mint_amount: u128,
}

impl SimulationReport {
    /// Mint every `every` seconds for `until` seconds after deployment,
    /// burning `burn_bps` of each minted amount straight away.
    pub fn simulate(config: &Config, now: u64, every: u64, until: u64, burn_bps: u16) -> Result<Self> {
        if every == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if u128::from(burn_bps) > BASIS_POINTS {
            return Err(ConfigError::InvalidBurnShare(burn_bps));
        }
        let planned = until.div_ceil(every);
        if planned > MAX_SIMULATION_MINTS {
            return Err(ConfigError::TooManyMints {
                mints: planned,
                max: MAX_SIMULATION_MINTS,
            });
        }

        let (token, clock) = config.deploy(now)?;
        let deploy_time = token.deploy_time();
        let end = deploy_time.saturating_add(until);
        let minter = config.token.minter;
        let beneficiary = token.mint_beneficiary();

        let mut years: Vec<YearSummary> = Vec::new();
        let mut mints: u64 = 0;
        let mut total_minted: u128 = 0;
        let mut total_burned: u128 = 0;
        let mut at = deploy_time;

        while at < end {
            at = at.saturating_add(every).min(end);
            clock.set(at);

            let receipt = token.mint(&minter)?;
            let burned = receipt.amount * u128::from(burn_bps) / BASIS_POINTS;
            if burned > 0 {
                token.transfer(&beneficiary, token.address(), burned)?;
            }
            // The simulation reads totals, not the event history
            token.take_transfer_events();

            mints += 1;
            total_minted += receipt.amount;
            total_burned += burned;

            let year = token.year_since_deploy(at - 1)?;
            let total_supply = token.total_supply();
            match years.last_mut() {
                Some(summary) if summary.year == year => {
                    summary.mints += 1;
                    summary.minted += receipt.amount;
                    summary.burned += burned;
                    summary.total_supply = total_supply;
                }
                _ => years.push(YearSummary {
                    year,
                    mints: 1,
                    minted: receipt.amount,
                    burned,
                    total_supply,
                }),
            }
        }

        let single_mint_amount = if end > deploy_time {
            token
                .engine()
                .calculate_mintable_tokens(deploy_time, end)
                .map_err(TokenError::from)?
        } else {
            0
        };

        log::debug!(
            "Simulated {} mints, minted {} burned {}",
            mints,
            total_minted,
            total_burned
        );

        Ok(Self {
            deploy_time,
            base_supply: token.base_supply(),
            mints,
            last_mint_time: token.last_mint_time(),
            years,
            total_minted,
            total_burned,
            final_supply: token.total_supply(),
            single_mint_amount,
        })
    }

    /// Issuance lost to per-mint flooring compared with one single mint
    pub fn rounding_loss(&self) -> u128 {
        self.single_mint_amount.saturating_sub(self.total_minted)
    }
}

/// Render base units as a decimal token amount, trailing zeros trimmed
pub fn format_tokens(amount: u128) -> String {
    let whole = amount / TOKEN_UNIT;
    let frac = amount % TOKEN_UNIT;
    if frac == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", frac, width = TOKEN_DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
