//! Timestamp to issuance-year resolution

use serde::{Deserialize, Serialize};

use crate::constants::YEAR_SECONDS;
use crate::error::{IssuanceError, Result};

/// Maps unix timestamps onto 1-based issuance years counted from a fixed epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearResolver {
    deploy_time: u64,
}

impl YearResolver {
    pub fn new(deploy_time: u64) -> Self {
        Self { deploy_time }
    }

    pub fn deploy_time(&self) -> u64 {
        self.deploy_time
    }

    /// Year index containing `timestamp`; the epoch itself is in year 1
    pub fn year_since_deploy(&self, timestamp: u64) -> Result<u64> {
        if timestamp < self.deploy_time {
            return Err(IssuanceError::InvalidTime {
                lower_bound: self.deploy_time,
                actual: timestamp,
            });
        }

        Ok((timestamp - self.deploy_time) / YEAR_SECONDS + 1)
    }

    /// First second of `year`. Saturates for years no u64 timestamp can reach.
    pub fn year_start(&self, year: u64) -> u64 {
        year.saturating_sub(1)
            .saturating_mul(YEAR_SECONDS)
            .saturating_add(self.deploy_time)
    }

    /// Seconds elapsed inside `year` at `timestamp`.
    ///
    /// `year` must be the index `year_since_deploy` returns for `timestamp`,
    /// which keeps the result in `[0, YEAR_SECONDS)`.
    pub fn offset_in_year(&self, timestamp: u64, year: u64) -> u64 {
        let start = self.year_start(year);
        debug_assert!(timestamp >= start, "timestamp {timestamp} before year {year}");
        timestamp - start
    }
}
