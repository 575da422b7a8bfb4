//! Token configuration file (TOML) support
//!
//! Example:
//! ```toml
//! [token]
//! name = "Z"
//! symbol = "Z"
//! admin = "0x1111111111111111111111111111111111111111"
//! admin_delay = 259200
//! minter = "0x1111111111111111111111111111111111111111"
//! mint_beneficiary = "0x2222222222222222222222222222222222222222"
//! initial_supply = 1000000000
//! inflation_rates = [0, 900, 765, 650, 552, 469, 398, 338, 287, 243, 206, 175]
//! final_inflation_rate = 150
//!
//! [simulation]
//! deploy_time = 1722542400
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use z_issuance::constants::{
    BASIS_POINTS, DEFAULT_FINAL_INFLATION_RATE, DEFAULT_INFLATION_RATES,
};
use z_token::{Address, Clock, ManualClock, TokenError, TokenParams, ZToken};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Inflation rates array is empty")]
    EmptyInflationRates,

    #[error("Inflation rates array is invalid, first element has to be 0 (got {0})")]
    InvalidSentinel(u16),

    #[error("Inflation rate {rate} at index {index} is too high, maximum is 10000 (100%)")]
    RateTooHigh { index: usize, rate: u16 },

    #[error("Initial supply has to be greater than 0")]
    ZeroInitialSupply,

    #[error("Simulation interval has to be greater than 0")]
    ZeroInterval,

    #[error("Burn share {0} is too high, maximum is 10000 (100%)")]
    InvalidBurnShare(u16),

    #[error("Simulation needs {mints} mints, maximum is {max}")]
    TooManyMints { mints: u64, max: u64 },

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Token construction parameters as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub admin: Address,
    #[serde(default = "default_admin_delay")]
    pub admin_delay: u64,
    pub minter: Address,
    pub mint_beneficiary: Address,
    pub initial_supply: u128,
    pub inflation_rates: Vec<u16>,
    pub final_inflation_rate: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Epoch used for offline queries; defaults to the current time
    pub deploy_time: Option<u64>,
}

fn default_admin_delay() -> u64 {
    259_200 // 3 days
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Z".to_string(),
            symbol: "Z".to_string(),
            admin: Address::repeat_byte(0x11),
            admin_delay: default_admin_delay(),
            minter: Address::repeat_byte(0x11),
            mint_beneficiary: Address::repeat_byte(0x22),
            initial_supply: 1_000_000_000,
            inflation_rates: DEFAULT_INFLATION_RATES.to_vec(),
            final_inflation_rate: DEFAULT_FINAL_INFLATION_RATE,
        }
    }
}

impl Config {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.token.validate()?;
        Ok(config)
    }

    /// Deploy a token on a manual clock set to the configured epoch
    pub fn deploy(&self, now: u64) -> Result<(ZToken, Arc<ManualClock>)> {
        let deploy_time = self.simulation.deploy_time.unwrap_or(now);
        let clock = Arc::new(ManualClock::new(deploy_time));
        let token = ZToken::new(self.token.to_params(), clock.clone() as Arc<dyn Clock>)?;
        Ok((token, clock))
    }
}

impl TokenConfig {
    /// Deployment-time checks on top of what the token itself enforces
    pub fn validate(&self) -> Result<()> {
        let first = *self
            .inflation_rates
            .first()
            .ok_or(ConfigError::EmptyInflationRates)?;
        if first != 0 {
            return Err(ConfigError::InvalidSentinel(first));
        }

        let all_rates = self
            .inflation_rates
            .iter()
            .chain(std::iter::once(&self.final_inflation_rate));
        for (index, rate) in all_rates.enumerate() {
            if u128::from(*rate) > BASIS_POINTS {
                return Err(ConfigError::RateTooHigh { index, rate: *rate });
            }
        }

        if self.initial_supply == 0 {
            return Err(ConfigError::ZeroInitialSupply);
        }

        Ok(())
    }

    pub fn to_params(&self) -> TokenParams {
        TokenParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            admin: self.admin,
            admin_delay: self.admin_delay,
            minter: self.minter,
            mint_beneficiary: self.mint_beneficiary,
            initial_supply: self.initial_supply,
            inflation_rates: self.inflation_rates.clone(),
            final_inflation_rate: self.final_inflation_rate,
        }
    }
}
