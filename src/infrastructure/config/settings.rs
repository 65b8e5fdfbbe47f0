//! `stakegate.toml`: network, tokens, staking contract, levels and timing.
//!
//! The file never holds secrets. The signing key comes from the
//! `WALLET_PRIVATE_KEY` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use stakegate::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("stakegate.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use crate::adapter::outbound::catalog::LevelCatalog;
use crate::application::workflow::WorkflowConfig;
use crate::domain::{Address, Chain, Level, LevelId, LevelRequirement, Token};
use crate::error::{ConfigError, Result};

/// `[network]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub rpc_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            rpc_url: String::new(),
        }
    }
}

/// `[wallet]` section.
///
/// `account` lets read-only commands inspect an address without a key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub account: Option<Address>,
    /// Loaded from `WALLET_PRIVATE_KEY` at runtime, never from the file.
    #[serde(skip)]
    pub private_key: Option<String>,
}

/// `[staking]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StakingConfig {
    pub contract: Address,
    /// Call `stakeForLevel` instead of `stake`.
    #[serde(default)]
    pub level_aware: bool,
}

/// `[workflow]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// How long the "allowance granted" notice stays up.
    pub notification_ms: u64,
    /// Block polling interval of the EVM watcher.
    pub block_poll_ms: u64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            notification_ms: 500,
            block_poll_ms: 4_000,
        }
    }
}

/// `[backend]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub api_url: String,
    pub community_id: u64,
}

/// `[etherscan]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EtherscanConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Requirement type of a configured level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementType {
    #[default]
    Open,
    Hold,
    Stake,
}

/// One `[[levels]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: RequirementType,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub timelock_ms: u64,
}

impl LevelConfig {
    fn to_level(&self) -> Result<Level> {
        let amount = || -> Result<Decimal> {
            match self.amount {
                Some(amount) if amount > Decimal::ZERO => Ok(amount),
                Some(_) => Err(ConfigError::InvalidValue {
                    field: "levels.amount",
                    reason: format!("level {} amount must be greater than 0", self.id),
                }
                .into()),
                None => Err(ConfigError::MissingField {
                    field: "levels.amount",
                }
                .into()),
            }
        };

        let requirement = match self.kind {
            RequirementType::Open => LevelRequirement::Open,
            RequirementType::Hold => LevelRequirement::Hold { amount: amount()? },
            RequirementType::Stake => LevelRequirement::Stake {
                amount: amount()?,
                timelock_ms: self.timelock_ms,
            },
        };

        Ok(Level {
            id: LevelId::new(self.id),
            name: self.name.clone(),
            description: self.description.clone(),
            requirement,
        })
    }
}

/// Validated contents of `stakegate.toml`.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    /// Token the staking contract is approved to spend.
    pub token: Token,

    /// Token requirement amounts are denominated in. Defaults to `token`.
    #[serde(default)]
    pub stake_token: Option<Token>,

    pub staking: StakingConfig,

    #[serde(default)]
    pub workflow: WorkflowSettings,

    /// Community backend. Levels come from `[[levels]]` when absent.
    #[serde(default)]
    pub backend: Option<BackendConfig>,

    #[serde(default)]
    pub etherscan: EtherscanConfig,

    #[serde(default)]
    pub levels: Vec<LevelConfig>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the private key from the `WALLET_PRIVATE_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::MissingField { field: "rpc_url" }.into());
        }
        Url::parse(&self.network.rpc_url).map_err(|e| ConfigError::InvalidValue {
            field: "rpc_url",
            reason: e.to_string(),
        })?;
        if self.network.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain_id",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let tokens = [
            ("token", Some(&self.token)),
            ("stake_token", self.stake_token.as_ref()),
        ];
        for (field, token) in tokens {
            let Some(token) = token else { continue };
            if token.address == Address::ZERO {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "address must not be zero".to_string(),
                }
                .into());
            }
            if token.decimals > 28 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{} decimals is more than 28", token.decimals),
                }
                .into());
            }
        }

        if self.staking.contract == Address::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "contract",
                reason: "address must not be zero".to_string(),
            }
            .into());
        }

        if self.workflow.block_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "block_poll_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if let Some(backend) = &self.backend {
            Url::parse(&backend.api_url).map_err(|e| ConfigError::InvalidValue {
                field: "api_url",
                reason: e.to_string(),
            })?;
        }

        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(ConfigError::InvalidValue {
                    field: "levels.id",
                    reason: format!("level {} is defined twice", level.id),
                }
                .into());
            }
            level.to_level()?;
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[must_use]
    pub const fn chain(&self) -> Chain {
        Chain::from_id(self.network.chain_id)
    }

    /// Token requirement amounts are denominated in.
    #[must_use]
    pub fn stake_token(&self) -> &Token {
        self.stake_token.as_ref().unwrap_or(&self.token)
    }

    #[must_use]
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            token: self.token.clone(),
            stake_token: self.stake_token().clone(),
            notification_delay: Duration::from_millis(self.workflow.notification_ms),
            level_aware: self.staking.level_aware,
        }
    }

    #[must_use]
    pub const fn block_poll_interval(&self) -> Duration {
        Duration::from_millis(self.workflow.block_poll_ms)
    }

    /// Levels declared in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if a level is malformed. Validated configs never fail.
    pub fn catalog(&self) -> Result<LevelCatalog> {
        let levels = self
            .levels
            .iter()
            .map(LevelConfig::to_level)
            .collect::<Result<Vec<_>>>()?;
        Ok(LevelCatalog::new(levels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::config::CONFIG_TOML;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_canonical_config() {
        let config = Config::parse_toml(CONFIG_TOML).unwrap();
        assert_eq!(config.chain(), Chain::Goerli);
        assert_eq!(config.token.symbol, "GRO");
        assert_eq!(config.stake_token().symbol, "sGRO");
        assert_eq!(config.workflow.notification_ms, 500);
        assert_eq!(config.backend.as_ref().map(|b| b.community_id), Some(7));

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        let stake = catalog.get(LevelId::new(3)).unwrap();
        assert_eq!(
            stake.requirement,
            LevelRequirement::Stake {
                amount: dec!(250),
                timelock_ms: 2_592_000_000
            }
        );
    }

    #[test]
    fn stake_token_defaults_to_token() {
        let toml = CONFIG_TOML.replace("[stake_token]", "[unused_stake_token]");
        let config = Config::parse_toml(&toml).unwrap();
        assert_eq!(config.stake_token(), &config.token);
    }

    #[test]
    fn workflow_config_carries_delay() {
        let config = Config::parse_toml(CONFIG_TOML).unwrap();
        let workflow = config.workflow_config();
        assert_eq!(workflow.notification_delay, Duration::from_millis(500));
        assert!(!workflow.level_aware);
    }

    #[test]
    fn missing_rpc_url_is_rejected() {
        let toml = CONFIG_TOML.replace("rpc_url = \"http://localhost:8545\"", "rpc_url = \"\"");
        assert!(Config::parse_toml(&toml).is_err());
    }

    #[test]
    fn stake_level_without_amount_is_rejected() {
        let toml = format!(
            "{CONFIG_TOML}\n[[levels]]\nid = 9\nname = \"Broken\"\ntype = \"stake\"\n"
        );
        assert!(Config::parse_toml(&toml).is_err());
    }

    #[test]
    fn duplicate_level_ids_are_rejected() {
        let toml = format!("{CONFIG_TOML}\n[[levels]]\nid = 1\nname = \"Again\"\n");
        assert!(Config::parse_toml(&toml).is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let toml = format!("{CONFIG_TOML}\n[workflow]\nblock_poll_ms = 0\n");
        assert!(Config::parse_toml(&toml).is_err());
    }
}
