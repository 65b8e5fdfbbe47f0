use thiserror::Error;

use crate::domain::failure::TxError;
use crate::domain::level::LevelId;

/// Problems with `stakegate.toml`. `field` names the offending key.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`{field}` is required")]
    MissingField { field: &'static str },

    #[error("`{field}` is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("config file is unreadable: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Workflow guard and input errors.
///
/// These are returned to the caller of a workflow operation and never stored
/// in a sub-machine: they describe a request the workflow refused, not a
/// failure of the wallet or chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("workflow is not open for any level")]
    NotOpen,

    #[error("staking is not enabled until the token allowance is granted")]
    StakeNotEnabled,

    #[error("level {0} does not exist")]
    UnknownLevel(LevelId),

    #[error("level {0} does not require staking")]
    NotStakeable(LevelId),

    #[error("amount {amount} cannot be represented with {decimals} decimals")]
    InvalidAmount { amount: String, decimals: u8 },

    #[error("no wallet account is connected")]
    NoAccount,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Transaction(#[from] TxError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bad url: {0}")]
    Url(#[from] url::ParseError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("gas tracker error: {0}")]
    GasTracker(String),
}

pub type Result<T> = std::result::Result<T, Error>;
