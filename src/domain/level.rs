//! Community levels and access rules.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Level identifier - newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u64);

impl LevelId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LevelId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What a wallet must do to access a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LevelRequirement {
    /// Anyone may join.
    Open,
    /// Holding `amount` of the base token grants access.
    Hold { amount: Decimal },
    /// Staking `amount` of the base token for `timelock_ms` grants access.
    Stake { amount: Decimal, timelock_ms: u64 },
}

impl LevelRequirement {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Hold { .. } => "hold",
            Self::Stake { .. } => "stake",
        }
    }

    /// Amount of base token the requirement refers to, zero for open levels.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Open => Decimal::ZERO,
            Self::Hold { amount } | Self::Stake { amount, .. } => *amount,
        }
    }
}

/// A community level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub requirement: LevelRequirement,
}

impl Level {
    /// The staking parameters, if this level is gated by staking.
    #[must_use]
    pub fn stake_requirement(&self) -> Option<StakeRequirement> {
        match self.requirement {
            LevelRequirement::Stake {
                amount,
                timelock_ms,
            } => Some(StakeRequirement::new(amount, timelock_ms)),
            _ => None,
        }
    }
}

/// Amount and lock period a stake must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeRequirement {
    /// Quantity of the base token, in whole-token units.
    pub amount: Decimal,
    pub timelock: Duration,
}

impl StakeRequirement {
    #[must_use]
    pub const fn new(amount: Decimal, timelock_ms: u64) -> Self {
        Self {
            amount,
            timelock: Duration::from_millis(timelock_ms),
        }
    }
}

/// Why a wallet cannot access a level yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    WalletNotConnected,
    /// Balances have not been loaded.
    LoadingRequirement,
    InsufficientBalance,
    /// The wallet holds enough tokens but still has to stake them.
    StakeRequired,
}

impl DenialReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WalletNotConnected => "Wallet not connected",
            Self::LoadingRequirement => "Loading requirement amount",
            Self::InsufficientBalance => "Insufficient balance",
            Self::StakeRequired => "Stake required",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "access", content = "reason", rename_all = "snake_case")]
pub enum LevelAccess {
    Granted,
    Denied(DenialReason),
}

impl LevelAccess {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Decide whether a wallet already satisfies a level requirement.
///
/// `token_balance` is the base token balance and `stake_balance` the balance
/// of the stake receipt token; `None` means not loaded yet.
#[must_use]
pub fn evaluate_access(
    requirement: &LevelRequirement,
    connected: bool,
    token_balance: Option<Decimal>,
    stake_balance: Option<Decimal>,
) -> LevelAccess {
    let required = match requirement {
        LevelRequirement::Open => return LevelAccess::Granted,
        LevelRequirement::Hold { amount } | LevelRequirement::Stake { amount, .. } => *amount,
    };

    if !connected {
        return LevelAccess::Denied(DenialReason::WalletNotConnected);
    }

    let (Some(token_balance), Some(stake_balance)) = (token_balance, stake_balance) else {
        return LevelAccess::Denied(DenialReason::LoadingRequirement);
    };

    if stake_balance >= required {
        return LevelAccess::Granted;
    }

    let outstanding = match requirement {
        LevelRequirement::Stake { .. } => required - stake_balance,
        _ => required,
    };

    if token_balance < outstanding {
        return LevelAccess::Denied(DenialReason::InsufficientBalance);
    }

    match requirement {
        LevelRequirement::Hold { .. } => LevelAccess::Granted,
        _ => LevelAccess::Denied(DenialReason::StakeRequired),
    }
}
