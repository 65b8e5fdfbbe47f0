//! Builders for domain primitives used across tests.

use rust_decimal::Decimal;

use crate::domain::{Address, Level, LevelId, LevelRequirement, Token};

/// Token with a deterministic address derived from its symbol.
pub fn token(symbol: &str, decimals: u8) -> Token {
    let tag = symbol.bytes().fold(0u8, u8::wrapping_add);
    Token {
        address: Address::repeat_byte(tag),
        symbol: symbol.to_string(),
        name: format!("{symbol} Token"),
        decimals,
    }
}

pub fn open_level(id: u64) -> Level {
    level(id, LevelRequirement::Open)
}

pub fn hold_level(id: u64, amount: Decimal) -> Level {
    level(id, LevelRequirement::Hold { amount })
}

pub fn stake_level(id: u64, amount: Decimal, timelock_ms: u64) -> Level {
    level(id, LevelRequirement::Stake { amount, timelock_ms })
}

fn level(id: u64, requirement: LevelRequirement) -> Level {
    Level {
        id: LevelId::new(id),
        name: format!("Level {id}"),
        description: None,
        requirement,
    }
}

/// Wallet account `n`.
pub fn account(n: u8) -> Address {
    Address::repeat_byte(n)
}
