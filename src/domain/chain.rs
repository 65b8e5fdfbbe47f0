//! Supported chains.

use std::fmt;

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// An EVM chain the community contracts can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum Chain {
    Ethereum,
    Goerli,
    Polygon,
    Bsc,
    Other(u64),
}

impl Chain {
    /// Map a numeric chain ID onto a known chain.
    #[must_use]
    pub const fn from_id(id: u64) -> Self {
        match id {
            1 => Self::Ethereum,
            5 => Self::Goerli,
            56 => Self::Bsc,
            137 => Self::Polygon,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Goerli => 5,
            Self::Bsc => 56,
            Self::Polygon => 137,
            Self::Other(id) => id,
        }
    }

    /// Upper-case network name as used by the community backend.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Ethereum => "ETHEREUM".into(),
            Self::Goerli => "GOERLI".into(),
            Self::Polygon => "POLYGON".into(),
            Self::Bsc => "BSC".into(),
            Self::Other(id) => format!("CHAIN_{id}"),
        }
    }

    /// True for chains whose confirmation time is looked up from a gas tracker.
    #[must_use]
    pub const fn is_ethereum_family(self) -> bool {
        matches!(self, Self::Ethereum | Self::Goerli)
    }

    /// Block explorer link for a transaction, when the chain has a known explorer.
    #[must_use]
    pub fn explorer_tx_url(self, hash: &TxHash) -> Option<String> {
        let base = match self {
            Self::Ethereum => "https://etherscan.io",
            Self::Goerli => "https://goerli.etherscan.io",
            Self::Polygon => "https://polygonscan.com",
            Self::Bsc => "https://bscscan.com",
            Self::Other(_) => return None,
        };
        Some(format!("{base}/tx/{hash}"))
    }
}

impl From<u64> for Chain {
    fn from(id: u64) -> Self {
        Self::from_id(id)
    }
}

impl From<Chain> for u64 {
    fn from(chain: Chain) -> Self {
        chain.id()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_round_trip() {
        for chain in [Chain::Ethereum, Chain::Goerli, Chain::Polygon, Chain::Bsc] {
            assert_eq!(Chain::from_id(chain.id()), chain);
        }
    }

    #[test]
    fn unknown_id_is_other() {
        assert_eq!(Chain::from_id(42161), Chain::Other(42161));
        assert_eq!(Chain::Other(42161).name(), "CHAIN_42161");
    }

    #[test]
    fn only_ethereum_and_goerli_use_gas_tracker() {
        assert!(Chain::Ethereum.is_ethereum_family());
        assert!(Chain::Goerli.is_ethereum_family());
        assert!(!Chain::Polygon.is_ethereum_family());
        assert!(!Chain::Bsc.is_ethereum_family());
    }

    #[test]
    fn explorer_url_for_polygon() {
        let hash = TxHash::repeat_byte(0xab);
        let url = Chain::Polygon.explorer_tx_url(&hash).unwrap();
        assert!(url.starts_with("https://polygonscan.com/tx/0xabab"));
        assert!(Chain::Other(9).explorer_tx_url(&hash).is_none());
    }

    #[test]
    fn deserializes_from_number() {
        let chain: Chain = serde_json::from_str("137").unwrap();
        assert_eq!(chain, Chain::Polygon);
    }
}
