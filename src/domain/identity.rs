//! Connected wallet identity.

use alloy_primitives::Address;

use super::chain::Chain;

/// The account and chain every workflow on a page operates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Connected account, `None` while no wallet is connected.
    pub account: Option<Address>,
    pub chain: Chain,
}

impl Identity {
    #[must_use]
    pub const fn new(account: Option<Address>, chain: Chain) -> Self {
        Self { account, chain }
    }

    #[must_use]
    pub const fn disconnected(chain: Chain) -> Self {
        Self {
            account: None,
            chain,
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}
