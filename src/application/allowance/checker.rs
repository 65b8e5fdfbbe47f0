//! Allowance checker.
//!
//! Reads the ERC-20 allowance of the connected owner towards the staking
//! contract and classifies it as sufficient or not. Callers drive
//! [`AllowanceChecker::refresh`] from block notifications; the checker itself
//! holds no subscription.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::{Address, AllowanceKey, AllowanceStatus};
use crate::port::TokenContract;

#[derive(Debug)]
struct CheckerState {
    owner: Option<Address>,
    status: AllowanceStatus,
}

/// Tracks whether the spender holds sufficient allowance for the current owner.
pub struct AllowanceChecker {
    token: Arc<dyn TokenContract>,
    spender: Address,
    state: Mutex<CheckerState>,
}

impl AllowanceChecker {
    pub fn new(token: Arc<dyn TokenContract>, spender: Address, owner: Option<Address>) -> Self {
        Self {
            token,
            spender,
            state: Mutex::new(CheckerState {
                owner,
                status: AllowanceStatus::Unknown,
            }),
        }
    }

    /// The triple currently checked, if an owner is connected.
    #[must_use]
    pub fn key(&self) -> Option<AllowanceKey> {
        self.state.lock().owner.map(|owner| AllowanceKey {
            owner,
            token: self.token.address(),
            spender: self.spender,
        })
    }

    /// Last known status.
    #[must_use]
    pub fn status(&self) -> AllowanceStatus {
        self.state.lock().status
    }

    /// Switch to a different owner. The status becomes unknown until the next
    /// refresh completes.
    pub fn set_owner(&self, owner: Option<Address>) {
        let mut state = self.state.lock();
        if state.owner == owner {
            return;
        }
        state.owner = owner;
        state.status = AllowanceStatus::Unknown;
    }

    /// Query the chain and update the status.
    ///
    /// Without an owner nothing is fetched and the status stays unknown. A
    /// failed query keeps the previous status; the next block retries it. A
    /// result that arrives after the owner changed is discarded.
    pub async fn refresh(&self) -> AllowanceStatus {
        let Some(owner) = self.state.lock().owner else {
            return AllowanceStatus::Unknown;
        };

        let amount = match self.token.allowance(owner, self.spender).await {
            Ok(amount) => amount,
            Err(e) => {
                warn!(owner = %owner, error = %e, "Allowance query failed, keeping previous value");
                return self.status();
            }
        };

        let status = AllowanceStatus::from_amount(amount);
        let mut state = self.state.lock();
        if state.owner != Some(owner) {
            debug!(owner = %owner, "Discarding allowance for previous owner");
            return state.status;
        }
        if state.status != status {
            debug!(owner = %owner, status = %status, "Allowance status changed");
            state.status = status;
        }
        status
    }
}
