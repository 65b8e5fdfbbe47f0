//! Scripted off-chain collaborators: wallet signer, community backend and
//! gas tracker.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Chain, Level, TxError, TxResult};
use crate::error::{Error, Result};
use crate::port::{CommunityBackend, GasTracker, Invite, JoinRequest, MessageSigner};

/// Signer that pops scripted signatures, then signs with `0xsigned`.
#[derive(Default)]
pub struct ScriptedSigner {
    results: Mutex<VecDeque<TxResult<String>>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        let signer = Self::new();
        signer.script(Err(TxError::user_rejected("User denied message signature")));
        signer
    }

    pub fn script(&self, result: TxResult<String>) {
        self.results.lock().push_back(result);
    }

    /// Every message signed so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl MessageSigner for ScriptedSigner {
    async fn sign_message(&self, message: &str) -> TxResult<String> {
        self.messages.lock().push(message.to_string());
        let scripted = self.results.lock().pop_front();
        scripted.unwrap_or_else(|| Ok("0xsigned".to_string()))
    }
}

/// Community backend serving fixed levels and scripted invites.
#[derive(Default)]
pub struct ScriptedBackend {
    levels: Vec<Level>,
    invites: Mutex<VecDeque<TxResult<Invite>>>,
    requests: Mutex<Vec<JoinRequest>>,
}

impl ScriptedBackend {
    pub fn new(levels: Vec<Level>) -> Self {
        Self {
            levels,
            ..Self::default()
        }
    }

    pub fn script_invite(&self, result: TxResult<Invite>) {
        self.invites.lock().push_back(result);
    }

    /// Every join request received so far.
    pub fn requests(&self) -> Vec<JoinRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CommunityBackend for ScriptedBackend {
    async fn levels(&self) -> Result<Vec<Level>> {
        Ok(self.levels.clone())
    }

    async fn join_platform(&self, request: &JoinRequest) -> TxResult<Invite> {
        self.requests.lock().push(request.clone());
        let scripted = self.invites.lock().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(Invite {
                invite_link: format!("https://invite.test/{}", request.community_id),
                already_joined: false,
            })
        })
    }
}

/// Gas tracker with a fixed answer.
pub struct ScriptedGasTracker {
    answer: std::result::Result<Duration, String>,
    lookups: Mutex<Vec<(Chain, u128)>>,
}

impl ScriptedGasTracker {
    pub fn answering(estimate: Duration) -> Self {
        Self {
            answer: Ok(estimate),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            answer: Err(reason.to_string()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// `(chain, gas_price)` of every lookup so far.
    pub fn lookups(&self) -> Vec<(Chain, u128)> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl GasTracker for ScriptedGasTracker {
    async fn confirmation_time(&self, chain: Chain, gas_price: u128) -> Result<Duration> {
        self.lookups.lock().push((chain, gas_price));
        self.answer.clone().map_err(Error::GasTracker)
    }
}
