//! Platform join workflow: sign a message, exchange it for an invite link.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::machine::{self, JoinEffect, JoinEvent, JoinState, JOIN_MESSAGE};
use crate::application::machine::Transition;
use crate::application::session::{IdentityBound, Session};
use crate::domain::Identity;
use crate::port::{CommunityBackend, JoinRequest, MessageSigner};

/// Platform and community an invite is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTarget {
    /// Platform name as the backend knows it, e.g. `DISCORD`.
    pub platform: String,
    pub community_id: u64,
    pub platform_user_id: Option<String>,
}

struct Inner {
    generation: u64,
    enabled: bool,
    connected: bool,
    state: JoinState,
}

struct Shared {
    target: JoinTarget,
    signer: Arc<dyn MessageSigner>,
    backend: Arc<dyn CommunityBackend>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<JoinState>,
}

/// Join workflow for one platform of one community.
///
/// Resets to disabled whenever the connected account changes and re-enables
/// itself if it was enabled and a wallet is still connected.
pub struct JoinWorkflow {
    shared: Arc<Shared>,
}

impl JoinWorkflow {
    pub fn new(
        session: &Session,
        signer: Arc<dyn MessageSigner>,
        backend: Arc<dyn CommunityBackend>,
        target: JoinTarget,
        enabled: bool,
    ) -> Self {
        let connected = session.identity().is_connected();
        let state = if enabled && connected {
            JoinState::Idle
        } else {
            JoinState::Disabled
        };
        let (state_tx, _) = watch::channel(state.clone());
        let shared = Arc::new(Shared {
            target,
            signer,
            backend,
            inner: Mutex::new(Inner {
                generation: 0,
                enabled,
                connected,
                state,
            }),
            state_tx,
        });
        let member: Weak<dyn IdentityBound> = Arc::downgrade(&shared) as Weak<Shared>;
        session.register(member);
        Self { shared }
    }

    pub fn enable(&self) {
        let connected = {
            let mut inner = self.shared.inner.lock();
            inner.enabled = true;
            inner.connected
        };
        if connected {
            self.shared.dispatch(None, JoinEvent::Enable);
        }
    }

    /// Ask the wallet to sign the join message.
    pub fn sign(&self) {
        self.shared.dispatch(None, JoinEvent::Sign);
    }

    pub fn close_modal(&self) {
        self.shared.dispatch(None, JoinEvent::CloseModal);
    }

    #[must_use]
    pub fn state(&self) -> JoinState {
        self.shared.state_tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JoinState> {
        self.shared.state_tx.subscribe()
    }
}

impl Shared {
    fn reduce(&self, inner: &mut Inner, event: JoinEvent) -> Option<JoinEffect> {
        let from = inner.state.kind();
        let Some(Transition { next, effect }) = machine::reduce(&inner.state, event.clone()) else {
            debug!(platform = %self.target.platform, state = ?from, event = ?event, "Join event ignored");
            return None;
        };
        inner.state = next;
        info!(
            platform = %self.target.platform,
            from = ?from,
            to = ?inner.state.kind(),
            "Join transition"
        );
        self.state_tx.send_replace(inner.state.clone());
        effect
    }

    fn dispatch(self: &Arc<Self>, generation: Option<u64>, event: JoinEvent) {
        let (effect, current) = {
            let mut inner = self.inner.lock();
            if generation.is_some_and(|g| g != inner.generation) {
                debug!(platform = %self.target.platform, "Dropping stale join event");
                return;
            }
            (self.reduce(&mut inner, event), inner.generation)
        };
        if let Some(effect) = effect {
            self.run(current, effect);
        }
    }

    fn run(self: &Arc<Self>, generation: u64, effect: JoinEffect) {
        let weak = Arc::downgrade(self);
        match effect {
            JoinEffect::RequestSignature => {
                let signer = Arc::clone(&self.signer);
                tokio::spawn(async move {
                    let event = match signer.sign_message(JOIN_MESSAGE).await {
                        Ok(signature) => JoinEvent::Signed(signature),
                        Err(e) => {
                            warn!(error = %e, "Join message not signed");
                            JoinEvent::Failed(e)
                        }
                    };
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch(Some(generation), event);
                    }
                });
            }
            JoinEffect::FetchInvite(signature) => {
                let backend = Arc::clone(&self.backend);
                let request = JoinRequest {
                    platform: self.target.platform.clone(),
                    community_id: self.target.community_id,
                    address_signed_message: signature,
                    platform_user_id: self.target.platform_user_id.clone(),
                };
                tokio::spawn(async move {
                    let event = match backend.join_platform(&request).await {
                        Ok(invite) => {
                            info!(
                                platform = %request.platform,
                                already_joined = invite.already_joined,
                                "Invite received"
                            );
                            JoinEvent::Fetched(invite)
                        }
                        Err(e) => {
                            warn!(platform = %request.platform, error = %e, "Join request failed");
                            JoinEvent::Failed(e)
                        }
                    };
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch(Some(generation), event);
                    }
                });
            }
        }
    }
}

impl IdentityBound for Shared {
    fn identity_changed(&self, identity: &Identity) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.connected = identity.is_connected();
        self.reduce(&mut inner, JoinEvent::Reset);
        if inner.enabled && inner.connected {
            self.reduce(&mut inner, JoinEvent::Enable);
        }
    }
}
