//! Stake workflow coordinator.
//!
//! Composes the allowance and stake machines into one user-facing sequence.
//! Both machines are pure reducers driven under a single lock; their effects
//! run in spawned tasks whose results come back as events tagged with the
//! generation they were started in. Any reset bumps the generation, so work
//! abandoned by a reset is dropped when it eventually completes.

use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::state::{WorkflowSnapshot, WorkflowState};
use crate::application::allowance::{
    self, AllowanceChecker, AllowanceEffect, AllowanceEvent, AllowanceState,
};
use crate::application::machine::Transition;
use crate::application::session::{IdentityBound, Session};
use crate::application::stake::{self, StakeEffect, StakeEvent, StakeState};
use crate::domain::{
    AllowanceStatus, Identity, LevelId, StakeRequirement, Token, TxError, U256,
};
use crate::error::{Result, WorkflowError};
use crate::port::{
    BlockNotifier, BlockSubscription, RequirementSource, StakingContract, TokenContract,
};

/// Static parameters of a workflow instance.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Token the staking contract must be approved to spend.
    pub token: Token,
    /// Token the requirement amount is denominated in when staking.
    pub stake_token: Token,
    /// How long the "you can now stake" notice stays up.
    pub notification_delay: Duration,
    /// Pass the level id to the staking contract.
    pub level_aware: bool,
}

impl WorkflowConfig {
    pub const DEFAULT_NOTIFICATION_DELAY: Duration = Duration::from_millis(500);

    #[must_use]
    pub fn new(token: Token, stake_token: Token) -> Self {
        Self {
            token,
            stake_token,
            notification_delay: Self::DEFAULT_NOTIFICATION_DELAY,
            level_aware: false,
        }
    }
}

/// Outbound dependencies of a workflow instance.
#[derive(Clone)]
pub struct WorkflowPorts {
    pub token: Arc<dyn TokenContract>,
    pub staking: Arc<dyn StakingContract>,
    pub requirements: Arc<dyn RequirementSource>,
    pub blocks: Arc<dyn BlockNotifier>,
}

struct Inner {
    generation: u64,
    level: Option<LevelId>,
    requirement: Option<StakeRequirement>,
    stake_amount: Option<U256>,
    allowance: AllowanceState,
    stake: StakeState,
}

/// Amount and level of the stake about to be submitted.
type StakeOrder = (U256, Option<LevelId>);

struct Shared {
    id: Uuid,
    config: WorkflowConfig,
    ports: WorkflowPorts,
    checker: AllowanceChecker,
    inner: Mutex<Inner>,
    snapshot: watch::Sender<WorkflowSnapshot>,
    refresh: Notify,
}

/// One "stake to join" workflow, scoped to a single user, community and level.
///
/// The instance subscribes to new blocks on construction and releases the
/// subscription when dropped. It registers with the [`Session`] and resets
/// itself whenever the connected account or chain changes.
///
/// Must be created inside a tokio runtime.
pub struct StakeWorkflow {
    shared: Arc<Shared>,
    revalidation: JoinHandle<()>,
}

impl StakeWorkflow {
    pub fn new(session: &Session, ports: WorkflowPorts, config: WorkflowConfig) -> Self {
        let identity = session.identity();
        let checker = AllowanceChecker::new(
            Arc::clone(&ports.token),
            ports.staking.address(),
            identity.account,
        );
        let (snapshot, _) = watch::channel(WorkflowSnapshot::closed(AllowanceStatus::Unknown));
        let blocks = ports.blocks.subscribe();

        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            config,
            ports,
            checker,
            inner: Mutex::new(Inner {
                generation: 0,
                level: None,
                requirement: None,
                stake_amount: None,
                allowance: AllowanceState::Idle,
                stake: StakeState::Idle,
            }),
            snapshot,
            refresh: Notify::new(),
        });

        let member: Weak<dyn IdentityBound> = Arc::downgrade(&shared) as Weak<Shared>;
        session.register(member);

        shared.refresh.notify_one();
        let revalidation = tokio::spawn(revalidate_on_blocks(Arc::clone(&shared), blocks));

        debug!(workflow = %shared.id, account = ?identity.account, "Workflow created");
        Self {
            shared,
            revalidation,
        }
    }

    /// Instance identifier used in logs.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Open the workflow for `level`.
    ///
    /// Resolves the level's requirement, resets both machines and feeds the
    /// last allowance reading, so an already sufficient allowance shows as
    /// approved straight away.
    ///
    /// # Errors
    ///
    /// Returns an error if the requirement cannot be resolved or its amount
    /// cannot be expressed in stake-token base units.
    pub async fn open(&self, level: LevelId) -> Result<WorkflowSnapshot> {
        let shared = &self.shared;
        let requirement = shared.ports.requirements.requirement(level).await?;
        let stake_token = &shared.config.stake_token;
        let stake_amount = stake_token.to_base_units(requirement.amount).ok_or_else(|| {
            WorkflowError::InvalidAmount {
                amount: requirement.amount.to_string(),
                decimals: stake_token.decimals,
            }
        })?;

        {
            let mut inner = shared.inner.lock();
            inner.generation += 1;
            inner.level = Some(level);
            inner.requirement = Some(requirement);
            inner.stake_amount = Some(stake_amount);
            shared.close_machines(&mut inner);
            shared.reduce_allowance(&mut inner, AllowanceEvent::Observed(shared.checker.status()));
            shared.publish(&inner);
        }
        shared.refresh.notify_one();

        info!(
            workflow = %shared.id,
            level = %level,
            amount = %requirement.amount,
            symbol = %stake_token.symbol,
            "Workflow opened"
        );
        Ok(self.snapshot())
    }

    /// Ask the wallet to approve the staking contract.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotOpen`] if no level is open.
    pub fn allow(&self) -> Result<()> {
        self.shared.require_open()?;
        self.shared.allowance_event(None, AllowanceEvent::Allow);
        Ok(())
    }

    /// Close the approval notice before its timer fires.
    pub fn dismiss_notification(&self) {
        self.shared
            .allowance_event(None, AllowanceEvent::DismissNotification);
    }

    /// Submit the stake.
    ///
    /// Only accepted while the allowance is granted. A request made while a
    /// stake is already in flight is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotOpen`] if no level is open and
    /// [`WorkflowError::StakeNotEnabled`] if the allowance is not granted. The
    /// stake machine is untouched in both cases.
    pub fn confirm_stake(&self) -> Result<()> {
        let shared = &self.shared;
        let (effect, generation, order) = {
            let mut inner = shared.inner.lock();
            if inner.level.is_none() {
                return Err(WorkflowError::NotOpen.into());
            }
            if !inner.allowance.is_granted() {
                warn!(
                    workflow = %shared.id,
                    allowance = ?inner.allowance.kind(),
                    "Stake rejected before allowance was granted"
                );
                return Err(WorkflowError::StakeNotEnabled.into());
            }
            let effect = shared.reduce_stake(&mut inner, StakeEvent::Stake);
            if effect.is_some() {
                shared.publish(&inner);
            }
            (effect, inner.generation, shared.stake_order(&inner))
        };
        if let Some(effect) = effect {
            shared.run_stake_effect(generation, effect, order);
        }
        Ok(())
    }

    /// Reset both machines, then invoke `on_close`.
    pub fn close(&self, on_close: impl FnOnce()) {
        {
            let shared = &self.shared;
            let mut inner = shared.inner.lock();
            inner.generation += 1;
            inner.level = None;
            inner.requirement = None;
            inner.stake_amount = None;
            shared.close_machines(&mut inner);
            shared.publish(&inner);
            info!(workflow = %shared.id, "Workflow closed");
        }
        on_close();
    }

    /// Re-arm the workflow for the same level, discarding any error or
    /// finished stake.
    pub fn reset(&self) {
        let shared = &self.shared;
        {
            let mut inner = shared.inner.lock();
            inner.generation += 1;
            shared.close_machines(&mut inner);
            if inner.level.is_some() {
                shared.reduce_allowance(
                    &mut inner,
                    AllowanceEvent::Observed(shared.checker.status()),
                );
            }
            shared.publish(&inner);
        }
        shared.refresh.notify_one();
        info!(workflow = %shared.id, "Workflow reset");
    }

    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.shared.snapshot.borrow().state
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Receive a snapshot every time the workflow changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Trigger an allowance check without waiting for the next block.
    pub fn refresh(&self) {
        self.shared.refresh.notify_one();
    }
}

impl Drop for StakeWorkflow {
    fn drop(&mut self) {
        self.revalidation.abort();
        debug!(workflow = %self.shared.id, "Workflow dropped");
    }
}

impl Shared {
    fn require_open(&self) -> Result<()> {
        if self.inner.lock().level.is_none() {
            return Err(WorkflowError::NotOpen.into());
        }
        Ok(())
    }

    fn publish(&self, inner: &Inner) {
        let next = WorkflowSnapshot::build(
            inner.level,
            inner.requirement,
            inner.stake_amount,
            inner.allowance.clone(),
            inner.stake.clone(),
            self.checker.status(),
        );
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn stake_order(&self, inner: &Inner) -> Option<StakeOrder> {
        let level = inner.level.filter(|_| self.config.level_aware);
        inner.stake_amount.map(|amount| (amount, level))
    }

    fn close_machines(&self, inner: &mut Inner) {
        self.reduce_allowance(inner, AllowanceEvent::CloseModal);
        self.reduce_stake(inner, StakeEvent::CloseModal);
    }

    fn reduce_allowance(
        &self,
        inner: &mut Inner,
        event: AllowanceEvent,
    ) -> Option<AllowanceEffect> {
        let from = inner.allowance.kind();
        let Some(Transition { next, effect }) =
            allowance::machine::reduce(&inner.allowance, event.clone())
        else {
            debug!(workflow = %self.id, state = ?from, event = ?event, "Allowance event ignored");
            return None;
        };
        inner.allowance = next;
        let to = inner.allowance.kind();
        if from != to {
            info!(workflow = %self.id, from = ?from, to = ?to, "Allowance transition");
        }
        effect
    }

    fn reduce_stake(&self, inner: &mut Inner, event: StakeEvent) -> Option<StakeEffect> {
        let from = inner.stake.kind();
        let Some(Transition { next, effect }) =
            stake::machine::reduce(&inner.stake, event.clone())
        else {
            debug!(workflow = %self.id, state = ?from, event = ?event, "Stake event ignored");
            return None;
        };
        inner.stake = next;
        let to = inner.stake.kind();
        if from != to {
            info!(workflow = %self.id, from = ?from, to = ?to, "Stake transition");
        }
        effect
    }

    /// Feed an allowance event. Events produced by async work carry the
    /// generation they were started in and are dropped if it is stale.
    fn allowance_event(self: &Arc<Self>, generation: Option<u64>, event: AllowanceEvent) {
        let (effect, current) = {
            let mut inner = self.inner.lock();
            if generation.is_some_and(|g| g != inner.generation) {
                debug!(workflow = %self.id, event = ?event, "Dropping stale allowance event");
                return;
            }
            let effect = self.reduce_allowance(&mut inner, event);
            self.publish(&inner);
            (effect, inner.generation)
        };
        if let Some(effect) = effect {
            self.run_allowance_effect(current, effect);
        }
    }

    fn stake_event(self: &Arc<Self>, generation: Option<u64>, event: StakeEvent) {
        let (effect, current, order) = {
            let mut inner = self.inner.lock();
            if generation.is_some_and(|g| g != inner.generation) {
                debug!(workflow = %self.id, event = ?event, "Dropping stale stake event");
                return;
            }
            let effect = self.reduce_stake(&mut inner, event);
            self.publish(&inner);
            (effect, inner.generation, self.stake_order(&inner))
        };
        if let Some(effect) = effect {
            self.run_stake_effect(current, effect, order);
        }
    }

    /// Run `work` in a task and hand its output back if the workflow still
    /// exists.
    fn spawn_effect<F, T>(
        self: &Arc<Self>,
        work: F,
        deliver: impl FnOnce(&Arc<Self>, T) + Send + 'static,
    ) where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::downgrade(self);
        tokio::spawn(async move {
            let output = work.await;
            if let Some(shared) = shared.upgrade() {
                deliver(&shared, output);
            }
        });
    }

    fn run_allowance_effect(self: &Arc<Self>, generation: u64, effect: AllowanceEffect) {
        let id = self.id;
        match effect {
            AllowanceEffect::RequestApproval => {
                let token = Arc::clone(&self.ports.token);
                let spender = self.ports.staking.address();
                info!(workflow = %id, spender = %spender, "Requesting token approval");
                self.spawn_effect(
                    async move { token.approve(spender, U256::MAX).await },
                    move |shared, result| {
                        let event = match result {
                            Ok(tx) => {
                                info!(workflow = %id, tx = %tx.hash(), "Approval submitted");
                                AllowanceEvent::Submitted(tx)
                            }
                            Err(e) => {
                                warn!(workflow = %id, error = %e, "Approval not submitted");
                                AllowanceEvent::Failed(e)
                            }
                        };
                        shared.allowance_event(Some(generation), event);
                    },
                );
            }
            AllowanceEffect::AwaitConfirmation(tx) => {
                self.spawn_effect(async move { tx.wait().await }, move |shared, result| {
                    match result {
                        Ok(receipt) => {
                            info!(
                                workflow = %id,
                                tx = %receipt.transaction_hash,
                                block = ?receipt.block_number,
                                "Approval confirmed"
                            );
                            shared.allowance_event(Some(generation), AllowanceEvent::Confirmed);
                            shared.refresh.notify_one();
                        }
                        Err(e) => {
                            warn!(workflow = %id, error = %e, "Approval failed");
                            shared.allowance_event(Some(generation), AllowanceEvent::Failed(e));
                        }
                    }
                });
            }
            AllowanceEffect::ScheduleNotificationExpiry => {
                let delay = self.config.notification_delay;
                self.spawn_effect(tokio::time::sleep(delay), move |shared, ()| {
                    shared.allowance_event(Some(generation), AllowanceEvent::NotificationElapsed);
                });
            }
        }
    }

    fn run_stake_effect(
        self: &Arc<Self>,
        generation: u64,
        effect: StakeEffect,
        order: Option<StakeOrder>,
    ) {
        let id = self.id;
        match effect {
            StakeEffect::SubmitStake => {
                let Some((amount, level)) = order else {
                    self.stake_event(
                        Some(generation),
                        StakeEvent::Failed(TxError::backend("stake amount is not resolved")),
                    );
                    return;
                };
                let staking = Arc::clone(&self.ports.staking);
                info!(workflow = %id, amount = %amount, level = ?level, "Submitting stake");
                self.spawn_effect(
                    async move { staking.stake(amount, level).await },
                    move |shared, result| {
                        let event = match result {
                            Ok(tx) => {
                                info!(workflow = %id, tx = %tx.hash(), "Stake submitted");
                                StakeEvent::Submitted(tx)
                            }
                            Err(e) => {
                                warn!(workflow = %id, error = %e, "Stake not submitted");
                                StakeEvent::Failed(e)
                            }
                        };
                        shared.stake_event(Some(generation), event);
                    },
                );
            }
            StakeEffect::AwaitConfirmation(tx) => {
                self.spawn_effect(async move { tx.wait().await }, move |shared, result| {
                    let event = match result {
                        Ok(receipt) => {
                            info!(
                                workflow = %id,
                                tx = %receipt.transaction_hash,
                                block = ?receipt.block_number,
                                "Stake confirmed"
                            );
                            StakeEvent::Confirmed(receipt)
                        }
                        Err(e) => {
                            warn!(workflow = %id, error = %e, "Stake failed on chain");
                            StakeEvent::Failed(e)
                        }
                    };
                    shared.stake_event(Some(generation), event);
                });
            }
        }
    }

    /// Re-read the allowance and feed the result to an open workflow.
    async fn revalidate(self: &Arc<Self>) {
        let status = self.checker.refresh().await;
        let opened = self.inner.lock().level.is_some();
        if opened {
            self.allowance_event(None, AllowanceEvent::Observed(status));
        } else {
            self.publish(&self.inner.lock());
        }
    }
}

impl IdentityBound for Shared {
    fn identity_changed(&self, identity: &Identity) {
        self.checker.set_owner(identity.account);
        {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            self.close_machines(&mut inner);
            self.publish(&inner);
        }
        self.refresh.notify_one();
        info!(
            workflow = %self.id,
            account = ?identity.account,
            chain = %identity.chain.name(),
            "Workflow reset after identity change"
        );
    }
}

async fn revalidate_on_blocks(shared: Arc<Shared>, mut blocks: BlockSubscription) {
    let mut feed_open = true;
    loop {
        tokio::select! {
            block = blocks.next_block(), if feed_open => match block {
                Some(number) => debug!(workflow = %shared.id, block = number, "New block"),
                None => {
                    debug!(workflow = %shared.id, "Block feed closed");
                    feed_open = false;
                    continue;
                }
            },
            () = shared.refresh.notified() => {}
        }
        shared.revalidate().await;
    }
}
