#![allow(dead_code)]

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use stakegate::adapter::outbound::catalog::LevelCatalog;
use stakegate::adapter::outbound::feed::BlockFeed;
use stakegate::application::{Session, StakeWorkflow, WorkflowConfig, WorkflowPorts, WorkflowSnapshot};
use stakegate::domain::{Address, Chain, Identity, LevelId, U256};
use stakegate::port::StakingContract;
use stakegate::testkit::chain::{MockStaking, MockToken};
use stakegate::testkit::domain::{account, hold_level, open_level, stake_level, token};

/// Level that requires staking 250 GRO for 30 days.
pub const STAKE_LEVEL: LevelId = LevelId::new(3);

/// 250 tokens with 18 decimals.
pub fn stake_amount() -> U256 {
    U256::from(250u64) * U256::from(10u64).pow(U256::from(18))
}

pub fn owner() -> Address {
    account(1)
}

/// One connected wallet on Goerli with in-memory contracts behind it.
pub struct Harness {
    pub session: Arc<Session>,
    pub token: Arc<MockToken>,
    pub staking: Arc<MockStaking>,
    pub feed: Arc<BlockFeed>,
    pub catalog: Arc<LevelCatalog>,
    pub config: WorkflowConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut WorkflowConfig)) -> Self {
        let mut config = WorkflowConfig::new(token("GRO", 18), token("GRO", 18));
        adjust(&mut config);
        Self {
            session: Session::new(Identity::new(Some(owner()), Chain::Goerli)),
            token: Arc::new(MockToken::new()),
            staking: Arc::new(MockStaking::new()),
            feed: Arc::new(BlockFeed::new()),
            catalog: Arc::new(LevelCatalog::new([
                open_level(1),
                hold_level(2, dec!(10)),
                stake_level(3, dec!(250), 2_592_000_000),
            ])),
            config,
        }
    }

    pub fn ports(&self) -> WorkflowPorts {
        WorkflowPorts {
            token: self.token.clone(),
            staking: self.staking.clone(),
            requirements: self.catalog.clone(),
            blocks: self.feed.clone(),
        }
    }

    /// A new workflow instance bound to this harness's session.
    pub fn workflow(&self) -> StakeWorkflow {
        StakeWorkflow::new(&self.session, self.ports(), self.config.clone())
    }

    /// Give the staking contract an unlimited allowance from `owner`.
    pub fn grant_allowance(&self, owner: Address) {
        self.token
            .set_allowance(owner, self.staking.address(), U256::MAX);
    }
}

/// Wait until a snapshot satisfies `done`, failing after five seconds.
pub async fn wait_for(
    workflow: &StakeWorkflow,
    done: impl Fn(&WorkflowSnapshot) -> bool,
) -> WorkflowSnapshot {
    let mut updates = workflow.subscribe();
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if done(&snapshot) {
                return snapshot;
            }
            updates.changed().await.expect("workflow dropped");
        }
    })
    .await;
    match waited {
        Ok(snapshot) => snapshot,
        Err(_) => panic!("condition not reached, last snapshot: {:?}", workflow.snapshot()),
    }
}

/// Let spawned effects run to completion.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
