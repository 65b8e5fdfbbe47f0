//! Composition root: wires configuration into adapters and workflows.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::outbound::backend::HttpBackend;
use crate::adapter::outbound::etherscan::Etherscan;
use crate::application::TransactionTimeEstimator;
use crate::domain::Level;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{CommunityBackend, GasTracker, RequirementSource};

/// Backend client for the configured community, if any.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid.
pub fn build_backend(config: &Config) -> Result<Option<Arc<HttpBackend>>> {
    config
        .backend
        .as_ref()
        .map(|backend| HttpBackend::new(&backend.api_url, backend.community_id).map(Arc::new))
        .transpose()
}

/// Where level requirements are resolved: the backend when configured,
/// otherwise the `[[levels]]` declared in the file.
///
/// # Errors
///
/// Returns an error if the backend URL or a declared level is invalid.
pub fn build_requirement_source(config: &Config) -> Result<Arc<dyn RequirementSource>> {
    if let Some(backend) = build_backend(config)? {
        debug!(community = backend.community_id(), "Resolving levels from backend");
        return Ok(backend);
    }
    Ok(Arc::new(config.catalog()?))
}

/// Levels of the configured community.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or a level is invalid.
pub async fn load_levels(config: &Config) -> Result<Vec<Level>> {
    match build_backend(config)? {
        Some(backend) => backend.levels().await,
        None => Ok(config.catalog()?.iter().cloned().collect()),
    }
}

/// Estimator backed by Etherscan on the chains it covers.
#[must_use]
pub fn build_estimator(config: &Config) -> TransactionTimeEstimator {
    let chain = config.chain();
    let tracker: Option<Arc<dyn GasTracker>> = chain
        .is_ethereum_family()
        .then(|| Arc::new(Etherscan::new(config.etherscan.api_key.clone())) as Arc<dyn GasTracker>);
    TransactionTimeEstimator::new(tracker)
}

#[cfg(feature = "evm")]
pub use self::evm::Runtime;

#[cfg(feature = "evm")]
mod evm {
    use std::sync::Arc;

    use tokio::task::JoinHandle;
    use tracing::info;

    use super::{build_backend, build_estimator, build_requirement_source};
    use crate::adapter::outbound::backend::HttpBackend;
    use crate::adapter::outbound::evm::{
        watch_blocks, Erc20Token, EvmClient, EvmMessageSigner, EvmStaking,
    };
    use crate::adapter::outbound::feed::BlockFeed;
    use crate::application::join::{JoinTarget, JoinWorkflow};
    use crate::application::{
        Session, StakeWorkflow, StakedReader, TransactionTimeEstimator, WorkflowPorts,
    };
    use crate::domain::{Address, Identity};
    use crate::error::{ConfigError, Result, WorkflowError};
    use crate::infrastructure::config::settings::Config;
    use crate::port::{MessageSigner, RequirementSource, StakingContract, TokenContract};

    /// Everything a command needs to talk to the chain and the backend.
    pub struct Runtime {
        pub config: Config,
        pub client: EvmClient,
        pub session: Arc<Session>,
        pub token: Arc<Erc20Token>,
        pub stake_token: Arc<Erc20Token>,
        pub staking: Arc<EvmStaking>,
        pub feed: BlockFeed,
        pub requirements: Arc<dyn RequirementSource>,
        pub backend: Option<Arc<HttpBackend>>,
        pub estimator: TransactionTimeEstimator,
    }

    impl Runtime {
        /// Build the runtime. No network request is made until a command
        /// uses one of the adapters.
        ///
        /// # Errors
        ///
        /// Returns an error if the RPC URL, private key or backend URL is invalid.
        pub fn connect(config: Config) -> Result<Self> {
            let client = EvmClient::connect(
                &config.network.rpc_url,
                config.network.chain_id,
                config.wallet.private_key.as_deref(),
            )?;
            let provider = client.provider();

            let account = client.address().or(config.wallet.account);
            let session = Session::new(Identity::new(account, config.chain()));

            let token = Arc::new(Erc20Token::new(config.token.address, provider.clone()));
            let stake_token = Arc::new(Erc20Token::new(
                config.stake_token().address,
                provider.clone(),
            ));
            let staking = Arc::new(EvmStaking::new(
                config.staking.contract,
                provider,
                config.staking.level_aware,
            ));

            let runtime = Self {
                requirements: build_requirement_source(&config)?,
                backend: build_backend(&config)?,
                estimator: build_estimator(&config),
                client,
                session,
                token,
                stake_token,
                staking,
                feed: BlockFeed::new(),
                config,
            };
            info!(
                chain = %runtime.config.chain().name(),
                account = ?runtime.account(),
                "Runtime ready"
            );
            Ok(runtime)
        }

        /// Connected account: the signing wallet, else the configured address.
        #[must_use]
        pub fn account(&self) -> Option<Address> {
            self.session.identity().account
        }

        /// Account, or [`WorkflowError::NoAccount`].
        ///
        /// # Errors
        ///
        /// Returns an error when neither a key nor an account is configured.
        pub fn require_account(&self) -> Result<Address> {
            Ok(self.account().ok_or(WorkflowError::NoAccount)?)
        }

        #[must_use]
        pub fn ports(&self) -> WorkflowPorts {
            let token: Arc<dyn TokenContract> = self.token.clone();
            let staking: Arc<dyn StakingContract> = self.staking.clone();
            WorkflowPorts {
                token,
                staking,
                requirements: Arc::clone(&self.requirements),
                blocks: Arc::new(self.feed.clone()),
            }
        }

        /// A stake workflow bound to this runtime's session.
        #[must_use]
        pub fn workflow(&self) -> StakeWorkflow {
            StakeWorkflow::new(&self.session, self.ports(), self.config.workflow_config())
        }

        /// Start publishing new blocks into the feed.
        ///
        /// # Errors
        ///
        /// Returns an error if the node rejects the block filter.
        pub async fn watch_blocks(&self) -> Result<JoinHandle<()>> {
            watch_blocks(
                self.client.provider(),
                self.feed.clone(),
                self.config.block_poll_interval(),
            )
            .await
        }

        #[must_use]
        pub fn staked_reader(&self) -> StakedReader {
            StakedReader::new(self.staking.clone(), self.config.stake_token().clone())
        }

        /// A join workflow for `platform`, enabled immediately.
        ///
        /// # Errors
        ///
        /// Returns an error without a signing wallet or a configured backend.
        pub fn join_workflow(
            &self,
            platform: &str,
            platform_user_id: Option<String>,
        ) -> Result<JoinWorkflow> {
            let signer = self.client.signer().ok_or(WorkflowError::NoAccount)?;
            let backend = self
                .backend
                .clone()
                .ok_or(ConfigError::MissingField { field: "backend" })?;
            let target = JoinTarget {
                platform: platform.to_ascii_uppercase(),
                community_id: backend.community_id(),
                platform_user_id,
            };
            let signer: Arc<dyn MessageSigner> = Arc::new(EvmMessageSigner::new(signer));
            Ok(JoinWorkflow::new(&self.session, signer, backend, target, true))
        }
    }
}

/// Log the effective configuration at startup.
pub fn log_config(config: &Config) {
    info!(
        chain = %config.chain().name(),
        token = %config.token.symbol,
        stake_token = %config.stake_token().symbol,
        staking = %config.staking.contract,
        backend = config.backend.is_some(),
        levels = config.levels.len(),
        "Configuration loaded"
    );
}
