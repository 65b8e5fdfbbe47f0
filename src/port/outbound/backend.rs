//! Community backend ports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Level, LevelId, StakeRequirement, TxResult};
use crate::error::Result;

/// Resolves the staking parameters of a level.
#[async_trait]
pub trait RequirementSource: Send + Sync {
    /// Staking requirement of `level`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownLevel`](crate::error::WorkflowError::UnknownLevel)
    /// or [`WorkflowError::NotStakeable`](crate::error::WorkflowError::NotStakeable)
    /// for levels that cannot be staked for, or a backend error.
    async fn requirement(&self, level: LevelId) -> Result<StakeRequirement>;
}

/// Request to join a community platform (Discord, Telegram).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub platform: String,
    pub community_id: u64,
    pub address_signed_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_user_id: Option<String>,
}

/// Invite returned by the backend after a successful join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub invite_link: String,
    #[serde(default)]
    pub already_joined: bool,
}

/// REST backend holding community configuration and platform invites.
#[async_trait]
pub trait CommunityBackend: Send + Sync {
    /// Levels configured for the community.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn levels(&self) -> Result<Vec<Level>>;

    /// Exchange a signed message for a platform invite.
    ///
    /// # Errors
    ///
    /// Returns a backend error for non-success responses and a transport
    /// error if the request could not be made.
    async fn join_platform(&self, request: &JoinRequest) -> TxResult<Invite>;
}
