//! Community backend REST client.
//!
//! Reads level configuration from `GET {api}/community/{id}` and exchanges
//! signed messages for invites at `POST {api}/user/joinPlatform`.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::domain::{Level, LevelId, LevelRequirement, StakeRequirement, TxError, TxResult};
use crate::error::{Error, Result, WorkflowError};
use crate::port::{CommunityBackend, Invite, JoinRequest, RequirementSource};

/// HTTP client for one community on the backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_url: Url,
    community_id: u64,
}

#[derive(Debug, Deserialize)]
struct CommunityDto {
    #[serde(default)]
    levels: Vec<LevelDto>,
}

#[derive(Debug, Deserialize)]
struct LevelDto {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    requirements: Vec<RequirementDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementDto {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Option<Decimal>,
    #[serde(default)]
    stake_timelock_ms: Option<u64>,
}

impl LevelDto {
    /// Only the first requirement of a level is honored.
    fn into_level(self) -> Result<Level> {
        let requirement = match self.requirements.into_iter().next() {
            None => LevelRequirement::Open,
            Some(req) => {
                let amount = req.value.unwrap_or(Decimal::ZERO);
                match req.kind.to_ascii_uppercase().as_str() {
                    "OPEN" => LevelRequirement::Open,
                    "HOLD" => LevelRequirement::Hold { amount },
                    "STAKE" => LevelRequirement::Stake {
                        amount,
                        timelock_ms: req.stake_timelock_ms.unwrap_or(0),
                    },
                    other => {
                        return Err(Error::Backend(format!(
                            "level {} has unknown requirement type {other}",
                            self.id
                        )))
                    }
                }
            }
        };
        Ok(Level {
            id: LevelId::new(self.id),
            name: self.name,
            description: self.description,
            requirement,
        })
    }
}

impl HttpBackend {
    /// Create a client for `community_id` on the backend at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a valid URL.
    pub fn new(api_url: &str, community_id: u64) -> Result<Self> {
        let mut api_url = Url::parse(api_url)?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            api_url,
            community_id,
        })
    }

    #[must_use]
    pub const fn community_id(&self) -> u64 {
        self.community_id
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.api_url.join(path)?)
    }
}

/// Parse the body of `GET /community/{id}` into levels.
fn parse_levels(body: &str) -> Result<Vec<Level>> {
    let community: CommunityDto = serde_json::from_str(body)?;
    community
        .levels
        .into_iter()
        .map(LevelDto::into_level)
        .collect()
}

#[async_trait]
impl CommunityBackend for HttpBackend {
    async fn levels(&self) -> Result<Vec<Level>> {
        let url = self.endpoint(&format!("community/{}", self.community_id))?;
        debug!(url = %url, "Fetching community levels");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Backend(e.to_string()))?
            .text()
            .await?;
        parse_levels(&body)
    }

    async fn join_platform(&self, request: &JoinRequest) -> TxResult<Invite> {
        let url = self
            .endpoint("user/joinPlatform")
            .map_err(|e| TxError::transport(e.to_string()))?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| TxError::transport(format!("Unable to connect to server: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TxError::backend(format!(
                "joinPlatform returned {status}"
            )));
        }
        response
            .json::<Invite>()
            .await
            .map_err(|e| TxError::backend(format!("malformed invite: {e}")))
    }
}

#[async_trait]
impl RequirementSource for HttpBackend {
    async fn requirement(&self, level: LevelId) -> Result<StakeRequirement> {
        let levels = self.levels().await?;
        let found = levels
            .iter()
            .find(|l| l.id == level)
            .ok_or(WorkflowError::UnknownLevel(level))?;
        Ok(found
            .stake_requirement()
            .ok_or(WorkflowError::NotStakeable(level))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_levels_from_community() {
        let body = r#"{
            "id": 7,
            "levels": [
                {"id": 1, "name": "Guest", "requirements": []},
                {"id": 2, "name": "Holder", "requirements": [{"type": "HOLD", "value": 10}]},
                {"id": 3, "name": "Staker", "description": "Locked", "requirements": [
                    {"type": "STAKE", "value": 250.5, "stakeTimelockMs": 86400000}
                ]}
            ]
        }"#;

        let levels = parse_levels(body).unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].requirement, LevelRequirement::Open);
        assert_eq!(levels[1].requirement, LevelRequirement::Hold { amount: dec!(10) });
        assert_eq!(
            levels[2].stake_requirement(),
            Some(StakeRequirement::new(dec!(250.5), 86_400_000))
        );
        assert_eq!(levels[2].description.as_deref(), Some("Locked"));
    }

    #[test]
    fn unknown_requirement_type_is_backend_error() {
        let body = r#"{"levels": [{"id": 1, "name": "X", "requirements": [{"type": "NFT"}]}]}"#;
        assert!(matches!(parse_levels(body), Err(Error::Backend(_))));
    }

    #[test]
    fn endpoints_keep_api_prefix() {
        let backend = HttpBackend::new("https://api.example.com/api", 7).unwrap();
        assert_eq!(
            backend.endpoint("user/joinPlatform").unwrap().as_str(),
            "https://api.example.com/api/user/joinPlatform"
        );
        assert_eq!(
            backend.endpoint("community/7").unwrap().as_str(),
            "https://api.example.com/api/community/7"
        );
    }

    #[test]
    fn join_request_serializes_camel_case() {
        let request = JoinRequest {
            platform: "DISCORD".into(),
            community_id: 7,
            address_signed_message: "0xabc".into(),
            platform_user_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["communityId"], 7);
        assert_eq!(json["addressSignedMessage"], "0xabc");
        assert!(json.get("platformUserId").is_none());
    }
}
