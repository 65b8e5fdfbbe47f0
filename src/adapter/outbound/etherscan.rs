//! Etherscan gas tracker.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::Chain;
use crate::error::{Error, Result};
use crate::port::GasTracker;

/// Confirmation time lookups through Etherscan's `gastracker/gasestimate`.
#[derive(Debug, Clone)]
pub struct Etherscan {
    client: Client,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GasEstimateResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: String,
}

impl Etherscan {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    fn base_url(chain: Chain) -> Option<&'static str> {
        match chain {
            Chain::Ethereum => Some("https://api.etherscan.io/api"),
            Chain::Goerli => Some("https://api-goerli.etherscan.io/api"),
            _ => None,
        }
    }

    fn request_url(&self, chain: Chain, gas_price: u128) -> Result<Url> {
        let base = Self::base_url(chain).ok_or_else(|| {
            Error::GasTracker(format!("no gas tracker for {}", chain.name()))
        })?;
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("module", "gastracker")
            .append_pair("action", "gasestimate")
            .append_pair("gasprice", &gas_price.to_string());
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apikey", key);
        }
        Ok(url)
    }
}

fn parse_estimate(response: GasEstimateResponse) -> Result<Duration> {
    if response.status != "1" {
        return Err(Error::GasTracker(format!(
            "{}: {}",
            response.message, response.result
        )));
    }
    let seconds: u64 = response
        .result
        .trim()
        .parse()
        .map_err(|_| Error::GasTracker(format!("unexpected estimate {:?}", response.result)))?;
    Ok(Duration::from_secs(seconds))
}

#[async_trait]
impl GasTracker for Etherscan {
    async fn confirmation_time(&self, chain: Chain, gas_price: u128) -> Result<Duration> {
        let url = self.request_url(chain, gas_price)?;
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GasTracker(e.to_string()))?
            .json::<GasEstimateResponse>()
            .await?;
        parse_estimate(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goerli_uses_network_subdomain() {
        let url = Etherscan::new(None).request_url(Chain::Goerli, 2_000_000_000).unwrap();
        assert_eq!(url.host_str(), Some("api-goerli.etherscan.io"));
        assert!(url.as_str().contains("action=gasestimate"));
        assert!(url.as_str().contains("gasprice=2000000000"));
        assert!(!url.as_str().contains("apikey"));
    }

    #[test]
    fn api_key_is_appended() {
        let url = Etherscan::new(Some("KEY".into()))
            .request_url(Chain::Ethereum, 1)
            .unwrap();
        assert!(url.as_str().ends_with("apikey=KEY"));
    }

    #[test]
    fn other_chains_are_not_covered() {
        assert!(Etherscan::new(None).request_url(Chain::Polygon, 1).is_err());
    }

    #[test]
    fn parses_seconds() {
        let response = GasEstimateResponse {
            status: "1".into(),
            message: "OK".into(),
            result: "123".into(),
        };
        assert_eq!(parse_estimate(response).unwrap(), Duration::from_secs(123));
    }

    #[test]
    fn error_status_fails() {
        let response = GasEstimateResponse {
            status: "0".into(),
            message: "NOTOK".into(),
            result: "Invalid API Key".into(),
        };
        assert!(matches!(parse_estimate(response), Err(Error::GasTracker(_))));
    }
}
