//! Read-only contract calls.

use crate::config::{ContractConfig, Network};
use crate::{GatewayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskmint_clarity::ClarityValue;
use taskmint_types::StacksAddress;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyCall {
    pub contract_address: StacksAddress,
    pub contract_name: String,
    pub function_name: String,
    pub function_args: Vec<ClarityValue>,
    pub network: Network,
    pub sender_address: StacksAddress,
}

/// Evaluates read-only contract functions.
#[async_trait]
pub trait ReadOnlyApi: Send + Sync {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<ClarityValue>;
}

#[derive(Debug, Serialize)]
struct CallReadRequest<'a> {
    sender: &'a str,
    arguments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CallReadResponse {
    okay: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    cause: Option<String>,
}

/// [`ReadOnlyApi`] over the node's `POST /v2/contracts/call-read` endpoint.
#[derive(Debug, Clone)]
pub struct HttpReadOnlyClient {
    api_url: String,
    client: reqwest::Client,
}

impl HttpReadOnlyClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_url = api_url.into();
        reqwest::Url::parse(&api_url).map_err(|e| {
            GatewayError::InvalidConfiguration(format!("api url '{}': {}", api_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::InvalidConfiguration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ContractConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    fn endpoint(&self, call: &ReadOnlyCall) -> String {
        format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.api_url, call.contract_address, call.contract_name, call.function_name
        )
    }
}

#[async_trait]
impl ReadOnlyApi for HttpReadOnlyClient {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<ClarityValue> {
        let function = call.function_name.as_str();
        let arguments = call
            .function_args
            .iter()
            .map(ClarityValue::to_hex)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| GatewayError::read(function, e))?;
        let body = CallReadRequest {
            sender: call.sender_address.as_str(),
            arguments,
        };

        let url = self.endpoint(call);
        debug!(%url, function, args = body.arguments.len(), "Calling read-only function");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::read(function, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::read(
                function,
                format!("HTTP {}: {}", status, text.trim()),
            ));
        }

        let parsed: CallReadResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::read(function, format!("invalid response body: {}", e)))?;

        if !parsed.okay {
            return Err(GatewayError::read(
                function,
                parsed
                    .cause
                    .unwrap_or_else(|| "node reported failure without a cause".to_string()),
            ));
        }

        let result = parsed
            .result
            .ok_or_else(|| GatewayError::read(function, "response has no result"))?;
        ClarityValue::from_hex(&result).map_err(|e| GatewayError::read(function, e))
    }
}
