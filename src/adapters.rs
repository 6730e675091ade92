use std::collections::BTreeMap;
use std::pin::Pin;

use serde::Deserialize;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::ports;
use crate::types::message::{DispatchResult, FailedDelivery, GatewayError, MessagePayload};

/// Push gateway collaborator over HTTP. Accepts a message addressed by topic
/// or token list and reports per-token success or failure.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPushGateway {
    pub fn new(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.key,
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.post(format!("{}/{path}", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
    }
}

#[derive(Serialize)]
struct WireNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct TopicSendRequest<'a> {
    notification: WireNotification<'a>,
    data: &'a BTreeMap<String, String>,
    topic: &'a str,
}

#[derive(Deserialize)]
struct TopicSendResponse {
    #[serde(rename = "messageId")]
    message_id: String,
}

#[derive(Serialize)]
struct MulticastSendRequest<'a> {
    notification: WireNotification<'a>,
    data: &'a BTreeMap<String, String>,
    tokens: &'a [String],
}

#[derive(Deserialize)]
struct MulticastSendResponse {
    #[serde(rename = "successCount")]
    success_count: usize,
    responses: Vec<SendOutcome>,
}

#[derive(Deserialize)]
struct SendOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: String,
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::new("gateway/unavailable", err.to_string())
}

async fn error_from_response(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    match response.json::<GatewayErrorBody>().await {
        Ok(body) => GatewayError::new(body.error, format!("gateway returned status {status}")),
        Err(_) => GatewayError::new(
            format!("gateway/http-{}", status.as_u16()),
            format!("gateway returned status {status}"),
        ),
    }
}

impl ports::PushGateway for HttpPushGateway {
    type TopicFut<'a>
        = Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>
    where
        Self: 'a;
    type TokensFut<'a>
        = Pin<Box<dyn Future<Output = Result<DispatchResult, GatewayError>> + Send + 'a>>
    where
        Self: 'a;

    fn send_to_topic<'a>(
        &'a self,
        payload: &'a MessagePayload,
        topic: &'a str,
    ) -> Self::TopicFut<'a> {
        Box::pin(async move {
            let request = TopicSendRequest {
                notification: WireNotification {
                    title: &payload.title,
                    body: &payload.body,
                },
                data: &payload.data,
                topic,
            };
            let response = self
                .request("v1/send")
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            let receipt: TopicSendResponse = response.json().await.map_err(transport_error)?;
            Ok(receipt.message_id)
        })
    }

    fn send_to_tokens<'a>(
        &'a self,
        payload: &'a MessagePayload,
        tokens: &'a [String],
    ) -> Self::TokensFut<'a> {
        Box::pin(async move {
            let request = MulticastSendRequest {
                notification: WireNotification {
                    title: &payload.title,
                    body: &payload.body,
                },
                data: &payload.data,
                tokens,
            };
            let response = self
                .request("v1/send_multicast")
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            let body: MulticastSendResponse = response.json().await.map_err(transport_error)?;
            if body.responses.len() != tokens.len() {
                return Err(GatewayError::new(
                    "gateway/invalid-response",
                    format!(
                        "expected {} per-token outcomes, got {}",
                        tokens.len(),
                        body.responses.len()
                    ),
                ));
            }
            let failures = tokens
                .iter()
                .zip(&body.responses)
                .filter(|(_, outcome)| !outcome.success)
                .map(|(token, outcome)| FailedDelivery {
                    token: token.clone(),
                    error_code: outcome
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string()),
                })
                .collect();
            Ok(DispatchResult {
                success_count: body.success_count,
                failures,
            })
        })
    }
}

/// User-record collaborator over HTTP. The dispatcher only ever reads the
/// token list and removes entries from it; registration happens elsewhere.
#[derive(Clone)]
pub struct HttpTokenStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("user store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("user store returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Deserialize)]
struct UserTokenRecordBody {
    #[serde(default, rename = "fcmTokens")]
    fcm_tokens: Vec<String>,
}

#[derive(Serialize)]
struct RemoveTokensRequest<'a> {
    tokens: &'a [String],
}

impl HttpTokenStore {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ports::TokenStore for HttpTokenStore {
    type Error = TokenStoreError;
    type TokensFut<'a>
        = Pin<Box<dyn Future<Output = Result<Option<Vec<String>>, Self::Error>> + Send + 'a>>
    where
        Self: 'a;
    type RemoveFut<'a>
        = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn tokens<'a>(&'a self, user_id: &'a str) -> Self::TokensFut<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/users/{user_id}", self.base_url))
                .send()
                .await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !response.status().is_success() {
                return Err(TokenStoreError::Status(response.status()));
            }
            let record: UserTokenRecordBody = response.json().await?;
            Ok(Some(record.fcm_tokens))
        })
    }

    fn remove_tokens<'a>(&'a self, user_id: &'a str, tokens: &'a [String]) -> Self::RemoveFut<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/users/{user_id}/tokens/remove", self.base_url))
                .json(&RemoveTokensRequest { tokens })
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(TokenStoreError::Status(response.status()));
            }
            Ok(())
        })
    }
}
