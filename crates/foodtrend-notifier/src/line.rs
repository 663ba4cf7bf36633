//! LINE Messaging API push client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::NotifierError;
use crate::segment::MessageBlock;

const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// LINE accepts at most this many message objects per push request.
pub const MAX_MESSAGES_PER_PUSH: usize = 5;

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushResponse {
    #[serde(default)]
    sent_messages: Vec<serde_json::Value>,
}

/// Client for pushing report blocks to one LINE recipient.
///
/// Use [`LineClient::new`] for production or [`LineClient::with_base_url`]
/// to point at a mock server in tests.
pub struct LineClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    /// # Errors
    ///
    /// Returns [`NotifierError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, NotifierError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`NotifierError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NotifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Send every block to `to` in one push request, in order.
    ///
    /// The push is all-or-nothing: block counts LINE would reject are refused
    /// before any request is made.
    ///
    /// # Errors
    ///
    /// - [`NotifierError::NothingToSend`] if `blocks` is empty.
    /// - [`NotifierError::TooManyBlocks`] if there are more than
    ///   [`MAX_MESSAGES_PER_PUSH`] blocks.
    /// - [`NotifierError::UnexpectedStatus`] if LINE rejects the push.
    /// - [`NotifierError::Http`] on network failure.
    pub async fn push(&self, to: &str, blocks: &[MessageBlock]) -> Result<(), NotifierError> {
        if blocks.is_empty() {
            return Err(NotifierError::NothingToSend);
        }
        if blocks.len() > MAX_MESSAGES_PER_PUSH {
            return Err(NotifierError::TooManyBlocks {
                count: blocks.len(),
                max: MAX_MESSAGES_PER_PUSH,
            });
        }

        let body = PushRequest {
            to,
            messages: blocks
                .iter()
                .map(|block| TextMessage {
                    kind: "text",
                    text: block.as_str(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/v2/bot/message/push", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(NotifierError::UnexpectedStatus {
                status: status.as_u16(),
                body: raw.chars().take(500).collect(),
            });
        }

        let parsed: PushResponse = if raw.trim().is_empty() {
            PushResponse::default()
        } else {
            serde_json::from_str(&raw).map_err(|source| NotifierError::Deserialize {
                context: "LINE push response".to_string(),
                source,
            })?
        };

        tracing::info!(
            blocks = blocks.len(),
            acknowledged = parsed.sent_messages.len(),
            "LINE push delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split_message;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn blocks(n: usize) -> Vec<MessageBlock> {
        let text = (0..n).map(|i| format!("block {i}")).collect::<Vec<_>>().join("\n");
        split_message(&text, 7).unwrap()
    }

    #[tokio::test]
    async fn push_sends_blocks_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(header("Authorization", "Bearer token-123"))
            .and(body_json(serde_json::json!({
                "to": "U123",
                "messages": [
                    { "type": "text", "text": "block 0" },
                    { "type": "text", "text": "block 1" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sentMessages": [{ "id": "1" }, { "id": "2" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LineClient::with_base_url("token-123", 5, &server.uri()).unwrap();
        client.push("U123", &blocks(2)).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_push_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"message":"Invalid reply token"}"#),
            )
            .mount(&server)
            .await;

        let client = LineClient::with_base_url("token", 5, &server.uri()).unwrap();
        let err = client.push("U123", &blocks(1)).await.unwrap_err();
        assert!(matches!(err, NotifierError::UnexpectedStatus { status: 400, .. }));
    }

    #[tokio::test]
    async fn too_many_blocks_never_reach_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = LineClient::with_base_url("token", 5, &server.uri()).unwrap();
        let err = client.push("U123", &blocks(6)).await.unwrap_err();
        assert!(matches!(err, NotifierError::TooManyBlocks { count: 6, max: 5 }));
    }

    #[tokio::test]
    async fn empty_success_body_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = LineClient::with_base_url("token", 5, &server.uri()).unwrap();
        client.push("U123", &blocks(1)).await.unwrap();
    }
}
