//! Azure OpenAI-style chat-completion client.
//!
//! Connection settings come from the environment and are validated
//! eagerly; the retry loop is an explicit [`RetryPolicy`] value rather
//! than inline control flow.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TranslateError;

/// Connection settings for the chat-completion deployment.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    pub host: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl AiClientConfig {
    /// Read `AI_HOST`, `AI_API_KEY`, `AI_DEPLOYMENT` and `AI_API_VERSION`
    /// from the environment. Fails on the first unset or blank variable.
    pub fn from_env() -> Result<Self, TranslateError> {
        Ok(Self {
            host: require_env("AI_HOST")?,
            api_key: require_env("AI_API_KEY")?,
            deployment: require_env("AI_DEPLOYMENT")?,
            api_version: require_env("AI_API_VERSION")?,
        })
    }
}

fn require_env(variable: &'static str) -> Result<String, TranslateError> {
    match std::env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TranslateError::MissingConfig { variable }),
    }
}

/// Bounded retry for one chat call: at most `max_attempts` requests, with
/// `backoff` slept after each rate-limited attempt. HTTP 429 is the only
/// retryable status; any other non-success status aborts immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: u16) -> bool {
        status == 429
    }
}

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// The request seam between the chunker and HTTP. [`ChatClient`] is the
/// production implementation; tests substitute canned backends.
pub trait ChatBackend {
    /// Send one completion request and return the first choice's content.
    fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, TranslateError>;
}

/// Blocking chat-completion client.
pub struct ChatClient {
    agent: ureq::Agent,
    config: AiClientConfig,
    retry: RetryPolicy,
}

impl ChatClient {
    pub fn new(config: AiClientConfig) -> Self {
        Self::with_retry(config, RetryPolicy::default())
    }

    pub fn with_retry(config: AiClientConfig, retry: RetryPolicy) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .build();
        Self {
            agent,
            config,
            retry,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.host.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }
}

impl ChatBackend for ChatClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, TranslateError> {
        let url = self.endpoint();
        let body = serde_json::json!({
            "messages": messages,
            "max_tokens": max_tokens,
        });

        let mut last_status = 0;
        for attempt in 1..=self.retry.max_attempts {
            let response = self
                .agent
                .post(&url)
                .set("api-key", &self.config.api_key)
                .set("Content-Type", "application/json")
                .send_json(&body);

            match response {
                Ok(resp) => {
                    let parsed: ChatCompletionResponse =
                        resp.into_json()
                            .map_err(|err| TranslateError::MalformedResponse {
                                reason: err.to_string(),
                            })?;
                    let Some(choice) = parsed.choices.into_iter().next() else {
                        return Err(TranslateError::MalformedResponse {
                            reason: "response contained no choices".to_string(),
                        });
                    };
                    return Ok(choice.message.content);
                }
                Err(ureq::Error::Status(status, _)) if self.retry.is_retryable(status) => {
                    last_status = status;
                    warn!(
                        "translation API rate-limited (attempt {attempt}/{}), waiting {:?}",
                        self.retry.max_attempts, self.retry.backoff
                    );
                    thread::sleep(self.retry.backoff);
                }
                Err(ureq::Error::Status(status, _)) => {
                    return Err(TranslateError::Api {
                        status,
                        attempts: attempt,
                    });
                }
                Err(transport) => return Err(transport.into()),
            }
        }
        Err(TranslateError::Api {
            status: last_status,
            attempts: self.retry.max_attempts,
        })
    }
}
