//! OpenAI-compatible chat-completion and embedding oracle.
//!
//! Modeled on the teacher's `OpenAIProvider` (reqwest client construction,
//! bearer auth, JSON body, finish-reason handling), narrowed to exactly
//! the two endpoints this oracle needs: `complete()` and `embed()`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{ChatCompletion, ChatRequest, Embedding, Oracle};
use crate::error::OracleError;

/// Default endpoint for OpenAI-compatible chat completions.
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Default endpoint for OpenAI-compatible embeddings.
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Oracle implementation that talks to an OpenAI-compatible HTTP API.
pub struct OpenAiOracle {
    api_key: String,
    chat_endpoint: String,
    embedding_endpoint: String,
    client: Client,
}

impl OpenAiOracle {
    /// Create a new oracle reading `OPENAI_API_KEY` from the environment
    /// and using the default endpoints, with the given per-call timeout
    /// (a sensible range is 20-300 seconds).
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set"))?;
        Self::with_config(
            api_key,
            DEFAULT_CHAT_ENDPOINT.to_string(),
            DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            timeout,
        )
    }

    /// Create an oracle with explicit configuration (useful for tests or
    /// non-default/self-hosted endpoints).
    pub fn with_config(
        api_key: String,
        chat_endpoint: String,
        embedding_endpoint: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key,
            chat_endpoint,
            embedding_endpoint,
            client,
        })
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, OracleError> {
        let body = json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens,
            "temperature": 0,
            "stop": request.stop,
        });

        let resp = self
            .client
            .post(&self.chat_endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.client_timeout_hint())
                } else {
                    OracleError::Transport(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(OracleError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        let finish_reason = json["choices"][0]["finish_reason"]
            .as_str()
            .unwrap_or("")
            .to_string();
        let prompt_tokens = json["usage"]["prompt_tokens"].as_u64().unwrap_or(0);
        let completion_tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0);

        Ok(ChatCompletion {
            content,
            finish_reason,
            prompt_tokens,
            completion_tokens,
        })
    }

    async fn embed(&self, text: &str, model: &str) -> Result<Embedding, OracleError> {
        let body = json!({
            "model": model,
            "input": [text],
        });

        let resp = self
            .client
            .post(&self.embedding_endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.client_timeout_hint())
                } else {
                    OracleError::Transport(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OracleError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        let vector: Vec<f32> = json["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| OracleError::MalformedResponse("missing data[0].embedding".into()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();
        let prompt_tokens = json["usage"]["prompt_tokens"].as_u64().unwrap_or(0);

        Ok(Embedding {
            vector,
            prompt_tokens,
        })
    }
}

impl OpenAiOracle {
    fn client_timeout_hint(&self) -> Duration {
        // reqwest does not expose the configured timeout back out; this is
        // only used to annotate the error, so a representative default
        // is good enough.
        Duration::from_secs(20)
    }
}
