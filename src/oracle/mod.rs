//! Oracle client: issue chat and embedding calls; surface usage counters
//! and finish reason.
//!
//! [`Oracle`] is a trait so a real HTTP-backed implementation
//! ([`openai::OpenAiOracle`]) and an in-memory test double
//! ([`mock`]) satisfy the same contract.

pub mod mock;
pub mod openai;

use async_trait::async_trait;

use crate::error::OracleError;

pub use openai::OpenAiOracle;

/// A chat-completion request: a single user-role prompt, a token ceiling,
/// and a stop sequence. Temperature is always 0 — it is not a field here
/// because no implementation is allowed to vary it.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: i64,
    pub stop: Vec<String>,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, max_tokens: i64) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens,
            stop: vec!["Finished".to_string()],
        }
    }
}

/// Result of a chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub finish_reason: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Result of an embedding call.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub prompt_tokens: u64,
}

/// Oracle contract: chat-completion and embedding endpoints.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Invoke the chat-completion endpoint. Callers are responsible for
    /// the `max_tokens < 1` short-circuit — when this is called, a real
    /// request is always issued.
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, OracleError>;

    /// Invoke the embedding endpoint for a single piece of text.
    async fn embed(&self, text: &str, model: &str) -> Result<Embedding, OracleError>;
}
