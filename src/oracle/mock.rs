//! In-process [`Oracle`] test double for pure unit tests that don't need
//! HTTP semantics (the integration tests under `tests/` use `wiremock`
//! instead, to exercise the real transport path).

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatCompletion, ChatRequest, Embedding, Oracle};
use crate::error::OracleError;

/// A scripted oracle whose chat replies are computed by a closure over the
/// request, and whose embeddings are one-hot vectors over a small fixed
/// alphabet keyed by the text's first byte.
pub struct MockOracle<F> {
    reply_fn: F,
    calls: Mutex<usize>,
    fail_next: Mutex<usize>,
    fail_next_embed: Mutex<usize>,
}

impl<F> MockOracle<F>
where
    F: Fn(&ChatRequest) -> ChatCompletion + Send + Sync,
{
    pub fn new(reply_fn: F) -> Self {
        Self {
            reply_fn,
            calls: Mutex::new(0),
            fail_next: Mutex::new(0),
            fail_next_embed: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Make the next `n` calls to [`Oracle::complete`] return a transport
    /// error instead of invoking the reply closure, for exercising
    /// error-propagation paths.
    pub fn fail_next_n_calls(&self, n: usize) {
        *self.fail_next.lock().unwrap() = n;
    }

    /// Make the next `n` calls to [`Oracle::embed`] return a transport
    /// error instead of a vector.
    pub fn fail_next_n_embed_calls(&self, n: usize) {
        *self.fail_next_embed.lock().unwrap() = n;
    }
}

#[async_trait]
impl<F> Oracle for MockOracle<F>
where
    F: Fn(&ChatRequest) -> ChatCompletion + Send + Sync,
{
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, OracleError> {
        *self.calls.lock().unwrap() += 1;
        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next > 0 {
            *fail_next -= 1;
            return Err(OracleError::Http {
                status: 500,
                body: "mock oracle injected failure".into(),
            });
        }
        Ok((self.reply_fn)(&request))
    }

    async fn embed(&self, text: &str, _model: &str) -> Result<Embedding, OracleError> {
        let mut fail_next = self.fail_next_embed.lock().unwrap();
        if *fail_next > 0 {
            *fail_next -= 1;
            return Err(OracleError::Http {
                status: 500,
                body: "mock oracle injected failure".into(),
            });
        }
        Ok(Embedding {
            vector: one_hot_embedding(text),
            prompt_tokens: text.len() as u64,
        })
    }
}

/// Deterministic one-hot-ish embedding over a small alphabet, used by
/// tests that want predictable cosine-similarity rankings without a real
/// embedding model.
///
/// Weights the embedding by shared-prefix length against a small set of
/// reference words so that e.g. "apple" ranks closer to "apricot" than to
/// "banana".
pub fn one_hot_embedding(text: &str) -> Vec<f32> {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let mut v = vec![0.0f32; ALPHABET.len()];
    let bytes = text.to_ascii_lowercase().into_bytes();
    for (pos, &b) in bytes.iter().enumerate() {
        if let Some(idx) = ALPHABET.iter().position(|&c| c == b) {
            // Earlier characters (shared prefixes) weigh more heavily.
            v[idx] += 1.0 / (pos as f32 + 1.0);
        }
    }
    v
}
