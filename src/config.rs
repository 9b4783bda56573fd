//! Configuration constants.
//!
//! Mirrors the teacher's `Config::load` shape (read → parse YAML → fall
//! back on "not found", fail loudly on anything else) without the
//! agent-platform-specific `.bak` / home-directory fallback chase, which
//! doesn't generalize to a library crate.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::optimizer::{DEFAULT_PAIR_ENCODING_SIZE, SELECTIVITY_FLOOR};

/// Join-engine configuration: token budget, selectivity defaults, model
/// names, and the oracle per-call timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Hard token budget per oracle call (prompt + completion). Default 2000.
    pub token_budget: u32,
    /// Average emitted pair-encoding size in tokens. Default 4.
    pub pair_encoding_size: f64,
    /// Selectivity floor to avoid division-by-zero in the optimizer. Default 1e-7.
    pub selectivity_floor: f64,
    /// Adaptive controller's geometric escalation ratio. Default 4.
    pub escalation_ratio: f64,
    /// Adaptive controller's default initial selectivity estimate. Default 1e-3.
    pub initial_estimate: f64,
    /// Per-call oracle timeout in seconds. Default 60.
    pub timeout_secs: u64,
    /// Chat-completion model name.
    pub chat_model: String,
    /// Embedding model name.
    pub embedding_model: String,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            token_budget: 2000,
            pair_encoding_size: DEFAULT_PAIR_ENCODING_SIZE,
            selectivity_floor: SELECTIVITY_FLOOR,
            escalation_ratio: 4.0,
            initial_estimate: 0.001,
            timeout_secs: 60,
            chat_model: "gpt-4".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

impl JoinConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from a YAML file at `path`.
    ///
    /// A missing file falls back to [`JoinConfig::default`] (with a
    /// warning); a file that exists but fails to parse is a hard error.
    pub async fn load(path: &Path) -> anyhow::Result<JoinConfig> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
                return Ok(JoinConfig::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config file: {}", path.display()));
            }
        };

        serde_yaml_ng::from_str(&contents).context("failed to parse config YAML")
    }
}
