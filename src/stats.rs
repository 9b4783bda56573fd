//! Per-invocation cost/latency statistics.

use serde::{Deserialize, Serialize};

/// Statistics for a single oracle invocation (or an aborted attempt that
/// never reached the oracle).
///
/// `overflow` is `Option<bool>` rather than `bool`: it is meaningful for
/// the block/adaptive paths (where it drives the early-exit and escalation
/// logic) but optional for the tuple and embedding paths, which have no
/// overflow concept of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvocationStat {
    pub tokens_read: u64,
    pub tokens_written: u64,
    pub seconds: f64,
    pub overflow: Option<bool>,
}

impl InvocationStat {
    /// A stat for a call that actually reached the oracle.
    pub fn new(tokens_read: u64, tokens_written: u64, seconds: f64, overflow: Option<bool>) -> Self {
        Self {
            tokens_read,
            tokens_written,
            seconds,
            overflow,
        }
    }

    /// Synthetic stat for a call that was aborted before contacting the
    /// oracle (e.g. `max_tokens < 1`) — zero tokens, the elapsed wall-clock
    /// time up to that point, and `overflow = true`.
    pub fn aborted(seconds: f64) -> Self {
        Self {
            tokens_read: 0,
            tokens_written: 0,
            seconds,
            overflow: Some(true),
        }
    }

    /// Whether this stat reports an overflow. Stats with no overflow
    /// concept (tuple/embedding paths) are treated as non-overflowing.
    pub fn is_overflow(&self) -> bool {
        self.overflow.unwrap_or(false)
    }
}

/// Returns `true` if any stat in the slice reports overflow — the signal
/// the adaptive controller uses to escalate.
pub fn any_overflow(stats: &[InvocationStat]) -> bool {
    stats.iter().any(InvocationStat::is_overflow)
}
