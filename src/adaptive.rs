//! Adaptive controller: re-run the block join driver with escalating
//! selectivity estimates until no invocation reports overflow.
//!
//! Grounded on `original_source/src/llmjoin/real/adaptive_join.py`'s
//! `adaptive_join`: a fixed-point loop starting from an optimistic
//! (low) selectivity estimate, geometrically escalated by a factor of 4
//! on overflow, accumulating statistics across every attempt.
//!
//! State machine:
//!
//! ```text
//! INIT     : estimate <- initial
//! PROBE    : run a full block join at the current estimate; collect (stats, pairs)
//! EVAL     : any overflow in stats? -> ESCALATE : DONE
//! ESCALATE : estimate <- 4 * estimate; goto PROBE
//! DONE     : return (all_stats, all_pairs)
//! ```
//!
//! Ordinarily termination is guaranteed: once `estimate >= 1`, the
//! optimizer returns `b1=b2=1`, each prompt carries at most one output
//! pair, and overflow becomes impossible. The one case that formula
//! doesn't rescue is a token budget too small to fit even one row from
//! each side — there, larger estimates only ever shrink block dimensions
//! further, so escalating past `estimate >= 1` can never turn an
//! infeasible configuration feasible; the loop stops there instead of
//! spinning forever.

use crate::block_join::block_join;
use crate::oracle::Oracle;
use crate::relation::{Pair, Relation};
use crate::stats::{self, InvocationStat};

/// Default initial selectivity estimate when the caller doesn't supply
/// one: optimistic — assume almost nothing matches.
pub const DEFAULT_INITIAL_ESTIMATE: f64 = 0.001;

/// Geometric escalation ratio applied to the estimate after every
/// overflowing attempt.
pub const ESCALATION_RATIO: f64 = 4.0;

/// Run the adaptive block join.
///
/// Escalates the selectivity estimate geometrically until an entire
/// block-join pass completes with no overflowing invocation, then returns
/// the concatenation of every attempt's stats and pairs in call order.
///
/// Propagates the first oracle transport error encountered; overflow
/// itself is never an error, only escalation data.
pub async fn adaptive_join(
    oracle: &dyn Oracle,
    r1: &Relation,
    r2: &Relation,
    predicate: &str,
    model: &str,
    token_budget: u32,
    pair_encoding_size: f64,
    initial_estimate: f64,
) -> anyhow::Result<(Vec<InvocationStat>, Vec<Pair>)> {
    let mut estimate = initial_estimate;
    let mut all_stats = Vec::new();
    let mut all_pairs = Vec::new();

    loop {
        let (round_stats, round_pairs) = block_join(
            oracle,
            r1,
            r2,
            predicate,
            model,
            token_budget,
            pair_encoding_size,
            estimate,
        )
        .await?;

        let overflowed = stats::any_overflow(&round_stats);
        let invocation_count = round_stats.len();

        all_stats.extend(round_stats);
        all_pairs.extend(round_pairs);

        if !overflowed {
            tracing::debug!(estimate, "adaptive controller converged");
            return Ok((all_stats, all_pairs));
        }

        if estimate >= 1.0 {
            tracing::warn!(
                estimate,
                "adaptive controller stopping: configuration still overflows at estimate >= 1, escalating further cannot help"
            );
            return Ok((all_stats, all_pairs));
        }

        tracing::debug!(
            estimate,
            invocation_count,
            "adaptive controller escalating after overflow"
        );
        estimate *= ESCALATION_RATIO;
    }
}
