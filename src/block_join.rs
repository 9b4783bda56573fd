//! Block join driver: drive the double loop over all block pairs,
//! stopping as soon as any invocation overflows.
//!
//! Grounded on `original_source/src/llmjoin/real/block_join.py`'s
//! `block_join`: compute average tuple sizes, ask the optimizer for
//! block dimensions, partition both relations, then walk block pairs in
//! row-major order, running the block executor on each and early-exiting
//! the moment any invocation overflows.

use crate::executor::execute_block;
use crate::oracle::Oracle;
use crate::optimizer::{self, BlockSize};
use crate::partition;
use crate::relation::{Pair, Relation};
use crate::stats::InvocationStat;
use crate::tokenizer;

/// The block join driver's own default selectivity estimate when invoked
/// directly rather than through the adaptive controller: a conservative
/// worst case assuming every pair matches, yielding the smallest safe
/// blocks.
pub const DEFAULT_DIRECT_ESTIMATE: f64 = 1.0;

/// Run one full block-nested-loops join.
///
/// Returns `(stats, pairs)` accumulated in call order. Returns empty
/// results with no oracle calls when either relation is empty, or when
/// the computed block size is infeasible (treated as an immediate
/// overflow without contacting the oracle). Propagates the first oracle
/// transport error encountered.
pub async fn block_join(
    oracle: &dyn Oracle,
    r1: &Relation,
    r2: &Relation,
    predicate: &str,
    model: &str,
    token_budget: u32,
    pair_encoding_size: f64,
    estimate: f64,
) -> anyhow::Result<(Vec<InvocationStat>, Vec<Pair>)> {
    if r1.is_empty() || r2.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let s1 = tokenizer::avg_tuple_size(r1);
    let s2 = tokenizer::avg_tuple_size(r2);
    let p = crate::prompt::static_prompt_size(predicate) as f64;

    let block_size = optimizer::optimal_block_size(
        s1,
        s2,
        pair_encoding_size,
        token_budget as f64,
        p,
        estimate,
    );

    if !block_size.is_feasible() {
        tracing::debug!(?block_size, "block size infeasible, reporting overflow without calling oracle");
        return Ok((vec![InvocationStat::aborted(0.0)], Vec::new()));
    }

    run_blocks(oracle, r1, r2, predicate, model, token_budget, block_size).await
}

async fn run_blocks(
    oracle: &dyn Oracle,
    r1: &Relation,
    r2: &Relation,
    predicate: &str,
    model: &str,
    token_budget: u32,
    block_size: BlockSize,
) -> anyhow::Result<(Vec<InvocationStat>, Vec<Pair>)> {
    let blocks1 = partition::partition(r1, block_size.b1);
    let blocks2 = partition::partition(r2, block_size.b2);

    let mut stats = Vec::new();
    let mut pairs = Vec::new();

    'outer: for block1 in &blocks1 {
        for block2 in &blocks2 {
            let (stat, mut found) =
                execute_block(oracle, block1, block2, predicate, model, token_budget).await?;
            let overflowed = stat.is_overflow();
            stats.push(stat);
            pairs.append(&mut found);
            if overflowed {
                // Break both loops: the adaptive controller will escalate
                // and retry.
                break 'outer;
            }
        }
    }

    Ok((stats, pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::mock::MockOracle;
    use crate::oracle::ChatCompletion;
    use crate::relation::Row;

    fn rel(texts: &[&str]) -> Relation {
        texts.iter().map(|t| Row::new(*t)).collect()
    }

    #[tokio::test]
    async fn empty_left_relation_yields_no_calls() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "".into(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = Relation::new(vec![]);
        let r2 = rel(&["x"]);
        let (stats, pairs) = block_join(&oracle, &r1, &r2, "p", "gpt-4", 2000, 4.0, 1.0)
            .await
            .unwrap();
        assert!(stats.is_empty());
        assert!(pairs.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_right_relation_yields_no_calls() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "".into(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = rel(&["a"]);
        let r2 = Relation::new(vec![]);
        let (stats, pairs) = block_join(&oracle, &r1, &r2, "p", "gpt-4", 2000, 4.0, 1.0)
            .await
            .unwrap();
        assert!(stats.is_empty());
        assert!(pairs.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn small_relations_join_in_one_call_with_estimate_one() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "1,1;Finished".into(),
            finish_reason: "stop".into(),
            prompt_tokens: 20,
            completion_tokens: 3,
        });
        let r1 = rel(&["a"]);
        let r2 = rel(&["x"]);
        let (stats, pairs) =
            block_join(&oracle, &r1, &r2, "match", "gpt-4", 2000, 4.0, DEFAULT_DIRECT_ESTIMATE)
                .await
                .unwrap();
        assert_eq!(stats.len(), 1);
        assert!(!stats[0].is_overflow());
        assert_eq!(pairs, vec![Pair::new("a", "x")]);
    }

    #[tokio::test]
    async fn overflow_stops_iteration_early() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "1,1".into(),
            finish_reason: "length".into(),
            prompt_tokens: 20,
            completion_tokens: 3,
        });
        // Force multiple blocks per side by using a tiny token budget via
        // a very small effective block size (estimate near 1, token budget
        // small enough that b1=b2=1 splits each relation into its own block).
        let r1 = rel(&["a", "b"]);
        let r2 = rel(&["x", "y"]);
        let (stats, pairs) = block_join(&oracle, &r1, &r2, "p", "gpt-4", 2000, 4.0, 1.0)
            .await
            .unwrap();
        // First invocation overflows -> loop breaks immediately.
        assert_eq!(stats.len(), 1);
        assert!(stats[0].is_overflow());
        assert!(pairs.is_empty());
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn tiny_token_budget_is_infeasible_without_oracle_call() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "".into(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = rel(&["a very long sentence that occupies plenty of tokens by itself"]);
        let r2 = rel(&["another quite long sentence taking up tokens as well"]);
        let (stats, pairs) = block_join(&oracle, &r1, &r2, "p", "gpt-4", 5, 4.0, 1.0)
            .await
            .unwrap();
        assert_eq!(stats.len(), 1);
        assert!(stats[0].is_overflow());
        assert!(pairs.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn transport_error_propagates_instead_of_returning_partial_results() {
        let oracle = MockOracle::new(|_req| ChatCompletion {
            content: "1,1;Finished".into(),
            finish_reason: "stop".into(),
            prompt_tokens: 1,
            completion_tokens: 1,
        });
        oracle.fail_next_n_calls(1);
        let r1 = rel(&["a"]);
        let r2 = rel(&["x"]);
        let result = block_join(&oracle, &r1, &r2, "p", "gpt-4", 2000, 4.0, 1.0).await;
        assert!(result.is_err());
    }
}
