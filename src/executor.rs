//! Block executor: orchestrate one `(block1, block2)` join call.
//!
//! Grounded on `original_source/src/llmjoin/real/block_join.py`'s
//! `join_two_blocks`: build prompt, measure size, short-circuit when the
//! remaining budget can't fit a single output token, otherwise call the
//! oracle and parse its reply. Wall-clock timing follows the teacher's
//! `TurnReceipt`-style `Instant`-based duration measurement.

use std::time::Instant;

use crate::oracle::{ChatRequest, Oracle};
use crate::parser;
use crate::prompt;
use crate::relation::{Block, Pair};
use crate::stats::InvocationStat;

/// Run one block-pair invocation.
///
/// Returns the recorded [`InvocationStat`] and whatever pairs the oracle's
/// reply yielded (empty when the call was aborted or the oracle returned
/// nothing parseable).
pub async fn execute_block(
    oracle: &dyn Oracle,
    block1: &Block,
    block2: &Block,
    predicate: &str,
    model: &str,
    token_budget: u32,
) -> Result<(InvocationStat, Vec<Pair>), crate::error::OracleError> {
    let started = Instant::now();

    let text = prompt::block_prompt_for(block1, block2, predicate);
    let size = crate::tokenizer::size(&text);

    let max_tokens = token_budget as i64 - size as i64;
    if max_tokens < 1 {
        tracing::debug!(
            block1_len = block1.len(),
            block2_len = block2.len(),
            prompt_tokens = size,
            "block prompt exceeds token budget before contacting oracle"
        );
        return Ok((
            InvocationStat::aborted(started.elapsed().as_secs_f64()),
            Vec::new(),
        ));
    }

    let request = ChatRequest::new(text, model, max_tokens);
    let response = oracle.complete(request).await?;
    let outcome = crate::error::OracleOutcome::from_finish_reason(&response.finish_reason);

    let stat = InvocationStat::new(
        response.prompt_tokens,
        response.completion_tokens,
        started.elapsed().as_secs_f64(),
        Some(outcome.is_overflow()),
    );

    let pairs = parser::parse_answer(&response.content, block1, block2);

    tracing::debug!(
        block1_len = block1.len(),
        block2_len = block2.len(),
        overflow = stat.is_overflow(),
        pairs_found = pairs.len(),
        "block executed"
    );

    Ok((stat, pairs))
}
