//! Tuple join driver: a degenerate 1x1 block variant, a per-pair Yes/No
//! probe.
//!
//! Grounded on `original_source/src/llmjoin/real/tuple_join.py`'s
//! `tuple_join`: cartesian iteration over R1 x R2, asking the oracle a
//! single Yes/No question per pair with `max_tokens=1`.

use crate::oracle::{ChatRequest, Oracle};
use crate::prompt;
use crate::relation::{Pair, Relation};
use crate::stats::InvocationStat;
use std::time::Instant;

/// Run the tuple-at-a-time join.
///
/// For every `(r1, r2)` in the cartesian product, asks the oracle whether
/// `predicate` holds and keeps the pair iff the reply is exactly `"Yes"`.
/// One [`InvocationStat`] is recorded per call; the overflow field is
/// always `None` here — this path has no block-size/overflow concept of
/// its own. Propagates the first oracle transport error encountered.
pub async fn tuple_join(
    oracle: &dyn Oracle,
    r1: &Relation,
    r2: &Relation,
    predicate: &str,
    model: &str,
) -> anyhow::Result<(Vec<InvocationStat>, Vec<Pair>)> {
    let mut stats = Vec::with_capacity(r1.len() * r2.len());
    let mut pairs = Vec::new();

    for row1 in r1 {
        for row2 in r2 {
            let started = Instant::now();
            let text = prompt::tuple_prompt(&row1.text, &row2.text, predicate);
            let request = ChatRequest::new(text, model, 1);

            let response = oracle.complete(request).await?;
            stats.push(InvocationStat::new(
                response.prompt_tokens,
                response.completion_tokens,
                started.elapsed().as_secs_f64(),
                None,
            ));
            if response.content == "Yes" {
                pairs.push(Pair::new(row1.text.clone(), row2.text.clone()));
            }
        }
    }

    Ok((stats, pairs))
}
