//! Embedding join driver: vector-similarity top-1 match.
//!
//! Grounded on `original_source/src/llmjoin/real/embedding_join.py`'s
//! `embedding_join` and `cosine_similarity`: embed every right row once,
//! then for each left row embed it and pick the right row with highest
//! cosine similarity. This is a top-1 match, not a filtered join — it
//! ignores the predicate entirely, preserved exactly as specified.

use std::time::Instant;

use crate::oracle::Oracle;
use crate::relation::{Pair, Relation, Row};
use crate::stats::InvocationStat;

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Run the embedding-based nearest-neighbor join.
///
/// Embeds every right row once, then for every left row embeds it and
/// emits a pair with whichever right row has the highest cosine
/// similarity. Statistics track every embedding call (reads); the
/// `overflow` field is always `None` — this path has no overflow concept.
/// Propagates the first oracle transport error encountered.
pub async fn embedding_join(
    oracle: &dyn Oracle,
    r1: &Relation,
    r2: &Relation,
    model: &str,
) -> anyhow::Result<(Vec<InvocationStat>, Vec<Pair>)> {
    let mut stats = Vec::new();

    if r1.is_empty() || r2.is_empty() {
        return Ok((stats, Vec::new()));
    }

    let mut right_embeddings: Vec<(Vec<f32>, &Row)> = Vec::with_capacity(r2.len());
    for row in r2 {
        let started = Instant::now();
        let embedding = oracle.embed(&row.text, model).await?;
        stats.push(InvocationStat::new(
            embedding.prompt_tokens,
            0,
            started.elapsed().as_secs_f64(),
            None,
        ));
        right_embeddings.push((embedding.vector, row));
    }

    let mut pairs = Vec::with_capacity(r1.len());
    for row in r1 {
        let started = Instant::now();
        let embedding = oracle.embed(&row.text, model).await?;
        stats.push(InvocationStat::new(
            embedding.prompt_tokens,
            0,
            started.elapsed().as_secs_f64(),
            None,
        ));
        let left_vector = embedding.vector;

        if let Some((_, best_row)) = right_embeddings.iter().max_by(|(va, _), (vb, _)| {
            cosine_similarity(&left_vector, va)
                .partial_cmp(&cosine_similarity(&left_vector, vb))
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            pairs.push(Pair::new(row.text.clone(), best_row.text.clone()));
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
    async fn embedding_join_top1_picks_highest_cosine_similarity() {
        let oracle = MockOracle::new(|_req: &crate::oracle::ChatRequest| ChatCompletion {
            content: String::new(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = rel(&["apple"]);
        let r2 = rel(&["apricot", "banana"]);
        let (stats, pairs) = embedding_join(&oracle, &r1, &r2, "text-embedding-3-small")
            .await
            .unwrap();
        assert_eq!(pairs, vec![Pair::new("apple", "apricot")]);
        // 2 right-row embeddings + 1 left-row embedding.
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.overflow.is_none()));
    }

    #[tokio::test]
    async fn empty_right_relation_yields_no_pairs() {
        let oracle = MockOracle::new(|_req: &crate::oracle::ChatRequest| ChatCompletion {
            content: String::new(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = rel(&["apple"]);
        let r2 = Relation::new(vec![]);
        let (stats, pairs) = embedding_join(&oracle, &r1, &r2, "text-embedding-3-small")
            .await
            .unwrap();
        assert!(stats.is_empty());
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn transport_error_embedding_right_relation_propagates() {
        let oracle = MockOracle::new(|_req: &crate::oracle::ChatRequest| ChatCompletion {
            content: String::new(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        oracle.fail_next_n_embed_calls(1);
        let r1 = rel(&["apple"]);
        let r2 = rel(&["apricot"]);
        let result = embedding_join(&oracle, &r1, &r2, "text-embedding-3-small").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_error_embedding_left_relation_propagates() {
        let oracle = MockOracle::new(|_req: &crate::oracle::ChatRequest| ChatCompletion {
            content: String::new(),
            finish_reason: "stop".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        });
        let r1 = rel(&["apple"]);
        let r2 = rel(&["apricot"]);
        // Let the single right-row embed succeed, then fail the left row's.
        oracle.fail_next_n_embed_calls(0);
        let right_call = oracle.embed("apricot", "text-embedding-3-small").await;
        assert!(right_call.is_ok());
        oracle.fail_next_n_embed_calls(1);
        let result = embedding_join(&oracle, &r1, &r2, "text-embedding-3-small").await;
        assert!(result.is_err());
    }

    #[test]
    fn cosine_similarity_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_similarity_handles_zero_vector_without_dividing_by_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
