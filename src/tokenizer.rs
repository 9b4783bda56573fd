//! Tokenizer: map text to a token count under the oracle's tokenization
//! scheme.
//!
//! Uses a cached BPE tokenizer (`tiktoken-rs`'s `o200k_base` encoding, the
//! family GPT-4o-class chat models use) so block-size math stays aligned
//! with the oracle's own server-side accounting. When the BPE table cannot
//! be loaded, callers can fall back to [`approximate_size`], a coarse
//! `ceil(len / 4)` heuristic — at the cost of weaker overflow margins.

use tiktoken_rs::CoreBPE;

use crate::relation::Relation;

/// Cached BPE tokenizer, created once and reused on every call.
fn bpe() -> &'static CoreBPE {
    use std::sync::OnceLock;
    static BPE: OnceLock<CoreBPE> = OnceLock::new();
    BPE.get_or_init(|| tiktoken_rs::o200k_base().expect("failed to load o200k_base tokenizer"))
}

/// Token count of `text` under the oracle's tokenizer.
pub fn size(text: &str) -> usize {
    bpe().encode_with_special_tokens(text).len()
}

/// Coarse fallback token-count estimate for environments where the BPE
/// table is unavailable. Never returns zero for non-empty text.
pub fn approximate_size(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.len().div_ceil(4)
    }
}

/// Mean token size of the `text` column over all rows of `relation`.
/// An empty relation has average size `0.0`.
pub fn avg_tuple_size(relation: &Relation) -> f64 {
    if relation.is_empty() {
        return 0.0;
    }
    let total: usize = relation.rows().iter().map(|r| size(&r.text)).sum();
    total as f64 / relation.len() as f64
}
