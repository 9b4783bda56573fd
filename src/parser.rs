//! Answer parser: extract index pairs from the oracle reply, validate
//! bounds.
//!
//! Total: never fails, only discards malformed fragments. This tolerates
//! the LLM inserting commentary, stray text, or off-by-one fantasies
//! without crashing the pipeline.

use crate::relation::{Block, Pair};

/// Parse `reply` into join pairs against `block1`/`block2`.
///
/// Algorithm: split on `;` → for each fragment split on `,` into exactly
/// two parts → strip whitespace → require both parts to be pure digit
/// strings → convert to 0-based indices → bounds-check against block
/// sizes → emit `{tuple1: block1[i], tuple2: block2[j]}`. Any fragment
/// failing any check is silently dropped.
pub fn parse_answer(reply: &str, block1: &Block, block2: &Block) -> Vec<Pair> {
    let mut results = Vec::new();

    for fragment in reply.split(';') {
        let raw_indexes: Vec<&str> = fragment.split(',').collect();
        if raw_indexes.len() != 2 {
            continue;
        }
        let x_raw = raw_indexes[0].trim();
        let y_raw = raw_indexes[1].trim();

        if x_raw.is_empty() || y_raw.is_empty() {
            continue;
        }
        if !x_raw.chars().all(|c| c.is_ascii_digit()) || !y_raw.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }

        let Ok(x) = x_raw.parse::<usize>() else {
            continue;
        };
        let Ok(y) = y_raw.parse::<usize>() else {
            continue;
        };
        if x == 0 || y == 0 {
            continue;
        }
        let (index1, index2) = (x - 1, y - 1);

        if index1 >= block1.len() || index2 >= block2.len() {
            continue;
        }

        results.push(Pair::new(
            block1.rows()[index1].text.clone(),
            block2.rows()[index2].text.clone(),
        ));
    }

    results
}
