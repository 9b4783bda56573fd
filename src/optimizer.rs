//! Block-size optimizer.
//!
//! Closed-form solution for the block dimensions (b1, b2) that minimize
//! the number of oracle invocations needed to join two relations, subject
//! to keeping prompt + expected-answer tokens under the budget `t`.
//!
//! Direct port of the reference implementation's `optimal_block_size`
//! (`original_source/src/llmjoin/common/tuning.py`), expressed with
//! explicit `f64` arithmetic.

/// Selectivity estimates are floored at this value to avoid division by
/// zero in the optimizer.
pub const SELECTIVITY_FLOOR: f64 = 0.000_000_1;

/// Default size, in tokens, of one emitted `tuple1,tuple2` pair encoding
/// in the oracle's reply. Not derived from measurement — a fixed
/// approximation the reference implementation also uses, kept as a crate
/// constant but always passed explicitly to [`optimal_block_size`] so a
/// caller can override it.
pub const DEFAULT_PAIR_ENCODING_SIZE: f64 = 4.0;

/// Block dimensions computed by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSize {
    pub b1: i64,
    pub b2: i64,
}

impl BlockSize {
    /// A configuration is infeasible when either dimension is below 1 —
    /// there isn't enough budget to fit even one row of each side.
    pub fn is_feasible(&self) -> bool {
        self.b1 >= 1 && self.b2 >= 1
    }
}

/// Compute optimal block sizes for a block join.
///
/// * `s1` — average token size of left-relation tuples.
/// * `s2` — average token size of right-relation tuples.
/// * `s3` — average token size of one emitted pair-encoding
///   (use [`DEFAULT_PAIR_ENCODING_SIZE`] unless overriding).
/// * `t`  — total token budget per oracle call.
/// * `p`  — static (block-independent) prompt size.
/// * `estimate` — selectivity estimate, floored at [`SELECTIVITY_FLOOR`].
///
/// Returns block dimensions; check [`BlockSize::is_feasible`] before using
/// them — a non-feasible result means the caller should treat the
/// invocation as overflow without contacting the oracle.
pub fn optimal_block_size(s1: f64, s2: f64, s3: f64, t: f64, p: f64, estimate: f64) -> BlockSize {
    let estimate = estimate.max(SELECTIVITY_FLOOR);

    let discriminant = s1 * s1 * s2 * s2 + s1 * s2 * s3 * estimate * (t - p);
    let b1 = ((discriminant.sqrt() - s1 * s2) / (s1 * s3 * estimate)).floor() as i64;
    let b2 = (((t - p) - b1 as f64 * s1) / (s2 + b1 as f64 * s3 * estimate)).floor() as i64;

    BlockSize { b1, b2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes_for_documented_worked_example() {
        // s1=s2=10, s3=4, t=2000, p=100, estimate=0.001 — matching
        // `original_source`'s `optimal_block_size` executed directly on
        // these inputs (b1=b2=93; see DESIGN.md for why this differs from
        // the distilled worked arithmetic for this example).
        let bs = optimal_block_size(10.0, 10.0, 4.0, 2000.0, 100.0, 0.001);
        assert_eq!(bs.b1, 93);
        assert_eq!(bs.b2, 93);
    }

    #[test]
    fn feasible_when_both_dims_at_least_one() {
        let bs = BlockSize { b1: 1, b2: 1 };
        assert!(bs.is_feasible());
    }

    #[test]
    fn infeasible_when_a_dim_is_zero() {
        let bs = BlockSize { b1: 0, b2: 5 };
        assert!(!bs.is_feasible());
    }

    #[test]
    fn monotone_in_selectivity_estimate() {
        // Larger estimate -> weakly smaller (b1, b2).
        let low = optimal_block_size(10.0, 10.0, 4.0, 2000.0, 100.0, 0.001);
        let high = optimal_block_size(10.0, 10.0, 4.0, 2000.0, 100.0, 0.1);
        assert!(high.b1 <= low.b1);
        assert!(high.b2 <= low.b2);
    }

    #[test]
    fn estimate_is_floored_against_zero() {
        // estimate = 0 must not panic (division by zero) — floored internally.
        let bs = optimal_block_size(10.0, 10.0, 4.0, 2000.0, 100.0, 0.0);
        assert!(bs.b1 >= 1);
    }

    #[test]
    fn large_estimate_shrinks_to_minimum_feasible_block() {
        // For estimate >= 1 the budget barely fits one pair's worth of output.
        let bs = optimal_block_size(10.0, 10.0, 4.0, 2000.0, 100.0, 1.0);
        assert!(bs.is_feasible());
        assert!(bs.b1 * 10 + bs.b2 * 10 <= (2000 - 100));
    }

    #[test]
    fn tiny_budget_is_infeasible() {
        // t - p smaller than either tuple size: no room for even one row.
        let bs = optimal_block_size(500.0, 500.0, 4.0, 600.0, 590.0, 0.5);
        assert!(!bs.is_feasible());
    }
}
