//! Prompt builder: assemble block/tuple prompts and measure the static
//! prompt size.

use crate::relation::Block;
use crate::tokenizer;

/// Build the block-join prompt: lists block1 then block2 (1-indexed) and
/// asks the oracle for `x,y` index pairs.
///
/// Required content: the predicate verbatim with a "catch all pairs"
/// directive; the semicolon-separation rule; the `Finished` terminator
/// rule; 1-indexed listings of both collections; a trailing
/// `Index pairs:` label.
pub fn block_prompt(block1: &[&str], block2: &[&str], predicate: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(format!(
        "Find indexes x,y where x is the number of an entry in collection 1 \
         and y the number of an entry in collection 2 such that {predicate} \
         (make sure to catch all pairs!)!"
    ));
    parts.push("Separate index pairs by semicolons.".to_string());
    parts.push("Write \"Finished\" after the last pair!".to_string());
    parts.push("Text Collection 1:".to_string());
    for (idx, text) in block1.iter().enumerate() {
        parts.push(format!("{}: {}", idx + 1, text));
    }
    parts.push("Text Collection 2:".to_string());
    for (idx, text) in block2.iter().enumerate() {
        parts.push(format!("{}: {}", idx + 1, text));
    }
    parts.push("Index pairs:".to_string());
    parts.join("\n")
}

/// Convenience overload that takes [`Block`]s instead of raw slices.
pub fn block_prompt_for(block1: &Block, block2: &Block, predicate: &str) -> String {
    block_prompt(&block1.texts(), &block2.texts(), predicate)
}

/// Measure the static (block-independent) prompt size `p` by building a
/// prompt with two empty blocks and tokenizing it. Isolates the per-call
/// fixed overhead from per-row contributions.
pub fn static_prompt_size(predicate: &str) -> usize {
    tokenizer::size(&block_prompt(&[], &[], predicate))
}

/// Build the tuple-join Yes/No probe prompt.
pub fn tuple_prompt(tuple1: &str, tuple2: &str, predicate: &str) -> String {
    let parts = [
        format!("Is the following true (\"Yes\"/\"No\"): {predicate}?"),
        format!("Text 1: {tuple1}"),
        format!("Text 2: {tuple2}"),
        "Answer:".to_string(),
    ];
    parts.join("\n")
}
