//! llmjoin — semantic join between two text relations under a
//! natural-language predicate, using a remote LLM as the comparison oracle.
//!
//! The engine is a block-nested-loops executor ([`block_join`]) wrapped by
//! an adaptive selectivity controller ([`adaptive`]), plus two simpler
//! execution paths: a tuple-at-a-time Yes/No probe ([`tuple_join`]) and an
//! embedding-based nearest-neighbor join ([`embedding_join`]).
//!
//! This crate does not initialize logging on its own — call
//! [`logging::init_tracing`] from a binary or test harness if you want
//! human-readable `tracing` output.

pub mod adaptive;
pub mod block_join;
pub mod config;
pub mod embedding_join;
pub mod error;
pub mod executor;
pub mod logging;
pub mod optimizer;
pub mod oracle;
pub mod parser;
pub mod partition;
pub mod prompt;
pub mod relation;
pub mod stats;
pub mod tokenizer;
pub mod tuple_join;

pub use config::JoinConfig;
pub use error::{OracleError, OracleOutcome};
pub use relation::{Block, Pair, Relation, Row};
pub use stats::InvocationStat;

pub use adaptive::adaptive_join;
pub use block_join::block_join;
pub use embedding_join::embedding_join;
pub use tuple_join::tuple_join;
