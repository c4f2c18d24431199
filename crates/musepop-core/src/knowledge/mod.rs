//! Knowledge-graph lookups: entity ids, quantity statements, memoization.

pub mod memo;
pub mod resolver;
pub mod statements;

pub use memo::ResolutionMemo;
pub use resolver::KnowledgeResolver;
pub use statements::{parse_amount, parse_point_in_time, parse_statement, select_latest};
