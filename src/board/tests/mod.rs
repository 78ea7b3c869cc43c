//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation counts and legality
//! - `make_unmake.rs` - Do/undo correctness and incremental state
//! - `eval.rs` - Static evaluation properties
//! - `repetition.rs` - Repetition cycle judgement
//! - `search.rs` - Search results against a plain minimax
//! - `proptest.rs` - Property-based tests

mod search;
