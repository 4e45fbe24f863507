//! Controller error cases.
//!
//! None of these escape [`CardStack`](super::stack::CardStack): they are
//! logged and the controller falls back to its last stable state.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("no card handle at index {index} (sequence length {len})")]
    MissingCard { index: usize, len: usize },

    #[error("card sequence is empty")]
    EmptySequence,
}
