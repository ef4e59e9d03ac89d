use thiserror::Error;

use crate::DataIndex;

/// Reported by `verify` when a tree no longer satisfies the red-black rules.
/// Every variant carries the index of the offending node.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Root at index {0} is red")]
    RedRoot(DataIndex),
    #[error("Item at index {0} is out of order")]
    OutOfOrder(DataIndex),
    #[error("Red node at index {0} has a red child")]
    ConsecutiveRed(DataIndex),
    #[error("Black height {found} under index {index} differs from {expected}")]
    BlackHeight {
        index: DataIndex,
        expected: usize,
        found: usize,
    },
    #[error("Right leaning red link at index {0}")]
    RightLeaningRed(DataIndex),
}

impl InvariantViolation {
    pub fn index(&self) -> DataIndex {
        match self {
            InvariantViolation::RedRoot(index)
            | InvariantViolation::OutOfOrder(index)
            | InvariantViolation::ConsecutiveRed(index)
            | InvariantViolation::RightLeaningRed(index) => *index,
            InvariantViolation::BlackHeight { index, .. } => *index,
        }
    }
}
