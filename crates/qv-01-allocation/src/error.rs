//! Error types for the input adapter
//!
//! Allocation Model operations never fail; only pointer input can be
//! rejected.

use thiserror::Error;

/// Rejected pointer input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Another row already owns the pointer.
    #[error("Row {active} is already being dragged")]
    DragInProgress { active: usize },

    /// The row is at 0% while the allocation is over budget.
    #[error("Row {row} is locked while the allocation exceeds 100%")]
    RowLocked { row: usize },

    /// Pointer event for a row the view does not have.
    #[error("Row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;
