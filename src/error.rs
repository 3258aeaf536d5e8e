// ⚠️ Fleet errors
// Every failure the ledger, the importer and the snapshot store can report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// Malformed import line or unreadable import file (fatal at startup)
    #[error("Error reading CSV file: line {line}: {reason}")]
    Import { line: usize, reason: String },

    /// Snapshot could not be read or written
    #[error("Snapshot {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Malformed fields for an add or expense command
    #[error("Invalid data format: {0}")]
    InvalidInput(String),

    #[error("Cannot find boat {name}")]
    NotFound { name: String },

    /// Expense would push the boat over its purchase price
    #[error("Expense not permitted, only ${remaining:.2} left to spend.")]
    BudgetExceeded { name: String, remaining: f64 },
}

impl FleetError {
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FleetError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Fatal errors end startup; everything else is reported and skipped
    pub fn is_fatal(&self) -> bool {
        matches!(self, FleetError::Import { .. })
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
