//! Error types for topology building.

use thiserror::Error;

/// Errors produced while handling architecture snapshots.
///
/// Normalization and analysis are total over structurally plausible input
/// and have no error path of their own; only the snapshot (de)serializer
/// can fail.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// An architecture snapshot could not be parsed or written.
    #[error("Failed to process architecture snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
