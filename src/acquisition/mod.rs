//! Health snapshot acquisition
//!
//! A unified trait for reading wristband readings from different sources:
//! JSON lines (stdin or a file) and a simulated random-walk device.

mod json_lines;
mod wristband;

pub use json_lines::JsonLinesSource;
pub use wristband::SimulatedWristband;

use thiserror::Error;

use crate::types::{FormulaError, HealthSnapshot};

/// Errors reading snapshots
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Snapshot source I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Events produced by a snapshot source.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    /// A complete reading.
    Snapshot(HealthSnapshot),
    /// No more readings will arrive.
    Eof,
}

impl SnapshotEvent {
    pub fn into_snapshot(self) -> Option<HealthSnapshot> {
        match self {
            Self::Snapshot(s) => Some(s),
            Self::Eof => None,
        }
    }
}

/// Trait abstracting where health snapshots come from.
pub trait SnapshotSource {
    /// Read the next snapshot.
    ///
    /// Returns `SnapshotEvent::Eof` when no more data is available.
    fn next_snapshot(&mut self) -> Result<SnapshotEvent, SourceError>;

    /// Human-readable name for logging (e.g. "stdin", "wristband-sim").
    fn source_name(&self) -> &str;
}

/// Gate between a source and the recommendation engine.
///
/// The engine itself never sees an absent reading.
pub fn require_snapshot(snapshot: Option<HealthSnapshot>) -> Result<HealthSnapshot, FormulaError> {
    snapshot.ok_or(FormulaError::MissingSnapshot)
}
