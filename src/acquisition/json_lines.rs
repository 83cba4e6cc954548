//! JSON-lines snapshot source
//!
//! One camelCase `HealthSnapshot` object per line, e.g.
//! `{"heartRate":72,"hydrationLevel":65,"bodyTemperature":36.7,"stressLevel":35}`.
//! Used with `water-formula recommend` and piped wristband exports.

use std::io::BufRead;

use super::{SnapshotEvent, SnapshotSource, SourceError};
use crate::types::HealthSnapshot;

/// Reads JSON snapshots line by line from any buffered reader.
pub struct JsonLinesSource<R> {
    reader: R,
    name: String,
    line_buffer: String,
    line_no: usize,
    strict: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Lenient source: malformed lines are logged and skipped.
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line_buffer: String::with_capacity(512),
            line_no: 0,
            strict: false,
        }
    }

    /// Strict source: the first malformed line fails with `SourceError::Parse`.
    pub fn strict(reader: R, name: impl Into<String>) -> Self {
        Self {
            strict: true,
            ..Self::new(reader, name)
        }
    }

    /// Lines consumed so far (including blank and skipped ones).
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> SnapshotSource for JsonLinesSource<R> {
    fn next_snapshot(&mut self) -> Result<SnapshotEvent, SourceError> {
        loop {
            self.line_buffer.clear();
            let bytes = self.reader.read_line(&mut self.line_buffer)?;
            if bytes == 0 {
                return Ok(SnapshotEvent::Eof);
            }
            self.line_no += 1;
            let line = self.line_buffer.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<HealthSnapshot>(line) {
                Ok(snapshot) => return Ok(SnapshotEvent::Snapshot(snapshot)),
                Err(e) if self.strict => {
                    return Err(SourceError::Parse {
                        line: self.line_no,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(source = %self.name, line = self.line_no, error = %e, "Skipping malformed snapshot");
                }
            }
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GOOD: &str = r#"{"heartRate":90,"hydrationLevel":70,"bodyTemperature":36.8,"stressLevel":20}"#;

    #[test]
    fn test_reads_snapshots_then_eof() {
        let input = format!("{GOOD}\n\n{GOOD}\n");
        let mut src = JsonLinesSource::new(Cursor::new(input), "test");
        let first = src.next_snapshot().unwrap().into_snapshot().unwrap();
        assert_eq!(first.heart_rate, 90.0);
        assert_eq!(first.steps, 0.0);
        assert!(matches!(src.next_snapshot().unwrap(), SnapshotEvent::Snapshot(_)));
        assert_eq!(src.next_snapshot().unwrap(), SnapshotEvent::Eof);
        assert_eq!(src.lines_read(), 3);
    }

    #[test]
    fn test_lenient_skips_malformed() {
        let input = format!("not json\n{{\"heartRate\":1}}\n{GOOD}\n");
        let mut src = JsonLinesSource::new(Cursor::new(input), "test");
        let s = src.next_snapshot().unwrap().into_snapshot().unwrap();
        assert_eq!(s.hydration_level, 70.0);
    }

    #[test]
    fn test_strict_reports_line_number() {
        let input = format!("{GOOD}\n{{\"heartRate\":1}}\n");
        let mut src = JsonLinesSource::strict(Cursor::new(input), "test");
        assert!(src.next_snapshot().is_ok());
        match src.next_snapshot() {
            Err(SourceError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("hydrationLevel"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_eof() {
        let mut src = JsonLinesSource::strict(Cursor::new(""), "empty");
        assert_eq!(src.next_snapshot().unwrap(), SnapshotEvent::Eof);
        assert_eq!(src.source_name(), "empty");
    }
}
