//! Writing generated records to disk.
//!
//! The JSONL file is always written first and is the primary artefact. The
//! columnar table is best effort: a [`TableWriter`] reports whether this
//! build can encode tables, and when it cannot the table is skipped with a
//! warning instead of failing the run.

#[cfg(feature = "parquet")]
mod parquet;

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::{debug, info, warn};

use crate::atomic_io::write_atomic;
use crate::config::SynthConfig;
use crate::error::ExportError;
use crate::record::MessageRecord;

#[cfg(feature = "parquet")]
pub use self::parquet::ParquetTableWriter;

/// Encodes records into a columnar table file.
pub trait TableWriter {
    /// Returns `true` when this writer can encode tables in the current build.
    fn is_available(&self) -> bool;

    /// Human-readable explanation used when the writer is unavailable.
    fn unavailable_reason(&self) -> String;

    /// Encodes `records` into the bytes of a table file destined for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::TableError`] if encoding fails.
    fn encode(&self, records: &[MessageRecord], path: &Utf8Path) -> Result<Vec<u8>, ExportError>;
}

/// Table writer for builds without columnar support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTableWriter;

impl TableWriter for UnavailableTableWriter {
    fn is_available(&self) -> bool {
        false
    }

    fn unavailable_reason(&self) -> String {
        "parquet support is not compiled in; rebuild with the `parquet` feature".to_owned()
    }

    fn encode(&self, _records: &[MessageRecord], path: &Utf8Path) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::TableError {
            path: path.to_path_buf(),
            message: self.unavailable_reason(),
        })
    }
}

/// Returns the best table writer this build supports.
#[cfg(feature = "parquet")]
#[must_use]
pub fn default_table_writer() -> Box<dyn TableWriter> {
    Box::new(ParquetTableWriter)
}

/// Returns the best table writer this build supports.
#[cfg(not(feature = "parquet"))]
#[must_use]
pub fn default_table_writer() -> Box<dyn TableWriter> {
    Box::new(UnavailableTableWriter)
}

/// What happened to the table output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// The table was written to `path`.
    Written {
        /// Destination of the table file.
        path: Utf8PathBuf,
    },
    /// The table was not written.
    Skipped {
        /// Why the table was skipped.
        reason: String,
    },
}

/// Summary of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Destination of the JSONL file.
    pub jsonl_path: Utf8PathBuf,
    /// Number of records written.
    pub rows: usize,
    /// Outcome of the table export.
    pub table: TableOutcome,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wrote:")?;
        writeln!(f, "- {}", self.jsonl_path)?;
        match &self.table {
            TableOutcome::Written { path } => writeln!(f, "- {path}")?,
            TableOutcome::Skipped { reason } => writeln!(f, "Table export skipped: {reason}")?,
        }
        write!(f, "Rows: {}", self.rows)
    }
}

/// Writes `records` as JSONL and, when supported, as a table.
///
/// # Errors
///
/// Returns [`ExportError`] if a record cannot be encoded, a directory cannot
/// be prepared, or a file cannot be written. An unavailable table writer is
/// not an error.
pub fn write_outputs(
    records: &[MessageRecord],
    config: &SynthConfig,
    table_writer: &dyn TableWriter,
) -> Result<ExportReport, ExportError> {
    let jsonl_path = config.jsonl_path();
    let jsonl = encode_jsonl(records)?;
    write_file(jsonl_path, &jsonl)?;
    info!(path = %jsonl_path, rows = records.len(), "wrote JSONL output");

    let table = if table_writer.is_available() {
        let table_path = config.table_path();
        let bytes = table_writer.encode(records, table_path)?;
        write_file(table_path, &bytes)?;
        info!(path = %table_path, rows = records.len(), "wrote table output");
        TableOutcome::Written {
            path: table_path.to_path_buf(),
        }
    } else {
        let reason = table_writer.unavailable_reason();
        warn!(path = %config.table_path(), %reason, "table export skipped");
        TableOutcome::Skipped { reason }
    };

    Ok(ExportReport {
        jsonl_path: jsonl_path.to_path_buf(),
        rows: records.len(),
        table,
    })
}

/// Encodes records as newline-terminated JSON objects.
///
/// # Errors
///
/// Returns [`ExportError::EncodeError`] naming the first record that fails.
pub fn encode_jsonl(records: &[MessageRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    for (index, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut buffer, record).map_err(|err| ExportError::EncodeError {
            index,
            message: err.to_string(),
        })?;
        buffer.push(b'\n');
    }
    Ok(buffer)
}

fn write_file(target: &Utf8Path, contents: &[u8]) -> Result<(), ExportError> {
    let file_name = target
        .file_name()
        .map(Utf8Path::new)
        .ok_or_else(|| ExportError::WriteError {
            path: target.to_path_buf(),
            message: "output path must name a file".to_owned(),
        })?;
    let dir = open_parent_dir(target)?;
    debug!(path = %target, bytes = contents.len(), "writing output file");
    write_atomic(&dir, file_name, target, contents)
}

fn open_parent_dir(target: &Utf8Path) -> Result<Dir, ExportError> {
    let parent = target
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let directory_error = |err: std::io::Error| ExportError::DirectoryError {
        path: parent.to_path_buf(),
        message: err.to_string(),
    };

    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(directory_error)?;
    Dir::open_ambient_dir(parent, ambient_authority()).map_err(directory_error)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::catalog::Sentiment;
    use crate::identity::{MessageId, ThreadId};
    use crate::record::{Source, SourceMeta};

    #[fixture]
    fn record() -> MessageRecord {
        MessageRecord {
            id: MessageId::new("m_00000000000000000000000000000001"),
            source: Source::Reddit,
            patch_id: "patch_1_12_0".to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2026, 2, 20, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
            thread_id: ThreadId::new("t_0000abcd"),
            parent_id: None,
            author: "u_0000000001".to_owned(),
            text: "Servers keep disconnecting mid-raid".to_owned(),
            meta: SourceMeta::Reddit {
                score: 12,
                subreddit: "ArcRaiders".to_owned(),
            },
            theme: "server_connectivity".to_owned(),
            sentiment: Sentiment::Negative,
        }
    }

    #[rstest]
    fn jsonl_has_one_terminated_line_per_record(record: MessageRecord) {
        let records = vec![record.clone(), record];
        let bytes = encode_jsonl(&records).expect("encode");
        let text = String::from_utf8(bytes).expect("utf-8");

        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 2);
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            assert_eq!(value["label_true"], "server_connectivity");
            assert_eq!(value["meta"]["subreddit"], "ArcRaiders");
        }
    }

    #[test]
    fn empty_input_encodes_to_empty_file() {
        assert!(encode_jsonl(&[]).expect("encode").is_empty());
    }

    #[test]
    fn unavailable_writer_explains_itself() {
        let writer = UnavailableTableWriter;
        assert!(!writer.is_available());
        assert!(writer.unavailable_reason().contains("parquet"));

        let err = writer
            .encode(&[], Utf8Path::new("out.parquet"))
            .expect_err("unavailable writer cannot encode");
        assert!(matches!(err, ExportError::TableError { .. }));
    }

    #[rstest]
    #[case::written(
        TableOutcome::Written { path: Utf8PathBuf::from("data/processed/synth_messages.parquet") },
        "Wrote:\n- data/raw/synth_messages.jsonl\n- data/processed/synth_messages.parquet\nRows: 2500"
    )]
    #[case::skipped(
        TableOutcome::Skipped { reason: "no parquet".to_owned() },
        "Wrote:\n- data/raw/synth_messages.jsonl\nTable export skipped: no parquet\nRows: 2500"
    )]
    fn report_summarises_outputs(#[case] table: TableOutcome, #[case] expected: &str) {
        let report = ExportReport {
            jsonl_path: Utf8PathBuf::from("data/raw/synth_messages.jsonl"),
            rows: 2_500,
            table,
        };
        assert_eq!(report.to_string(), expected);
    }

    #[cfg(not(feature = "parquet"))]
    #[test]
    fn default_writer_is_unavailable_without_feature() {
        assert!(!default_table_writer().is_available());
    }

    #[cfg(feature = "parquet")]
    #[test]
    fn default_writer_is_available_with_feature() {
        assert!(default_table_writer().is_available());
    }
}
