//! Parquet table encoding.

use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use camino::Utf8Path;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::TableWriter;
use crate::error::ExportError;
use crate::record::{MessageRecord, SourceMeta};
use crate::timestamp::format_timestamp;

/// Writes records as a Snappy-compressed Parquet file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetTableWriter;

impl TableWriter for ParquetTableWriter {
    fn is_available(&self) -> bool {
        true
    }

    fn unavailable_reason(&self) -> String {
        String::new()
    }

    fn encode(&self, records: &[MessageRecord], path: &Utf8Path) -> Result<Vec<u8>, ExportError> {
        let table_error = |message: String| ExportError::TableError {
            path: path.to_path_buf(),
            message,
        };

        let schema = Arc::new(table_schema());
        let batch = RecordBatch::try_new(Arc::clone(&schema), columns(records))
            .map_err(|err| table_error(err.to_string()))?;

        let properties = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(properties))
            .map_err(|err| table_error(err.to_string()))?;
        writer
            .write(&batch)
            .map_err(|err| table_error(err.to_string()))?;
        writer.close().map_err(|err| table_error(err.to_string()))?;

        Ok(buffer)
    }
}

fn table_schema() -> Schema {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    Schema::new(vec![
        text("id"),
        text("source"),
        text("patch_id"),
        text("created_at"),
        text("thread_id"),
        Field::new("parent_id", DataType::Utf8, true),
        text("author_hash"),
        text("text"),
        text("label_true"),
        text("sentiment_true"),
        Field::new("meta_score", DataType::Int64, true),
        Field::new("meta_reactions", DataType::Int64, true),
        Field::new("meta_likes", DataType::Int64, true),
        Field::new("meta_retweets", DataType::Int64, true),
        Field::new("meta_subreddit", DataType::Utf8, true),
        Field::new("meta_channel", DataType::Utf8, true),
    ])
}

/// Platform metadata spread across nullable columns.
#[derive(Default)]
struct MetaColumns<'a> {
    score: Option<i64>,
    reactions: Option<i64>,
    likes: Option<i64>,
    retweets: Option<i64>,
    subreddit: Option<&'a str>,
    channel: Option<&'a str>,
}

impl<'a> From<&'a SourceMeta> for MetaColumns<'a> {
    fn from(meta: &'a SourceMeta) -> Self {
        match meta {
            SourceMeta::Reddit { score, subreddit } => Self {
                score: Some(i64::from(*score)),
                subreddit: Some(subreddit.as_str()),
                ..Self::default()
            },
            SourceMeta::Discord { reactions, channel } => Self {
                reactions: Some(i64::from(*reactions)),
                channel: Some(channel.as_str()),
                ..Self::default()
            },
            SourceMeta::X { likes, retweets } => Self {
                likes: Some(i64::from(*likes)),
                retweets: Some(i64::from(*retweets)),
                ..Self::default()
            },
        }
    }
}

fn columns<'a>(records: &'a [MessageRecord]) -> Vec<ArrayRef> {
    let strings = |field: fn(&'a MessageRecord) -> &'a str| -> ArrayRef {
        Arc::new(records.iter().map(field).map(Some).collect::<StringArray>())
    };
    let created_at: Vec<String> = records
        .iter()
        .map(|record| format_timestamp(record.created_at))
        .collect();
    let meta: Vec<MetaColumns<'a>> = records.iter().map(|r| MetaColumns::from(&r.meta)).collect();
    let counts = |field: fn(&MetaColumns<'_>) -> Option<i64>| -> ArrayRef {
        Arc::new(meta.iter().map(field).collect::<Int64Array>())
    };
    let labels = |field: fn(&MetaColumns<'a>) -> Option<&'a str>| -> ArrayRef {
        Arc::new(meta.iter().map(field).collect::<StringArray>())
    };

    vec![
        strings(|r| r.id.as_str()),
        strings(|r| r.source.as_str()),
        strings(|r| r.patch_id.as_str()),
        Arc::new(StringArray::from_iter_values(&created_at)),
        strings(|r| r.thread_id.as_str()),
        Arc::new(
            records
                .iter()
                .map(|r| r.parent_id.as_ref().map(|id| id.as_str()))
                .collect::<StringArray>(),
        ),
        strings(|r| r.author.as_str()),
        strings(|r| r.text.as_str()),
        strings(|r| r.theme.as_str()),
        strings(|r| r.sentiment.as_str()),
        counts(|m| m.score),
        counts(|m| m.reactions),
        counts(|m| m.likes),
        counts(|m| m.retweets),
        labels(|m| m.subreddit),
        labels(|m| m.channel),
    ]
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use parquet::file::reader::{FileReader, SerializedFileReader};

    use super::*;
    use crate::config::SynthConfig;
    use crate::generator::generate_messages;
    use mockable::DefaultClock;

    #[test]
    fn encodes_one_row_per_record_with_all_columns() {
        let config = SynthConfig::builder()
            .count(25)
            .seed(7)
            .build()
            .expect("valid config");
        let corpus = generate_messages(&config, &DefaultClock).expect("generated");

        let bytes = ParquetTableWriter
            .encode(&corpus.records, Utf8Path::new("out.parquet"))
            .expect("encode");
        let path = std::env::temp_dir().join(format!(
            "feedback-synth-parquet-{}.parquet",
            std::process::id()
        ));
        std::fs::write(&path, bytes).expect("write parquet");
        let reader =
            SerializedFileReader::new(File::open(&path).expect("open parquet")).expect("valid parquet");
        let metadata = reader.metadata();

        assert_eq!(metadata.file_metadata().num_rows(), 25);
        assert_eq!(metadata.file_metadata().schema_descr().num_columns(), 16);
        std::fs::remove_file(path).expect("clean up");
    }
}
