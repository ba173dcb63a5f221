//! Error types for the feedback-synth crate.
//!
//! This module defines semantic error enums for configuration validation,
//! record generation, and output export, following the project's error
//! handling conventions with `thiserror`.

use camino::Utf8PathBuf;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating configuration or synthesis tables.
///
/// Configuration errors are fatal and surface before any output is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The requested message count was zero.
    #[error("message count must be positive")]
    ZeroMessageCount,

    /// The requested thread pool size was zero.
    #[error("thread count must be positive")]
    ZeroThreadCount,

    /// The requested window length was zero days.
    #[error("window length must be at least one day")]
    ZeroWindowDays,

    /// A configuration layer could not be loaded.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Description of the loader error.
        message: String,
    },

    /// The generation window does not span any time.
    #[error("time window must span a positive duration (start {start}, end {end})")]
    EmptyWindow {
        /// Rendered window start.
        start: String,
        /// Rendered window end.
        end: String,
    },

    /// The window start falls outside the representable date range.
    #[error("a {days}-day window does not fit the supported date range")]
    WindowOutOfRange {
        /// Requested window length.
        days: u32,
    },

    /// A weight table was supplied without options.
    #[error("weight table '{table}' has no options")]
    EmptyWeights {
        /// Name of the offending table.
        table: &'static str,
    },

    /// A weight lies outside the half-open interval (0, 1].
    #[error("weight {weight} at index {index} of table '{table}' is outside (0, 1]")]
    WeightOutOfRange {
        /// Name of the offending table.
        table: &'static str,
        /// Position of the weight within the table.
        index: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// The weights of a table do not sum to one.
    #[error("weights of table '{table}' sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne {
        /// Name of the offending table.
        table: &'static str,
        /// The observed sum.
        sum: f64,
    },

    /// A probability lies outside [0, 1].
    #[error("probability '{name}' is {value}, expected a value in [0, 1]")]
    ProbabilityOutOfRange {
        /// Name of the probability setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A Gaussian parameter pair cannot describe a distribution.
    #[error("invalid distribution for '{name}': mean {mean}, standard deviation {std_dev}")]
    InvalidDistribution {
        /// Name of the metric the distribution samples.
        name: &'static str,
        /// Configured mean.
        mean: f64,
        /// Configured standard deviation.
        std_dev: f64,
    },

    /// A theme was declared without a label.
    #[error("theme label must not be empty")]
    EmptyThemeLabel,

    /// A theme was declared without phrases.
    #[error("theme '{label}' has an empty phrase pool")]
    EmptyPhrasePool {
        /// Label of the offending theme.
        label: String,
    },

    /// A theme catalog was declared without themes.
    #[error("theme catalog contains no themes")]
    EmptyCatalog,

    /// Two themes share a label.
    #[error("theme '{label}' is declared more than once")]
    DuplicateTheme {
        /// The duplicated label.
        label: String,
    },

    /// The slang token pool is empty.
    #[error("slang token pool must not be empty")]
    EmptySlangPool,

    /// An output path is not valid UTF-8.
    #[error("output path '{}' is not valid UTF-8", .path.display())]
    NonUtf8Path {
        /// The rejected path.
        path: PathBuf,
    },
}

/// Errors that can occur during record generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The synthesizer was given no threads to assign messages to.
    #[error("thread pool contains no threads")]
    EmptyThreadPool,

    /// The theme catalog yielded no theme for selection.
    #[error("theme catalog contains no themes for selection")]
    EmptyCatalog,

    /// A selected theme yielded no phrase.
    #[error("theme '{label}' has no phrases for selection")]
    EmptyPhrasePool {
        /// Label of the selected theme.
        label: String,
    },
}

/// Errors that can occur while writing generated records.
///
/// Filesystem failures are fatal and propagate to the caller; no partial
/// write recovery is attempted beyond the atomic rename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The parent directory of an output file could not be created or opened.
    #[error("failed to prepare directory '{path}': {message}")]
    DirectoryError {
        /// Directory that could not be prepared.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// An output file could not be written.
    #[error("failed to write '{path}': {message}")]
    WriteError {
        /// Path of the file being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A record could not be encoded as JSON.
    #[error("failed to encode record {index} as JSON: {message}")]
    EncodeError {
        /// Position of the record in the output sequence.
        index: usize,
        /// Description of the encoding error.
        message: String,
    },

    /// The tabular encoding failed.
    #[error("failed to encode table for '{path}': {message}")]
    TableError {
        /// Destination of the table.
        path: Utf8PathBuf,
        /// Description of the encoding error.
        message: String,
    },
}

/// Top-level failure of a generate-and-export run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The configuration or synthesis profile was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Record synthesis failed.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Writing an output file failed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ConfigError::ZeroMessageCount, "message count must be positive")]
    #[case(ConfigError::ZeroThreadCount, "thread count must be positive")]
    #[case(
        ConfigError::EmptyWeights { table: "sources" },
        "weight table 'sources' has no options"
    )]
    #[case(
        ConfigError::WeightsDoNotSumToOne { table: "patches", sum: 0.9 },
        "weights of table 'patches' sum to 0.9, expected 1.0"
    )]
    #[case(
        ConfigError::EmptyPhrasePool { label: "bug_report".to_owned() },
        "theme 'bug_report' has an empty phrase pool"
    )]
    #[case(
        ConfigError::DuplicateTheme { label: "ui_qol".to_owned() },
        "theme 'ui_qol' is declared more than once"
    )]
    fn config_error_formats_correctly(#[case] err: ConfigError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn config_error_weight_out_of_range_formats_correctly() {
        let err = ConfigError::WeightOutOfRange {
            table: "sources",
            index: 2,
            weight: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "weight 1.5 at index 2 of table 'sources' is outside (0, 1]"
        );
    }

    #[test]
    fn config_error_non_utf8_path_names_the_path() {
        let err = ConfigError::NonUtf8Path {
            path: PathBuf::from("/tmp/out.jsonl"),
        };
        assert_eq!(
            err.to_string(),
            "output path '/tmp/out.jsonl' is not valid UTF-8"
        );
    }

    #[test]
    fn generation_error_empty_thread_pool_formats_correctly() {
        assert_eq!(
            GenerationError::EmptyThreadPool.to_string(),
            "thread pool contains no threads"
        );
    }

    #[test]
    fn export_error_write_formats_correctly() {
        let err = ExportError::WriteError {
            path: Utf8PathBuf::from("data/raw/synth_messages.jsonl"),
            message: "disk full".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write 'data/raw/synth_messages.jsonl': disk full"
        );
    }

    #[test]
    fn run_error_wraps_config_error() {
        let err = RunError::from(ConfigError::ZeroMessageCount);
        assert_eq!(
            err.to_string(),
            "invalid configuration: message count must be positive"
        );
    }

    #[test]
    fn export_error_encode_formats_correctly() {
        let err = ExportError::EncodeError {
            index: 7,
            message: "bad value".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to encode record 7 as JSON: bad value"
        );
    }
}
