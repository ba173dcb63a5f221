//! Deterministic synthetic community-feedback generation.
//!
//! This crate produces a reproducible corpus of short player-feedback
//! messages about game patches, as they might appear on Reddit, Discord, and
//! X. Every record carries ground-truth theme and sentiment labels so the
//! corpus can drive clustering, classification, and summarisation pipelines
//! without touching real user data.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Weighted categorical sampling of patches, platforms, and themes
//! - Recency-biased timestamps within a configurable window
//! - Threaded conversations with reply links to earlier messages
//! - Slang and hedging text noise
//! - JSONL export, plus Parquet export behind the `parquet` feature
//!
//! # Example
//!
//! ```
//! use feedback_synth::{SynthConfig, generate_messages};
//! use mockable::DefaultClock;
//!
//! let config = SynthConfig::builder()
//!     .count(10)
//!     .seed(7)
//!     .build()
//!     .expect("valid config");
//! let corpus = generate_messages(&config, &DefaultClock).expect("generation succeeds");
//!
//! assert_eq!(corpus.records.len(), 10);
//! assert!(corpus.records.iter().all(|record| corpus.window.contains(record.created_at)));
//! ```

mod atomic_io;
mod catalog;
mod config;
mod error;
mod export;
mod generator;
mod identity;
mod profile;
mod record;
mod synthesizer;
mod timestamp;
mod weighted;

pub use catalog::{Sentiment, Theme, ThemeCatalog};
pub use config::{
    DEFAULT_JSONL_PATH, DEFAULT_MESSAGE_COUNT, DEFAULT_SEED, DEFAULT_TABLE_PATH,
    DEFAULT_THREAD_COUNT, DEFAULT_WINDOW_DAYS, SynthConfig, SynthConfigBuilder, SynthSettings,
};
pub use error::{ConfigError, ExportError, GenerationError, RunError};
#[cfg(feature = "parquet")]
pub use export::ParquetTableWriter;
pub use export::{
    ExportReport, TableOutcome, TableWriter, UnavailableTableWriter, default_table_writer,
    encode_jsonl, write_outputs,
};
pub use generator::{GeneratedCorpus, GenerationDriver, generate_messages};
pub use identity::{IdentityFactory, MessageId, ThreadId};
pub use profile::{
    CountDistribution, DEFAULT_HEDGE_PROBABILITY, DEFAULT_REPLY_PROBABILITY,
    DEFAULT_SLANG_PROBABILITY, EngagementProfile, SynthesisProfile, SynthesisProfileBuilder,
};
pub use record::{MessageRecord, Source, SourceMeta};
pub use synthesizer::RecordSynthesizer;
pub use timestamp::{TimeWindow, format_timestamp};
pub use weighted::WeightedTable;
