//! Generation configuration.
//!
//! [`SynthSettings`] is the layered, OrthoConfig-loaded view (CLI flags,
//! `FEEDBACK_SYNTH_*` environment variables, configuration files) in which
//! every value is optional. [`SynthConfig`] is the validated, immutable value
//! the generator and writer consume.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default number of messages per run.
pub const DEFAULT_MESSAGE_COUNT: usize = 2_500;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default destination of the line-delimited JSON output.
pub const DEFAULT_JSONL_PATH: &str = "data/raw/synth_messages.jsonl";

/// Default destination of the columnar table output.
pub const DEFAULT_TABLE_PATH: &str = "data/processed/synth_messages.parquet";

/// Default number of threads messages are spread across.
pub const DEFAULT_THREAD_COUNT: usize = 250;

/// Default length of the timestamp window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Configuration values loaded via OrthoConfig.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FEEDBACK_SYNTH")]
pub struct SynthSettings {
    /// Number of messages to generate.
    pub count: Option<usize>,
    /// RNG seed for the run.
    pub seed: Option<u64>,
    /// Destination of the JSONL output.
    pub jsonl_path: Option<PathBuf>,
    /// Destination of the table output.
    pub table_path: Option<PathBuf>,
    /// Number of threads to spread messages across.
    pub thread_count: Option<usize>,
    /// Length of the timestamp window in days.
    pub window_days: Option<u32>,
}

impl SynthSettings {
    /// Loads settings from the given command line, the environment, and any
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a layer cannot be parsed.
    pub fn load_with_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::load_from_iter(args).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }
}

/// Validated, immutable generation configuration.
///
/// # Example
///
/// ```
/// use feedback_synth::SynthConfig;
///
/// let config = SynthConfig::default();
/// assert_eq!(config.count(), 2_500);
/// assert_eq!(config.seed(), 42);
/// assert_eq!(config.jsonl_path().as_str(), "data/raw/synth_messages.jsonl");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    count: usize,
    seed: u64,
    jsonl_path: Utf8PathBuf,
    table_path: Utf8PathBuf,
    thread_count: usize,
    window_days: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_MESSAGE_COUNT,
            seed: DEFAULT_SEED,
            jsonl_path: Utf8PathBuf::from(DEFAULT_JSONL_PATH),
            table_path: Utf8PathBuf::from(DEFAULT_TABLE_PATH),
            thread_count: DEFAULT_THREAD_COUNT,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl SynthConfig {
    /// Starts a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> SynthConfigBuilder {
        SynthConfigBuilder {
            config: Self::default(),
        }
    }

    /// Builds a configuration from loaded settings, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a path is not UTF-8 or a value fails
    /// validation.
    pub fn from_settings(settings: &SynthSettings) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(count) = settings.count {
            builder = builder.count(count);
        }
        if let Some(seed) = settings.seed {
            builder = builder.seed(seed);
        }
        if let Some(path) = &settings.jsonl_path {
            builder = builder.jsonl_path(utf8_path(path)?);
        }
        if let Some(path) = &settings.table_path {
            builder = builder.table_path(utf8_path(path)?);
        }
        if let Some(thread_count) = settings.thread_count {
            builder = builder.thread_count(thread_count);
        }
        if let Some(window_days) = settings.window_days {
            builder = builder.window_days(window_days);
        }
        builder.build()
    }

    /// Number of messages to generate.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// RNG seed for the run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Destination of the JSONL output.
    #[must_use]
    pub fn jsonl_path(&self) -> &camino::Utf8Path {
        &self.jsonl_path
    }

    /// Destination of the table output.
    #[must_use]
    pub fn table_path(&self) -> &camino::Utf8Path {
        &self.table_path
    }

    /// Number of threads messages are spread across.
    #[must_use]
    pub const fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Length of the timestamp window in days.
    #[must_use]
    pub const fn window_days(&self) -> u32 {
        self.window_days
    }
}

/// Builder for [`SynthConfig`].
#[derive(Debug, Clone)]
pub struct SynthConfigBuilder {
    config: SynthConfig,
}

impl SynthConfigBuilder {
    /// Sets the message count.
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.config.count = count;
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets the JSONL destination.
    #[must_use]
    pub fn jsonl_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config.jsonl_path = path.into();
        self
    }

    /// Sets the table destination.
    #[must_use]
    pub fn table_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config.table_path = path.into();
        self
    }

    /// Sets the thread pool size.
    #[must_use]
    pub const fn thread_count(mut self, thread_count: usize) -> Self {
        self.config.thread_count = thread_count;
        self
    }

    /// Sets the window length in days.
    #[must_use]
    pub const fn window_days(mut self, window_days: u32) -> Self {
        self.config.window_days = window_days;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the count, thread count, or window length
    /// is zero.
    pub fn build(self) -> Result<SynthConfig, ConfigError> {
        let config = self.config;
        if config.count == 0 {
            return Err(ConfigError::ZeroMessageCount);
        }
        if config.thread_count == 0 {
            return Err(ConfigError::ZeroThreadCount);
        }
        if config.window_days == 0 {
            return Err(ConfigError::ZeroWindowDays);
        }
        Ok(config)
    }
}

fn utf8_path(path: &std::path::Path) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|path| ConfigError::NonUtf8Path { path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration loading and validation.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    fn empty_settings() -> SynthSettings {
        SynthSettings {
            count: None,
            seed: None,
            jsonl_path: None,
            table_path: None,
            thread_count: None,
            window_days: None,
        }
    }

    fn load_from_empty_args() -> SynthSettings {
        SynthSettings::load_with_args([OsString::from("feedback-synth")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("FEEDBACK_SYNTH_COUNT", None::<String>),
            ("FEEDBACK_SYNTH_SEED", None::<String>),
            ("FEEDBACK_SYNTH_JSONL_PATH", None::<String>),
            ("FEEDBACK_SYNTH_TABLE_PATH", None::<String>),
            ("FEEDBACK_SYNTH_THREAD_COUNT", None::<String>),
            ("FEEDBACK_SYNTH_WINDOW_DAYS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        let config = SynthConfig::from_settings(&settings).expect("valid config");
        assert_eq!(config, SynthConfig::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FEEDBACK_SYNTH_COUNT", Some("10".to_owned())),
            ("FEEDBACK_SYNTH_SEED", Some("7".to_owned())),
            (
                "FEEDBACK_SYNTH_JSONL_PATH",
                Some("/tmp/feedback/out.jsonl".to_owned()),
            ),
            ("FEEDBACK_SYNTH_TABLE_PATH", None::<String>),
            ("FEEDBACK_SYNTH_THREAD_COUNT", Some("12".to_owned())),
            ("FEEDBACK_SYNTH_WINDOW_DAYS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        let config = SynthConfig::from_settings(&settings).expect("valid config");
        assert_eq!(config.count(), 10);
        assert_eq!(config.seed(), 7);
        assert_eq!(config.jsonl_path().as_str(), "/tmp/feedback/out.jsonl");
        assert_eq!(config.table_path().as_str(), DEFAULT_TABLE_PATH);
        assert_eq!(config.thread_count(), 12);
        assert_eq!(config.window_days(), DEFAULT_WINDOW_DAYS);
    }

    #[rstest]
    #[case::zero_count(SynthConfig::builder().count(0), ConfigError::ZeroMessageCount)]
    #[case::zero_threads(SynthConfig::builder().thread_count(0), ConfigError::ZeroThreadCount)]
    #[case::zero_window(SynthConfig::builder().window_days(0), ConfigError::ZeroWindowDays)]
    fn builder_rejects_invalid_values(
        #[case] builder: SynthConfigBuilder,
        #[case] expected: ConfigError,
    ) {
        assert_eq!(builder.build(), Err(expected));
    }

    #[test]
    fn settings_override_only_supplied_values() {
        let settings = SynthSettings {
            count: Some(10),
            seed: Some(7),
            ..empty_settings()
        };

        let config = SynthConfig::from_settings(&settings).expect("valid config");
        assert_eq!(config.count(), 10);
        assert_eq!(config.seed(), 7);
        assert_eq!(config.thread_count(), DEFAULT_THREAD_COUNT);
    }

    #[test]
    fn settings_with_zero_count_are_rejected() {
        let settings = SynthSettings {
            count: Some(0),
            ..empty_settings()
        };
        assert_eq!(
            SynthConfig::from_settings(&settings),
            Err(ConfigError::ZeroMessageCount)
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0x6f, 0x80, 0x6f]);
        let settings = SynthSettings {
            jsonl_path: Some(PathBuf::from(raw)),
            ..empty_settings()
        };
        assert!(matches!(
            SynthConfig::from_settings(&settings),
            Err(ConfigError::NonUtf8Path { .. })
        ));
    }
}
