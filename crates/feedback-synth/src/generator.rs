//! Deterministic corpus generation from a configuration.
//!
//! This module provides the driver that seeds the run's RNG, fixes the time
//! window, creates the thread pool, and calls the synthesizer once per
//! message. The same configuration and clock instant always produce
//! identical output.

use mockable::Clock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::SynthConfig;
use crate::error::RunError;
use crate::identity::IdentityFactory;
use crate::profile::SynthesisProfile;
use crate::record::MessageRecord;
use crate::synthesizer::RecordSynthesizer;
use crate::timestamp::{TimeWindow, format_timestamp};

/// Records produced by one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCorpus {
    /// Records in generation order.
    pub records: Vec<MessageRecord>,
    /// Window the timestamps were drawn from.
    pub window: TimeWindow,
}

/// Runs the synthesizer `count` times over one seeded random stream.
#[derive(Debug, Clone)]
pub struct GenerationDriver {
    config: SynthConfig,
    profile: SynthesisProfile,
}

impl GenerationDriver {
    /// Creates a driver for the given configuration and profile.
    #[must_use]
    pub const fn new(config: SynthConfig, profile: SynthesisProfile) -> Self {
        Self { config, profile }
    }

    /// Returns the configuration the driver runs with.
    #[must_use]
    pub const fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Generates the corpus, reading the window end from `clock`.
    ///
    /// Seeds a [`ChaCha8Rng`] from the configured seed, draws the thread pool,
    /// and synthesizes exactly `count` records in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] if the window cannot be built or synthesis fails.
    pub fn run(&self, clock: &dyn Clock) -> Result<GeneratedCorpus, RunError> {
        let config = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        let window = TimeWindow::ending_at(clock.utc(), config.window_days())?;

        info!(
            seed = config.seed(),
            count = config.count(),
            threads = config.thread_count(),
            window_start = %format_timestamp(window.start()),
            window_end = %format_timestamp(window.end()),
            "generating synthetic feedback"
        );

        let threads = IdentityFactory.new_thread_pool(&mut rng, config.thread_count());
        let mut synthesizer = RecordSynthesizer::new(&self.profile, window, threads)?;

        let mut records = Vec::with_capacity(config.count());
        for _ in 0..config.count() {
            records.push(synthesizer.synthesize(&mut rng)?);
        }

        let replies = records.iter().filter(|record| record.is_reply()).count();
        info!(records = records.len(), replies, "generation finished");

        Ok(GeneratedCorpus { records, window })
    }
}

/// Generates a corpus with the standard synthesis profile.
///
/// # Errors
///
/// Returns [`RunError`] if the configuration is rejected or synthesis fails.
///
/// # Example
///
/// ```
/// use feedback_synth::{SynthConfig, generate_messages};
/// use mockable::DefaultClock;
///
/// let config = SynthConfig::builder().count(5).seed(7).build().expect("valid config");
/// let corpus = generate_messages(&config, &DefaultClock).expect("generated");
///
/// assert_eq!(corpus.records.len(), 5);
/// ```
pub fn generate_messages(
    config: &SynthConfig,
    clock: &dyn Clock,
) -> Result<GeneratedCorpus, RunError> {
    let profile = SynthesisProfile::standard()?;
    GenerationDriver::new(config.clone(), profile).run(clock)
}
