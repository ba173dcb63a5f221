//! Synthesis tables and rates injected into the record synthesizer.
//!
//! Everything the synthesizer decides with (themes, patch and source weights,
//! reply/slang/hedge rates, engagement distributions) lives in a
//! [`SynthesisProfile`] value. The standard profile reproduces the reference
//! corpus; tests and callers can build alternates.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::catalog::ThemeCatalog;
use crate::error::ConfigError;
use crate::record::Source;
use crate::weighted::WeightedTable;

/// Probability that a message is drafted as a reply.
pub const DEFAULT_REPLY_PROBABILITY: f64 = 0.35;

/// Probability that a slang token is appended to the text.
pub const DEFAULT_SLANG_PROBABILITY: f64 = 0.25;

/// Probability that the text is softened or hedged.
pub const DEFAULT_HEDGE_PROBABILITY: f64 = 0.10;

const STANDARD_SLANG: [&str; 7] = [
    "tbh",
    "imo",
    "lol",
    "anyone else",
    "pls fix",
    "devs?",
    "this is wild",
];

const STANDARD_SUBREDDIT: &str = "ArcRaiders";
const STANDARD_CHANNEL: &str = "patch_notes";

/// A Gaussian over non-negative engagement counts.
///
/// Draws below zero clamp to zero; fractional draws truncate toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountDistribution {
    normal: Normal<f64>,
}

impl CountDistribution {
    /// Builds a distribution with the given mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDistribution`] when the parameters are
    /// not finite or the deviation is negative.
    pub fn new(name: &'static str, mean: f64, std_dev: f64) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDistribution {
            name,
            mean,
            std_dev,
        };
        if !mean.is_finite() {
            return Err(invalid());
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| invalid())?;
        Ok(Self { normal })
    }

    /// Returns the configured mean.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.normal.mean()
    }

    /// Returns the configured standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.normal.std_dev()
    }

    /// Draws one count.
    pub fn sample_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        clamp_count(self.normal.sample(rng))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "negative draws are clamped first and `as` saturates at u32::MAX"
)]
fn clamp_count(draw: f64) -> u32 {
    draw.max(0.0) as u32
}

/// Engagement distributions per platform.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementProfile {
    /// Reddit vote score.
    pub reddit_score: CountDistribution,
    /// Subreddit attached to Reddit posts.
    pub subreddit: String,
    /// Discord reaction count.
    pub discord_reactions: CountDistribution,
    /// Channel attached to Discord messages.
    pub channel: String,
    /// X like count.
    pub x_likes: CountDistribution,
    /// X repost count.
    pub x_retweets: CountDistribution,
}

impl EngagementProfile {
    /// Returns the reference engagement distributions.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in parameters; the signature mirrors
    /// [`CountDistribution::new`].
    pub fn standard() -> Result<Self, ConfigError> {
        Ok(Self {
            reddit_score: CountDistribution::new("reddit_score", 25.0, 40.0)?,
            subreddit: STANDARD_SUBREDDIT.to_owned(),
            discord_reactions: CountDistribution::new("discord_reactions", 3.0, 6.0)?,
            channel: STANDARD_CHANNEL.to_owned(),
            x_likes: CountDistribution::new("x_likes", 10.0, 25.0)?,
            x_retweets: CountDistribution::new("x_retweets", 2.0, 6.0)?,
        })
    }
}

/// Immutable data the synthesizer draws every record from.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisProfile {
    themes: ThemeCatalog,
    patches: WeightedTable<String>,
    sources: WeightedTable<Source>,
    reply_probability: f64,
    slang_probability: f64,
    hedge_probability: f64,
    slang: Vec<String>,
    engagement: EngagementProfile,
}

impl SynthesisProfile {
    /// Returns the reference profile.
    ///
    /// Two patches (`patch_1_12_0` at 45%, `patch_1_13_0` at 55%), three
    /// sources (Reddit 55%, Discord 40%, X 5%), the standard theme catalog,
    /// and the default reply, slang, and hedge rates.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in tables; construction goes through the
    /// same validation as custom profiles.
    ///
    /// # Example
    ///
    /// ```
    /// use feedback_synth::SynthesisProfile;
    ///
    /// let profile = SynthesisProfile::standard().expect("built-in profile is valid");
    /// assert_eq!(profile.themes().themes().len(), 7);
    /// ```
    pub fn standard() -> Result<Self, ConfigError> {
        let patches = WeightedTable::new(
            "patches",
            vec![
                ("patch_1_12_0".to_owned(), 0.45),
                ("patch_1_13_0".to_owned(), 0.55),
            ],
        )?;
        let sources = WeightedTable::new(
            "sources",
            vec![
                (Source::Reddit, 0.55),
                (Source::Discord, 0.40),
                (Source::X, 0.05),
            ],
        )?;
        Self::builder(ThemeCatalog::standard(), patches, sources)
            .engagement(EngagementProfile::standard()?)
            .build()
    }

    /// Starts a profile from the required tables with default rates.
    #[must_use]
    pub fn builder(
        themes: ThemeCatalog,
        patches: WeightedTable<String>,
        sources: WeightedTable<Source>,
    ) -> SynthesisProfileBuilder {
        SynthesisProfileBuilder {
            themes,
            patches,
            sources,
            reply_probability: DEFAULT_REPLY_PROBABILITY,
            slang_probability: DEFAULT_SLANG_PROBABILITY,
            hedge_probability: DEFAULT_HEDGE_PROBABILITY,
            slang: STANDARD_SLANG.iter().map(|token| (*token).to_owned()).collect(),
            engagement: None,
        }
    }

    /// Returns the theme catalog.
    #[must_use]
    pub const fn themes(&self) -> &ThemeCatalog {
        &self.themes
    }

    /// Returns the patch version table.
    #[must_use]
    pub const fn patches(&self) -> &WeightedTable<String> {
        &self.patches
    }

    /// Returns the source platform table.
    #[must_use]
    pub const fn sources(&self) -> &WeightedTable<Source> {
        &self.sources
    }

    /// Returns the probability that a message is drafted as a reply.
    #[must_use]
    pub const fn reply_probability(&self) -> f64 {
        self.reply_probability
    }

    /// Returns the probability of appending slang.
    #[must_use]
    pub const fn slang_probability(&self) -> f64 {
        self.slang_probability
    }

    /// Returns the probability of hedging the text.
    #[must_use]
    pub const fn hedge_probability(&self) -> f64 {
        self.hedge_probability
    }

    /// Returns the slang token pool.
    #[must_use]
    pub fn slang(&self) -> &[String] {
        &self.slang
    }

    /// Returns the engagement distributions.
    #[must_use]
    pub const fn engagement(&self) -> &EngagementProfile {
        &self.engagement
    }
}

/// Builder for [`SynthesisProfile`] overriding the default rates.
#[derive(Debug, Clone)]
pub struct SynthesisProfileBuilder {
    themes: ThemeCatalog,
    patches: WeightedTable<String>,
    sources: WeightedTable<Source>,
    reply_probability: f64,
    slang_probability: f64,
    hedge_probability: f64,
    slang: Vec<String>,
    engagement: Option<EngagementProfile>,
}

impl SynthesisProfileBuilder {
    /// Sets the reply probability.
    #[must_use]
    pub const fn reply_probability(mut self, value: f64) -> Self {
        self.reply_probability = value;
        self
    }

    /// Sets the slang probability.
    #[must_use]
    pub const fn slang_probability(mut self, value: f64) -> Self {
        self.slang_probability = value;
        self
    }

    /// Sets the hedge probability.
    #[must_use]
    pub const fn hedge_probability(mut self, value: f64) -> Self {
        self.hedge_probability = value;
        self
    }

    /// Replaces the slang token pool.
    #[must_use]
    pub fn slang<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slang = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the engagement distributions.
    #[must_use]
    pub fn engagement(mut self, engagement: EngagementProfile) -> Self {
        self.engagement = Some(engagement);
        self
    }

    /// Validates the rates and builds the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProbabilityOutOfRange`] for a rate outside
    /// [0, 1] and [`ConfigError::EmptySlangPool`] for an empty slang pool.
    pub fn build(self) -> Result<SynthesisProfile, ConfigError> {
        check_probability("reply_probability", self.reply_probability)?;
        check_probability("slang_probability", self.slang_probability)?;
        check_probability("hedge_probability", self.hedge_probability)?;
        if self.slang.is_empty() {
            return Err(ConfigError::EmptySlangPool);
        }
        let engagement = match self.engagement {
            Some(engagement) => engagement,
            None => EngagementProfile::standard()?,
        };
        Ok(SynthesisProfile {
            themes: self.themes,
            patches: self.patches,
            sources: self.sources,
            reply_probability: self.reply_probability,
            slang_probability: self.slang_probability,
            hedge_probability: self.hedge_probability,
            slang: self.slang,
            engagement,
        })
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}
