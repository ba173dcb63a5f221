//! Theme catalog: the fixed vocabulary of feedback topics.
//!
//! Each theme pairs a label with exactly one ground-truth sentiment and a pool
//! of representative phrases. The catalog is immutable once built and is
//! injected into the synthesizer rather than read from global state.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ground-truth sentiment attached to every generated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Favourable feedback.
    Positive,
    /// Unfavourable feedback.
    Negative,
    /// Reports and questions without a clear stance.
    Neutral,
}

impl Sentiment {
    /// Returns the serialized sentiment name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// A topical category of feedback with its sentiment and phrase pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    label: String,
    sentiment: Sentiment,
    phrases: Vec<String>,
}

impl Theme {
    /// Builds a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyThemeLabel`] for a blank label and
    /// [`ConfigError::EmptyPhrasePool`] when no phrases are supplied.
    ///
    /// # Example
    ///
    /// ```
    /// use feedback_synth::{Sentiment, Theme};
    ///
    /// let theme = Theme::new("praise", Sentiment::Positive, ["gg devs"]).expect("valid theme");
    /// assert_eq!(theme.label(), "praise");
    /// ```
    pub fn new<I, S>(
        label: impl Into<String>,
        sentiment: Sentiment,
        phrases: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ConfigError::EmptyThemeLabel);
        }
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(ConfigError::EmptyPhrasePool { label });
        }
        Ok(Self {
            label,
            sentiment,
            phrases,
        })
    }

    /// Returns the theme label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the theme's sentiment.
    #[must_use]
    pub const fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    /// Returns the phrase pool in declaration order.
    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Picks one phrase uniformly. `None` only for an empty pool, which
    /// [`Theme::new`] rejects.
    pub fn choose_phrase<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.phrases.choose(rng).map(String::as_str)
    }
}

/// Read-only lookup from theme label to sentiment and phrase pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    /// Builds a catalog from themes with distinct labels.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCatalog`] for an empty theme list and
    /// [`ConfigError::DuplicateTheme`] when two themes share a label.
    pub fn new(themes: Vec<Theme>) -> Result<Self, ConfigError> {
        if themes.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::with_capacity(themes.len());
        for theme in &themes {
            if !seen.insert(theme.label()) {
                return Err(ConfigError::DuplicateTheme {
                    label: theme.label().to_owned(),
                });
            }
        }
        Ok(Self { themes })
    }

    /// Returns the built-in catalog of seven game-feedback themes.
    ///
    /// # Example
    ///
    /// ```
    /// use feedback_synth::{Sentiment, ThemeCatalog};
    ///
    /// let catalog = ThemeCatalog::standard();
    /// let praise = catalog.get("praise_general").expect("theme exists");
    /// assert_eq!(praise.sentiment(), Sentiment::Positive);
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        let themes = STANDARD_THEMES
            .iter()
            .map(|(label, sentiment, phrases)| Theme {
                label: (*label).to_owned(),
                sentiment: *sentiment,
                phrases: phrases.iter().map(|phrase| (*phrase).to_owned()).collect(),
            })
            .collect();
        Self { themes }
    }

    /// Iterates over theme labels in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(Theme::label)
    }

    /// Returns the themes in catalog order.
    #[must_use]
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Looks a theme up by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.label == label)
    }

    /// Selects a theme uniformly; every theme is equally likely.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Theme> {
        self.themes.choose(rng)
    }
}

type ThemeRow = (&'static str, Sentiment, [&'static str; 5]);

const STANDARD_THEMES: [ThemeRow; 7] = [
    (
        "server_connectivity",
        Sentiment::Negative,
        [
            "Still can't connect after the patch",
            "Queue times are brutal",
            "Servers feel cooked right now",
            "Matchmaking keeps failing",
            "Constant disconnects mid-raid",
        ],
    ),
    (
        "balance_nerf",
        Sentiment::Negative,
        [
            "They stealth-nerfed my build",
            "Time-to-kill feels worse",
            "Why did they nerf this weapon?",
            "Movement feels slower",
            "This balance change is a miss",
        ],
    ),
    (
        "balance_buff",
        Sentiment::Positive,
        [
            "This buff finally makes it viable",
            "Combat feels smoother now",
            "Love the new tuning on weapons",
            "This is a W change",
            "Feels way more fair",
        ],
    ),
    (
        "ui_qol",
        Sentiment::Positive,
        [
            "UI is cleaner after patch",
            "QoL updates are actually great",
            "Finally fixed the annoying menu bug",
            "Inventory flow is better",
            "Small changes, big improvement",
        ],
    ),
    (
        "bug_report",
        Sentiment::Neutral,
        [
            "Bug: audio cuts out after extraction",
            "Seeing a weird clipping issue on textures",
            "Repro steps: open map then crash",
            "This might be a memory leak?",
            "Anyone else getting this error code?",
        ],
    ),
    (
        "praise_general",
        Sentiment::Positive,
        [
            "This patch is honestly solid",
            "Game feels better every update",
            "Big respect to the devs",
            "Love the direction lately",
            "This is why I keep coming back",
        ],
    ),
    (
        "complaint_general",
        Sentiment::Negative,
        [
            "This update is disappointing",
            "Feels rushed",
            "Not loving the direction",
            "Patch notes don't match what changed",
            "This is getting frustrating",
        ],
    ),
];
