//! Single-record synthesis.
//!
//! [`RecordSynthesizer`] turns one slice of the run's random stream into one
//! fully-formed [`MessageRecord`]. It remembers which messages each thread
//! already holds so that replies only ever point backwards.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::GenerationError;
use crate::identity::{IdentityFactory, MessageId, ThreadId};
use crate::profile::SynthesisProfile;
use crate::record::{MessageRecord, Source, SourceMeta};
use crate::timestamp::TimeWindow;

/// Openers prefixed to phrases that have no wording to soften.
const HEDGE_OPENERS: [&str; 3] = ["not sure, but", "idk, maybe", "could be just me, but"];

/// Whole-word swaps that blur a phrase's topic, keyed by lowercase form.
const SOFTENINGS: [(&str, &str); 6] = [
    ("patch", "update"),
    ("patches", "updates"),
    ("patched", "updated"),
    ("nerf", "change"),
    ("nerfs", "changes"),
    ("nerfed", "changed"),
];

/// Builds message records from a profile, a time window, and a thread pool.
#[derive(Debug)]
pub struct RecordSynthesizer<'a> {
    profile: &'a SynthesisProfile,
    window: TimeWindow,
    threads: Vec<ThreadId>,
    history: HashMap<ThreadId, Vec<MessageId>>,
    identities: IdentityFactory,
}

impl<'a> RecordSynthesizer<'a> {
    /// Creates a synthesizer over a pre-created thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyThreadPool`] when `threads` is empty.
    pub fn new(
        profile: &'a SynthesisProfile,
        window: TimeWindow,
        threads: Vec<ThreadId>,
    ) -> Result<Self, GenerationError> {
        if threads.is_empty() {
            return Err(GenerationError::EmptyThreadPool);
        }
        Ok(Self {
            profile,
            window,
            threads,
            history: HashMap::new(),
            identities: IdentityFactory,
        })
    }

    /// Returns the thread pool in creation order.
    #[must_use]
    pub fn threads(&self) -> &[ThreadId] {
        &self.threads
    }

    /// Produces the next record.
    ///
    /// A message drafted as a reply takes a uniformly chosen earlier message
    /// of its thread as parent. When the thread is still empty the message is
    /// emitted as a top-level post instead.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] only if the profile's catalog yields no
    /// theme or phrase, which validated catalogs never do.
    pub fn synthesize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<MessageRecord, GenerationError> {
        let profile = self.profile;
        let id = self.identities.new_message_id(rng);
        let patch_id = profile.patches().choose(rng).clone();
        let source = *profile.sources().choose(rng);
        let created_at = self.window.sample(rng);

        let thread_id = self
            .threads
            .choose(rng)
            .ok_or(GenerationError::EmptyThreadPool)?
            .clone();
        let parent_id = self.draw_parent(&thread_id, rng);

        let theme = profile
            .themes()
            .choose(rng)
            .ok_or(GenerationError::EmptyCatalog)?;
        let phrase = theme
            .choose_phrase(rng)
            .ok_or_else(|| GenerationError::EmptyPhrasePool {
                label: theme.label().to_owned(),
            })?;
        let text = self.compose_text(phrase, rng);
        let meta = self.engagement_for(source, rng);
        let author = self.identities.new_author_handle(rng);

        self.history
            .entry(thread_id.clone())
            .or_default()
            .push(id.clone());

        Ok(MessageRecord {
            id,
            source,
            patch_id,
            created_at,
            thread_id,
            parent_id,
            author,
            text,
            meta,
            theme: theme.label().to_owned(),
            sentiment: theme.sentiment(),
        })
    }

    fn draw_parent<R: Rng + ?Sized>(
        &self,
        thread_id: &ThreadId,
        rng: &mut R,
    ) -> Option<MessageId> {
        if !rng.random_bool(self.profile.reply_probability()) {
            return None;
        }
        let parent = self
            .history
            .get(thread_id)
            .and_then(|earlier| earlier.choose(rng))
            .cloned();
        if parent.is_none() {
            debug!(thread_id = %thread_id, "reply drawn for an empty thread; emitting top-level post");
        }
        parent
    }

    fn compose_text<R: Rng + ?Sized>(&self, phrase: &str, rng: &mut R) -> String {
        let mut text = phrase.to_owned();
        if rng.random_bool(self.profile.slang_probability()) {
            if let Some(token) = self.profile.slang().choose(rng) {
                text.push(' ');
                text.push_str(token);
            }
        }
        if rng.random_bool(self.profile.hedge_probability()) {
            text = hedge(&text, rng);
        }
        text
    }

    fn engagement_for<R: Rng + ?Sized>(&self, source: Source, rng: &mut R) -> SourceMeta {
        let engagement = self.profile.engagement();
        match source {
            Source::Reddit => SourceMeta::Reddit {
                score: engagement.reddit_score.sample_count(rng),
                subreddit: engagement.subreddit.clone(),
            },
            Source::Discord => SourceMeta::Discord {
                reactions: engagement.discord_reactions.sample_count(rng),
                channel: engagement.channel.clone(),
            },
            Source::X => {
                let likes = engagement.x_likes.sample_count(rng);
                let retweets = engagement.x_retweets.sample_count(rng);
                SourceMeta::X { likes, retweets }
            }
        }
    }
}

/// Makes a phrase less committal.
///
/// Topic words are swapped for vaguer ones; a phrase with nothing to swap
/// gets a hedging opener instead.
fn hedge<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let softened = soften_words(text);
    if softened != text {
        return softened;
    }
    match HEDGE_OPENERS.choose(rng) {
        Some(opener) => format!("{opener} {}", lowercase_leading_word(text)),
        None => softened,
    }
}

/// Applies [`SOFTENINGS`] to each alphabetic run of `text`, so `stealth-nerfed`
/// becomes `stealth-changed` and `Patch notes` becomes `Update notes`.
fn soften_words(text: &str) -> String {
    let mut softened = String::with_capacity(text.len());
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_alphabetic() {
            word.push(ch);
        } else {
            softened.push_str(&soften_word(&word));
            word.clear();
            softened.push(ch);
        }
    }
    softened.push_str(&soften_word(&word));
    softened
}

fn soften_word(word: &str) -> String {
    let lower = word.to_lowercase();
    let Some((_, replacement)) = SOFTENINGS.iter().find(|(from, _)| lower == *from) else {
        return word.to_owned();
    };
    if word.starts_with(char::is_uppercase) {
        let mut chars = replacement.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    } else {
        (*replacement).to_owned()
    }
}

/// Lowercases the first letter unless the first word is an acronym or
/// otherwise carries inner capitals (`UI`, `QoL`).
fn lowercase_leading_word(text: &str) -> String {
    let first_word = text.split_whitespace().next().unwrap_or_default();
    let keep_case = first_word.chars().skip(1).any(char::is_uppercase);
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if !keep_case => first.to_lowercase().chain(chars).collect(),
        _ => text.to_owned(),
    }
}
