//! Generated message record types.
//!
//! A [`MessageRecord`] is the unit of output. Its serialized field names are
//! the column names consumers of the corpus read, so they are fixed here with
//! serde attributes rather than derived from the Rust field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Sentiment;
use crate::identity::{MessageId, ThreadId};

/// Platform a message was posted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Forum thread or comment.
    Reddit,
    /// Chat message.
    Discord,
    /// Short public post.
    X,
}

impl Source {
    /// Returns the serialized platform name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Discord => "discord",
            Self::X => "x",
        }
    }
}

/// Platform-specific engagement metadata.
///
/// Serializes as a flat object carrying only the fields of its platform, for
/// example `{"score": 12, "subreddit": "ArcRaiders"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceMeta {
    /// Reddit vote score and community.
    Reddit {
        /// Net vote score, clamped at zero.
        score: u32,
        /// Subreddit the post appeared in.
        subreddit: String,
    },
    /// Discord reaction count and channel.
    Discord {
        /// Number of reactions.
        reactions: u32,
        /// Channel the message appeared in.
        channel: String,
    },
    /// X engagement counts.
    X {
        /// Number of likes.
        likes: u32,
        /// Number of reposts.
        retweets: u32,
    },
}

impl SourceMeta {
    /// Returns the platform this metadata belongs to.
    #[must_use]
    pub const fn source(&self) -> Source {
        match self {
            Self::Reddit { .. } => Source::Reddit,
            Self::Discord { .. } => Source::Discord,
            Self::X { .. } => Source::X,
        }
    }
}

/// A generated community-feedback message.
///
/// # Example
///
/// ```
/// use feedback_synth::{MessageRecord, Sentiment, Source, SourceMeta};
///
/// let json = r#"{
///     "id": "m_0123456789abcdef0123456789abcdef",
///     "source": "discord",
///     "patch_id": "patch_1_13_0",
///     "created_at": "2026-03-01T09:30:00.000000Z",
///     "thread_id": "t_0badc0de",
///     "parent_id": null,
///     "author_hash": "u_00ff00ff00",
///     "text": "Queue times are brutal",
///     "meta": {"reactions": 4, "channel": "patch_notes"},
///     "label_true": "server_connectivity",
///     "sentiment_true": "negative"
/// }"#;
///
/// let record: MessageRecord = serde_json::from_str(json).expect("valid record");
/// assert_eq!(record.source, Source::Discord);
/// assert_eq!(record.sentiment, Sentiment::Negative);
/// assert!(matches!(record.meta, SourceMeta::Discord { reactions: 4, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Unique message identifier.
    pub id: MessageId,
    /// Platform the message was posted on.
    pub source: Source,
    /// Game patch the feedback refers to.
    pub patch_id: String,
    /// Posting time in UTC.
    #[serde(with = "crate::timestamp::iso_utc")]
    pub created_at: DateTime<Utc>,
    /// Thread the message belongs to.
    pub thread_id: ThreadId,
    /// Earlier message in the same thread this one replies to.
    pub parent_id: Option<MessageId>,
    /// Pseudo-anonymous author handle.
    #[serde(rename = "author_hash")]
    pub author: String,
    /// Message body.
    pub text: String,
    /// Platform-specific engagement metadata.
    pub meta: SourceMeta,
    /// Ground-truth theme label.
    #[serde(rename = "label_true")]
    pub theme: String,
    /// Ground-truth sentiment, always that of [`MessageRecord::theme`].
    #[serde(rename = "sentiment_true")]
    pub sentiment: Sentiment,
}

impl MessageRecord {
    /// Returns `true` when the record replies to another message.
    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}
