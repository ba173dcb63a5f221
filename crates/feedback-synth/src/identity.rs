//! Identifier and author handle generation.
//!
//! All identifiers are drawn from the run's seeded RNG so that a fixed seed
//! reproduces the same ids.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of message identifiers.
const MESSAGE_PREFIX: &str = "m_";

/// Prefix of thread identifiers.
const THREAD_PREFIX: &str = "t_";

/// Prefix of pseudo-anonymous author handles.
const AUTHOR_PREFIX: &str = "u_";

/// Mask keeping the low 40 bits, i.e. ten hexadecimal digits.
const AUTHOR_HANDLE_MASK: u64 = 0xff_ffff_ffff;

/// Opaque identifier of a generated message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a thread grouping related messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates thread ids, message ids, and author handles.
///
/// The factory holds no state; every draw comes from the RNG passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFactory;

impl IdentityFactory {
    /// Creates `count` distinct thread identifiers.
    ///
    /// Each id is `t_` followed by eight hexadecimal digits; a colliding draw
    /// is discarded and redrawn.
    ///
    /// # Example
    ///
    /// ```
    /// use feedback_synth::IdentityFactory;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(1);
    /// let pool = IdentityFactory.new_thread_pool(&mut rng, 3);
    ///
    /// assert_eq!(pool.len(), 3);
    /// assert!(pool.iter().all(|id| id.as_str().starts_with("t_")));
    /// ```
    pub fn new_thread_pool<R: Rng + ?Sized>(self, rng: &mut R, count: usize) -> Vec<ThreadId> {
        let mut seen = HashSet::with_capacity(count);
        let mut pool = Vec::with_capacity(count);
        while pool.len() < count {
            let raw: u32 = rng.random();
            if seen.insert(raw) {
                pool.push(ThreadId(format!("{THREAD_PREFIX}{raw:08x}")));
            }
        }
        pool
    }

    /// Creates a message identifier from a 128-bit draw.
    pub fn new_message_id<R: Rng + ?Sized>(self, rng: &mut R) -> MessageId {
        let id = Uuid::from_u128(rng.random());
        MessageId(format!("{MESSAGE_PREFIX}{}", id.simple()))
    }

    /// Creates a pseudo-anonymous author handle: `u_` plus ten hex digits.
    ///
    /// Handles are not unique; the same author may post many messages.
    pub fn new_author_handle<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        let raw = rng.random::<u64>() & AUTHOR_HANDLE_MASK;
        format!("{AUTHOR_PREFIX}{raw:010x}")
    }
}
