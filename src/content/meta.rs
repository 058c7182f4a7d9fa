//! Derived metadata: word count and reading time

use serde::{Deserialize, Serialize};

/// Estimated time to read a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingTime {
    pub minutes: u32,
    /// Human-readable form, e.g. "3 min read".
    pub text: String,
}

/// Count whitespace-separated tokens in the body.
///
/// The body is treated as plain text here: markup characters inside a token
/// still count as one word, matching `split(/\s+/)` semantics.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Reading time from a word count and a words-per-minute constant.
pub fn reading_time(word_count: usize, words_per_minute: u32) -> ReadingTime {
    let wpm = words_per_minute.max(1) as usize;
    let minutes = word_count.div_ceil(wpm) as u32;
    ReadingTime {
        minutes,
        text: format!("{} min read", minutes),
    }
}
