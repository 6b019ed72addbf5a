// piiguard-context/src/window/mod.rs
//! Word windows around a matched span.
//!
//! A word is a maximal run of alphanumeric characters. Everything else
//! (whitespace, punctuation, symbols) separates words.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

/// Iterates the words of `text` in order. Double-ended, so callers can walk
/// backwards from the end of a slice.
pub fn words(text: &str) -> impl DoubleEndedIterator<Item = &str> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Lowercases and joins words with a single space so that phrase lookups
/// are insensitive to case and to the separators used in the source text.
pub fn normalize<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for word in words {
        if !out.is_empty() {
            out.push(' ');
        }
        for c in word.chars() {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// The normalized words on either side of a span.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextWindow {
    pub preceding: String,
    pub following: String,
}

impl ContextWindow {
    /// Builds the window of up to `window_words` words before `start` and after `end`.
    ///
    /// Offsets are byte offsets into `text`. Out-of-range or non-boundary offsets
    /// produce an empty window rather than panicking.
    pub fn around(text: &str, start: usize, end: usize, window_words: usize) -> Self {
        if window_words == 0
            || start > end
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Self::default();
        }

        let mut before: Vec<&str> = words(&text[..start]).rev().take(window_words).collect();
        before.reverse();
        let after = words(&text[end..]).take(window_words);

        Self {
            preceding: normalize(before),
            following: normalize(after),
        }
    }
}
