use daachorse::DoubleArrayAhoCorasick;
extern crate alloc;
use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::window::{normalize, words, ContextWindow};

/// Errors raised while compiling a set of context words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The automaton could not be built from the normalized phrases.
    Automaton(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Automaton(reason) => {
                write!(f, "failed to build context automaton: {}", reason)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContextError {}

/// Scans context windows for a recognizer's context words with word-boundary awareness.
///
/// Keywords are normalized the same way windows are (lowercase, single-space
/// separated words), so `"Permanent  Account"` in the text matches the
/// configured phrase `"permanent account"`.
pub struct ContextScanner {
    automaton: Option<DoubleArrayAhoCorasick<usize>>,
    keywords: Vec<String>,
}

impl fmt::Debug for ContextScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextScanner")
         .field("automaton", &self.automaton.as_ref().map(|_| "<DoubleArrayAhoCorasick>"))
         .field("keywords", &self.keywords)
         .finish()
    }
}

impl Default for ContextScanner {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContextScanner {
    /// A scanner with no keywords; it never matches.
    pub fn empty() -> Self {
        Self { automaton: None, keywords: Vec::new() }
    }

    /// Compiles the given context words. Blank entries and duplicates are ignored.
    pub fn new<I, S>(keywords: I) -> Result<Self, ContextError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = keywords
            .into_iter()
            .map(|k| normalize(words(k.as_ref())))
            .filter(|k| !k.is_empty())
            .collect();

        if unique.is_empty() {
            return Ok(Self::empty());
        }

        let keywords: Vec<String> = unique.into_iter().collect();
        let automaton = DoubleArrayAhoCorasick::new(keywords.iter().map(String::as_str))
            .map_err(|e| ContextError::Automaton(format!("{}", e)))?;

        Ok(Self { automaton: Some(automaton), keywords })
    }

    pub fn is_empty(&self) -> bool {
        self.automaton.is_none()
    }

    /// The normalized keywords, sorted.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if any keyword occurs in `normalized` as a whole-word match.
    /// `normalized` must already be in the form produced by [`normalize`].
    pub fn matches(&self, normalized: &str) -> bool {
        let Some(automaton) = &self.automaton else { return false; };
        let haystack = normalized.as_bytes();

        for matched in automaton.find_overlapping_iter(haystack) {
            let m_start = matched.start();
            let m_end = matched.end();

            // Word boundary check: "pan" must not match inside "company"
            let prefix_ok = m_start == 0 || haystack[m_start - 1] == b' ';
            let suffix_ok = m_end == haystack.len() || haystack[m_end] == b' ';

            if prefix_ok && suffix_ok {
                return true;
            }
        }
        false
    }

    /// Checks the words surrounding `[start, end)` in `text` for any keyword.
    /// The preceding and following sides are scanned separately so a phrase
    /// never straddles the matched span itself.
    pub fn scan_window(&self, text: &str, start: usize, end: usize, window_words: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let window = ContextWindow::around(text, start, end, window_words);
        self.matches(&window.preceding) || self.matches(&window.following)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scanner_never_matches() {
        let scanner = ContextScanner::new(["", "   "]).unwrap();
        assert!(scanner.is_empty());
        assert!(!scanner.scan_window("pan ABCDE1234F", 4, 14, 5));
    }

    #[test]
    fn test_keywords_are_normalized_and_deduplicated() {
        let scanner = ContextScanner::new(["PAN", "pan", "Income  Tax"]).unwrap();
        assert_eq!(scanner.keywords(), ["income tax", "pan"]);
    }

    #[test]
    fn test_whole_word_only() {
        let scanner = ContextScanner::new(["pan"]).unwrap();
        assert!(scanner.matches("my pan is"));
        assert!(!scanner.matches("company panel"));
    }

    #[test]
    fn test_multi_word_phrase_in_window() {
        let scanner = ContextScanner::new(["permanent account"]).unwrap();
        let text = "Permanent Account number: ABCDE1234F";
        let start = text.find("ABCDE").unwrap();
        assert!(scanner.scan_window(text, start, start + 10, 5));
    }

    #[test]
    fn test_keyword_outside_window_is_ignored() {
        let scanner = ContextScanner::new(["aadhaar"]).unwrap();
        let text = "aadhaar one two three four five six 234512345678";
        let start = text.find("2345").unwrap();
        assert!(!scanner.scan_window(text, start, start + 12, 5));
        assert!(scanner.scan_window(text, start, start + 12, 7));
    }

    #[test]
    fn test_following_window() {
        let scanner = ContextScanner::new(["gstin"]).unwrap();
        let text = "27AAAAA0000A1Z5 is the GSTIN";
        assert!(scanner.scan_window(text, 0, 15, 5));
    }
}
