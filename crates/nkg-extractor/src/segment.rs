//! Sentence segmentation
//!
//! Splits text after a terminal mark that is followed by whitespace. The mark
//! stays with its sentence; blank fragments are dropped.

use nkg_core::Sentence;

/// Default sentence-terminal marks
pub const DEFAULT_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits raw text into ordered, 1-indexed sentences
#[derive(Debug, Clone)]
pub struct Segmenter {
    terminators: Vec<char>,
}

impl Segmenter {
    /// Create a segmenter breaking on `.`, `!` and `?`
    pub fn new() -> Self {
        Self {
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }

    /// Use a custom set of terminal marks
    pub fn with_terminators(mut self, terminators: &[char]) -> Self {
        self.terminators = terminators.to_vec();
        self
    }

    /// Segment text into sentences
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            if !self.terminators.contains(&ch) {
                continue;
            }
            let followed_by_space = chars
                .peek()
                .map(|&(_, next)| next.is_whitespace())
                .unwrap_or(false);

            if followed_by_space {
                let end = pos + ch.len_utf8();
                push_fragment(&mut sentences, &text[start..end]);
                start = end;
            }
        }

        // Remainder closes the last sentence, terminated or not
        push_fragment(&mut sentences, &text[start..]);
        sentences
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_fragment(sentences: &mut Vec<Sentence>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(Sentence::new(sentences.len() + 1, trimmed));
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn count_boundaries(text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        chars
            .windows(2)
            .filter(|w| DEFAULT_TERMINATORS.contains(&w[0]) && w[1].is_whitespace())
            .count()
    }

    fn remainder_after_last_boundary(text: &str) -> &str {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut start = 0;
        for w in chars.windows(2) {
            if DEFAULT_TERMINATORS.contains(&w[0].1) && w[1].1.is_whitespace() {
                start = w[1].0;
            }
        }
        &text[start..]
    }

    proptest! {
        /// Property: one sentence per boundary, plus the trailing remainder if any
        #[test]
        fn test_sentence_count_matches_boundaries(text in "[ab .!?\n]{0,60}") {
            let sentences = Segmenter::new().segment(&text);
            let trailing = usize::from(!remainder_after_last_boundary(&text).trim().is_empty());

            prop_assert_eq!(sentences.len(), count_boundaries(&text) + trailing);
        }

        /// Property: sentences are trimmed, non-empty and numbered from 1
        #[test]
        fn test_sentences_are_trimmed_and_indexed(text in "[a-z .!?\t\n]{0,80}") {
            let sentences = Segmenter::new().segment(&text);

            for (i, sentence) in sentences.iter().enumerate() {
                prop_assert_eq!(sentence.index, i + 1);
                prop_assert!(!sentence.text.is_empty());
                prop_assert_eq!(sentence.text.trim(), sentence.text.as_str());
            }
        }
    }
}
