//! Sliding-window event extraction
//!
//! One window per sentence start index, covering up to `window_size`
//! consecutive sentences joined by a single space. Windows overlap, so an
//! event spanning several sentences is seen at more than one offset; the
//! deduplicator collapses those repeats.

use nkg_core::{AppConfig, EventRecord, ExtractionConfig, Result, Sentence};

use crate::rules::RuleSet;
use crate::EventExtractor;

/// Rule-based extractor over overlapping sentence windows
#[derive(Debug, Clone)]
pub struct WindowExtractor {
    rules: RuleSet,
    window_size: usize,
    min_fields: usize,
}

impl WindowExtractor {
    /// Create an extractor with the built-in vocabulary
    pub fn new() -> Self {
        let settings = ExtractionConfig::default();
        Self {
            rules: RuleSet::default(),
            window_size: settings.window_size,
            min_fields: settings.min_fields,
        }
    }

    /// Create from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            rules: RuleSet::compile(&config.vocabulary, config.extraction.max_motive_tokens),
            window_size: config.extraction.window_size,
            min_fields: config.extraction.min_fields,
        })
    }

    /// Replace the rule set
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set window size (at least one sentence)
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    /// Set the retention threshold (1-4 present fields)
    pub fn with_min_fields(mut self, min_fields: usize) -> Self {
        self.min_fields = min_fields.clamp(1, 4);
        self
    }

    /// Get the compiled rules
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Get the window size
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Get the retention threshold
    pub fn min_fields(&self) -> usize {
        self.min_fields
    }

    /// Build the window texts, one per start index
    pub fn windows(&self, sentences: &[Sentence]) -> Vec<String> {
        (0..sentences.len())
            .map(|start| {
                let end = (start + self.window_size).min(sentences.len());
                sentences[start..end]
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Apply the rule lists to a single window, without the retention gate
    pub fn scan_window(&self, window: &str) -> EventRecord {
        self.rules.scan(window)
    }

    /// Raw records for every window, retained or not
    pub fn candidates(&self, sentences: &[Sentence]) -> Vec<EventRecord> {
        self.windows(sentences)
            .iter()
            .map(|window| self.scan_window(window))
            .collect()
    }

    /// Check whether a record passes the retention gate
    pub fn is_retained(&self, record: &EventRecord) -> bool {
        record.present_count() >= self.min_fields
    }
}

impl Default for WindowExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventExtractor for WindowExtractor {
    fn extract(&self, sentences: &[Sentence]) -> Vec<EventRecord> {
        let mut retained = Vec::new();

        for (start, record) in self.candidates(sentences).into_iter().enumerate() {
            let fields = record.present_count();
            tracing::debug!(window = start, fields, "Scanned window");

            if self.is_retained(&record) {
                retained.push(record);
            }
        }

        retained
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segmenter;

    fn sentences(text: &str) -> Vec<Sentence> {
        Segmenter::new().segment(text)
    }

    #[test]
    fn test_windows_cover_up_to_three_sentences() {
        let extractor = WindowExtractor::new();
        let windows = extractor.windows(&sentences("A. B. C. D."));

        assert_eq!(windows, vec!["A. B. C.", "B. C. D.", "C. D.", "D."]);
    }

    #[test]
    fn test_windows_custom_size() {
        let extractor = WindowExtractor::new().with_window_size(1);
        let windows = extractor.windows(&sentences("A. B."));

        assert_eq!(windows, vec!["A.", "B."]);
    }

    #[test]
    fn test_windows_empty() {
        let extractor = WindowExtractor::new();
        assert!(extractor.windows(&[]).is_empty());
        assert!(extractor.extract(&[]).is_empty());
    }

    #[test]
    fn test_candidates_one_per_window() {
        let extractor = WindowExtractor::new();
        let candidates = extractor.candidates(&sentences("Nothing here. Or here."));

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_extract_full_event() {
        let extractor = WindowExtractor::new();
        let text = "During the interrogation room, the suspect appeared angry and \
                    shouted at the officer. He said he needed money.";
        let records = extractor.extract(&sentences(text));

        // the second window only finds the motive and is dropped
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].situation.as_deref(), Some("the interrogation room"));
        assert_eq!(records[0].emotion.as_deref(), Some("angry"));
        assert_eq!(records[0].action.as_deref(), Some("shouted at the officer"));
        assert_eq!(records[0].motive.as_deref(), Some("needed money"));
    }

    #[test]
    fn test_single_field_window_not_retained() {
        let extractor = WindowExtractor::new();
        assert!(extractor
            .extract(&sentences("The suspect appeared calm."))
            .is_empty());
    }

    #[test]
    fn test_event_spanning_sentences_found_at_each_offset() {
        let extractor = WindowExtractor::new();
        let text = "Officers waited outside. During the holding cell, he appeared nervous. \
                    He sobbed quietly.";
        let records = extractor.extract(&sentences(text));

        // windows 0 and 1 both see the same event; window 2 only sees the action
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_min_fields_threshold() {
        let extractor = WindowExtractor::new().with_min_fields(1);
        let records = extractor.extract(&sentences("The suspect appeared calm."));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].emotion.as_deref(), Some("calm"));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = AppConfig::default();
        config.extraction.window_size = 0;

        assert!(WindowExtractor::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_window_size() {
        let mut config = AppConfig::default();
        config.extraction.window_size = 1;
        let extractor = WindowExtractor::from_config(&config).unwrap();

        // situation and emotion are in sentence 1, action in sentence 2
        let text = "During the holding cell, he appeared calm. He sobbed quietly.";
        let records = extractor.extract(&sentences(text));

        assert_eq!(extractor.window_size(), 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, None);
    }
}
