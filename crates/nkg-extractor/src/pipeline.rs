//! Event pipeline
//!
//! text → Segmenter → WindowExtractor → Deduplicator → events
//!
//! The pipeline is total: text without recognizable structure yields an
//! empty event list, never an error.

use serde::{Deserialize, Serialize};

use nkg_core::{AppConfig, EventRecord, Result};

use crate::dedup::Deduplicator;
use crate::metrics::PipelineReport;
use crate::segment::Segmenter;
use crate::window::WindowExtractor;
use crate::EventExtractor;

/// Events of one run together with its counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub events: Vec<EventRecord>,
    pub report: PipelineReport,
}

/// Segmentation, windowed extraction and deduplication in sequence
#[derive(Debug, Clone, Default)]
pub struct EventPipeline {
    segmenter: Segmenter,
    extractor: WindowExtractor,
    deduplicator: Deduplicator,
}

impl EventPipeline {
    /// Create a pipeline with the built-in vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::new(),
            extractor: WindowExtractor::from_config(config)?,
            deduplicator: Deduplicator::new(),
        })
    }

    /// Replace the segmenter
    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Replace the window extractor
    pub fn with_extractor(mut self, extractor: WindowExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Get the window extractor
    pub fn extractor(&self) -> &WindowExtractor {
        &self.extractor
    }

    /// Run all stages over a text
    pub fn run(&self, text: &str) -> PipelineOutput {
        let sentences = self.segmenter.segment(text);
        let candidates = self.extractor.extract(&sentences);
        let candidate_count = candidates.len();
        let events = self.deduplicator.dedup(candidates);

        let report = PipelineReport {
            sentences: sentences.len(),
            windows: sentences.len(),
            candidates: candidate_count,
            events: events.len(),
            duplicates_dropped: candidate_count - events.len(),
        };

        tracing::info!(
            sentences = report.sentences,
            candidates = report.candidates,
            events = report.events,
            duplicates_dropped = report.duplicates_dropped,
            "Extracted events"
        );

        PipelineOutput { events, report }
    }

    /// Run all stages and keep only the events
    pub fn extract_events(&self, text: &str) -> Vec<EventRecord> {
        self.run(text).events
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "The suspect provided the following account over the course of the interview.\n\n\
        During the holding cell, the suspect appeared nervous and avoided eye contact. \
        When questioned about the reasons, he said he felt cornered; at times his voice wavered \
        and he seemed uncertain about some details. Officers noted changes in his tone and body \
        language, which suggested complexity in his motives and emotions.\n\n\
        During the courtroom hallway, the suspect appeared angry and blamed his partner. \
        When questioned about the reasons, he said he wanted revenge; at times his voice wavered \
        and he seemed uncertain about some details. Officers noted changes in his tone and body \
        language, which suggested complexity in his motives and emotions.\n\n\
        Overall, the suspect's account contained inconsistencies and signs of stress.\n\n";

    #[test]
    fn test_run_empty() {
        let output = EventPipeline::new().run("");

        assert!(output.events.is_empty());
        assert_eq!(output.report, PipelineReport::default());
    }

    #[test]
    fn test_run_report_counts() {
        let text = "During the holding cell, he appeared calm. He sobbed quietly. \
                    During the holding cell, he appeared calm. He sobbed quietly.";
        let output = EventPipeline::new().run(text);

        assert_eq!(output.report.sentences, 4);
        assert_eq!(output.report.windows, 4);
        assert_eq!(
            output.report.candidates,
            output.report.events + output.report.duplicates_dropped
        );
        assert!(output.report.duplicates_dropped > 0);
    }

    #[test]
    fn test_run_multi_paragraph_statement() {
        let output = EventPipeline::new().run(STATEMENT);
        let events = &output.events;

        let holding_cell = EventRecord::new()
            .with_situation("the holding cell")
            .with_emotion("nervous")
            .with_action("avoided eye contact")
            .with_motive("felt cornered");
        // window spanning both paragraphs pairs the second situation with the first motive
        let bridging = EventRecord::new()
            .with_situation("the courtroom hallway")
            .with_emotion("angry")
            .with_action("blamed his partner")
            .with_motive("felt cornered");
        let hallway = EventRecord::new()
            .with_situation("the courtroom hallway")
            .with_emotion("angry")
            .with_action("blamed his partner")
            .with_motive("wanted revenge");
        let questioned = EventRecord::new()
            .with_situation("questioned about the reasons")
            .with_motive("wanted revenge");

        assert_eq!(
            events,
            &vec![holding_cell, bridging, hallway, questioned]
        );
        assert_eq!(output.report.sentences, 8);
        assert_eq!(output.report.candidates, 6);
        assert_eq!(output.report.duplicates_dropped, 2);
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.extraction.min_fields = 1;
        let pipeline = EventPipeline::from_config(&config).unwrap();

        assert_eq!(pipeline.extractor().min_fields(), 1);
        assert_eq!(pipeline.extract_events("The suspect appeared calm.").len(), 1);
    }

    #[test]
    fn test_output_serializes() {
        let output = EventPipeline::new().run(
            "During the interrogation room, the suspect appeared angry and shouted at the officer.",
        );
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["report"]["events"], 1);
        assert_eq!(json["events"][0]["emotion"], "angry");
    }
}
