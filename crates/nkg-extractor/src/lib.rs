//! NKG Extractor - Event extraction pipeline
//!
//! Turns narrative text into a deduplicated list of event records:
//! segmentation, sliding-window rule matching over a closed vocabulary,
//! and first-seen deduplication.

use nkg_core::{EventRecord, Sentence};

/// Trait for event extractors working over segmented text
pub trait EventExtractor: Send + Sync {
    /// Extract retained candidate records, in window order
    fn extract(&self, sentences: &[Sentence]) -> Vec<EventRecord>;
}

pub mod dedup;
pub mod metrics;
pub mod pipeline;
pub mod rules;
pub mod segment;
pub mod window;

pub use dedup::Deduplicator;
pub use metrics::{EventMetrics, FieldMetrics, PipelineReport};
pub use pipeline::{EventPipeline, PipelineOutput};
pub use rules::RuleSet;
pub use segment::Segmenter;
pub use window::WindowExtractor;
