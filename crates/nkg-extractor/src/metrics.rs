//! Extraction metrics
//!
//! Per-run pipeline counters, plus precision, recall and F1 of extracted
//! events against a gold standard for tuning vocabularies.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use nkg_core::{AttributeKind, EventRecord};

// ============================================================================
// Pipeline Report
// ============================================================================

/// Counters collected during one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Sentences produced by segmentation
    pub sentences: usize,
    /// Windows scanned
    pub windows: usize,
    /// Candidates that passed the retention gate
    pub candidates: usize,
    /// Events left after deduplication
    pub events: usize,
    /// Candidates dropped as duplicates
    pub duplicates_dropped: usize,
}

impl PipelineReport {
    /// Windows that produced no retained candidate
    pub fn windows_rejected(&self) -> usize {
        self.windows.saturating_sub(self.candidates)
    }
}

// ============================================================================
// Field Metrics
// ============================================================================

/// Confusion counts for one attribute kind or for whole events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetrics {
    /// Values found in both prediction and gold
    pub true_positives: usize,
    /// Predicted values not in gold
    pub false_positives: usize,
    /// Gold values not predicted
    pub false_negatives: usize,
}

impl FieldMetrics {
    fn from_sets<T: Eq + std::hash::Hash>(predicted: &HashSet<T>, gold: &HashSet<T>) -> Self {
        let true_positives = predicted.intersection(gold).count();
        Self {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: gold.len() - true_positives,
        }
    }

    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

// ============================================================================
// Event Metrics
// ============================================================================

/// Quality of extracted events against a gold standard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMetrics {
    /// Whole-record matches (all four fields equal)
    pub events: FieldMetrics,
    /// Distinct-value matches per attribute kind
    pub fields: BTreeMap<AttributeKind, FieldMetrics>,
    /// Total gold events
    pub gold_total: usize,
    /// Total predicted events
    pub predicted_total: usize,
}

impl EventMetrics {
    /// Compare predicted events with gold events
    pub fn evaluate(predicted: &[EventRecord], gold: &[EventRecord]) -> Self {
        let predicted_set: HashSet<&EventRecord> = predicted.iter().collect();
        let gold_set: HashSet<&EventRecord> = gold.iter().collect();

        let fields = AttributeKind::ALL
            .into_iter()
            .map(|kind| {
                let values = |records: &[EventRecord]| -> HashSet<String> {
                    records
                        .iter()
                        .filter_map(|r| r.get(kind).map(str::to_string))
                        .collect()
                };
                (
                    kind,
                    FieldMetrics::from_sets(&values(predicted), &values(gold)),
                )
            })
            .collect();

        Self {
            events: FieldMetrics::from_sets(&predicted_set, &gold_set),
            fields,
            gold_total: gold.len(),
            predicted_total: predicted.len(),
        }
    }

    /// Metrics for one attribute kind
    pub fn field(&self, kind: AttributeKind) -> FieldMetrics {
        self.fields.get(&kind).cloned().unwrap_or_default()
    }

    /// Print a summary report
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Event Extraction Report ===\n\n\
             Events:\n\
               Precision: {:.1}%\n\
               Recall:    {:.1}%\n\
               F1 Score:  {:.1}%\n\
               Gold: {} | Predicted: {} | TP: {} | FP: {} | FN: {}\n\n\
             Fields:\n",
            self.events.precision() * 100.0,
            self.events.recall() * 100.0,
            self.events.f1_score() * 100.0,
            self.gold_total,
            self.predicted_total,
            self.events.true_positives,
            self.events.false_positives,
            self.events.false_negatives,
        );

        for (kind, metrics) in &self.fields {
            out.push_str(&format!(
                "  {:<10} P {:.1}% | R {:.1}% | F1 {:.1}%\n",
                kind.as_str(),
                metrics.precision() * 100.0,
                metrics.recall() * 100.0,
                metrics.f1_score() * 100.0,
            ));
        }

        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event(situation: &str, emotion: &str, action: &str) -> EventRecord {
        EventRecord::new()
            .with_situation(situation)
            .with_emotion(emotion)
            .with_action(action)
    }

    #[test]
    fn test_field_metrics_precision_recall() {
        let metrics = FieldMetrics {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 2,
        };

        assert!((metrics.precision() - 0.8).abs() < 0.001);
        assert!((metrics.recall() - 0.8).abs() < 0.001);
        assert!((metrics.f1_score() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_field_metrics_empty() {
        let metrics = FieldMetrics::default();
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.f1_score(), 0.0);
    }

    #[test]
    fn test_evaluate_perfect() {
        let events = vec![
            event("the holding cell", "calm", "sobbed quietly"),
            event("the courtroom hallway", "angry", "blamed his partner"),
        ];

        let metrics = EventMetrics::evaluate(&events, &events);

        assert_eq!(metrics.events.true_positives, 2);
        assert!((metrics.events.precision() - 1.0).abs() < 0.001);
        assert!((metrics.field(AttributeKind::Emotion).recall() - 1.0).abs() < 0.001);
        assert_eq!(metrics.field(AttributeKind::Motive), FieldMetrics::default());
    }

    #[test]
    fn test_evaluate_partial() {
        let predicted = vec![event("the holding cell", "calm", "sobbed quietly")];
        let gold = vec![
            event("the holding cell", "nervous", "sobbed quietly"),
            event("the courtroom hallway", "angry", "blamed his partner"),
        ];

        let metrics = EventMetrics::evaluate(&predicted, &gold);

        assert_eq!(metrics.events.true_positives, 0);
        assert_eq!(metrics.events.false_positives, 1);
        assert_eq!(metrics.events.false_negatives, 2);

        let situation = metrics.field(AttributeKind::Situation);
        assert_eq!(situation.true_positives, 1);
        assert_eq!(situation.false_negatives, 1);
        assert!((situation.precision() - 1.0).abs() < 0.001);
        assert!((situation.recall() - 0.5).abs() < 0.001);

        let emotion = metrics.field(AttributeKind::Emotion);
        assert_eq!(emotion.true_positives, 0);
    }

    #[test]
    fn test_report() {
        let events = vec![event("the holding cell", "calm", "sobbed quietly")];
        let report = EventMetrics::evaluate(&events, &events).report();

        assert!(report.contains("Event Extraction Report"));
        assert!(report.contains("Situation"));
        assert!(report.contains("Gold: 1 | Predicted: 1"));
    }

    #[test]
    fn test_pipeline_report_rejected_windows() {
        let report = PipelineReport {
            sentences: 5,
            windows: 5,
            candidates: 3,
            events: 2,
            duplicates_dropped: 1,
        };

        assert_eq!(report.windows_rejected(), 2);
    }
}
