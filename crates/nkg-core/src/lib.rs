//! NKG Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout the NKG system:
//! - Narrative models (sentences, event records, attribute kinds)
//! - Graph relation vocabulary shared by the extractor and graph builder
//! - Common error types
//! - Configuration management (vocabularies and extraction settings)

pub mod config;

pub use config::{
    AppConfig, CaseMode, ConfigError, CueRule, EnvOverrides, ExtractionConfig, LoggingConfig,
    OutputConfig, OutputFormat, SpeechCue, VocabularyConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for NKG operations
#[derive(Error, Debug)]
pub enum NkgError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pattern rule: {0}")]
    PatternError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for NkgError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NkgError>;

// ============================================================================
// Attribute Kinds and Relations
// ============================================================================

/// The four attributes an event record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Situation,
    Emotion,
    Action,
    Motive,
}

impl AttributeKind {
    /// All kinds in record field order
    pub const ALL: [AttributeKind; 4] = [
        AttributeKind::Situation,
        AttributeKind::Emotion,
        AttributeKind::Action,
        AttributeKind::Motive,
    ];

    /// Get the node type label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Situation => "Situation",
            Self::Emotion => "Emotion",
            Self::Action => "Action",
            Self::Motive => "Motive",
        }
    }

    /// Relation carried by edges pointing at this kind of attribute
    pub fn relation(&self) -> Relation {
        match self {
            Self::Situation => Relation::HappenedDuring,
            Self::Emotion => Relation::ShowedEmotion,
            Self::Action => Relation::PerformedAction,
            Self::Motive => Relation::HadMotive,
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Edge labels from a statement to its attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    HappenedDuring,  // Statement -> Situation
    ShowedEmotion,   // Statement -> Emotion
    PerformedAction, // Statement -> Action
    HadMotive,       // Statement -> Motive
}

impl Relation {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HappenedDuring => "happened_during",
            Self::ShowedEmotion => "showed_emotion",
            Self::PerformedAction => "performed_action",
            Self::HadMotive => "had_motive",
        }
    }

    /// Get from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happened_during" => Some(Self::HappenedDuring),
            "showed_emotion" => Some(Self::ShowedEmotion),
            "performed_action" => Some(Self::PerformedAction),
            "had_motive" => Some(Self::HadMotive),
            _ => None,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Narrative Models
// ============================================================================

/// A sentence produced by segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Position in the source text, starting at 1
    pub index: usize,

    /// Trimmed sentence text, terminal punctuation included
    pub text: String,
}

impl Sentence {
    /// Create a new sentence
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// One situation/emotion/action/motive finding
///
/// Every present field holds a non-empty string. Builders normalize blank
/// values to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRecord {
    pub situation: Option<String>,
    pub emotion: Option<String>,
    pub action: Option<String>,
    pub motive: Option<String>,
}

impl EventRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from raw field values
    pub fn from_fields(
        situation: Option<String>,
        emotion: Option<String>,
        action: Option<String>,
        motive: Option<String>,
    ) -> Self {
        Self {
            situation: non_blank(situation),
            emotion: non_blank(emotion),
            action: non_blank(action),
            motive: non_blank(motive),
        }
    }

    /// Set situation
    pub fn with_situation(mut self, value: impl Into<String>) -> Self {
        self.situation = non_blank(Some(value.into()));
        self
    }

    /// Set emotion
    pub fn with_emotion(mut self, value: impl Into<String>) -> Self {
        self.emotion = non_blank(Some(value.into()));
        self
    }

    /// Set action
    pub fn with_action(mut self, value: impl Into<String>) -> Self {
        self.action = non_blank(Some(value.into()));
        self
    }

    /// Set motive
    pub fn with_motive(mut self, value: impl Into<String>) -> Self {
        self.motive = non_blank(Some(value.into()));
        self
    }

    /// Get a field by kind
    pub fn get(&self, kind: AttributeKind) -> Option<&str> {
        match kind {
            AttributeKind::Situation => self.situation.as_deref(),
            AttributeKind::Emotion => self.emotion.as_deref(),
            AttributeKind::Action => self.action.as_deref(),
            AttributeKind::Motive => self.motive.as_deref(),
        }
    }

    /// Present fields in record order
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeKind, &str)> + '_ {
        AttributeKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|value| (kind, value)))
    }

    /// Number of present fields (0-4)
    pub fn present_count(&self) -> usize {
        self.attributes().count()
    }

    /// Check if no field is present
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_kind_display() {
        assert_eq!(AttributeKind::Situation.to_string(), "Situation");
        assert_eq!(AttributeKind::Motive.as_str(), "Motive");
    }

    #[test]
    fn test_attribute_kind_relation() {
        assert_eq!(AttributeKind::Situation.relation(), Relation::HappenedDuring);
        assert_eq!(AttributeKind::Emotion.relation(), Relation::ShowedEmotion);
        assert_eq!(AttributeKind::Action.relation(), Relation::PerformedAction);
        assert_eq!(AttributeKind::Motive.relation(), Relation::HadMotive);
    }

    #[test]
    fn test_relation_parse() {
        assert_eq!(
            Relation::parse("happened_during"),
            Some(Relation::HappenedDuring)
        );
        assert_eq!(Relation::parse("HAD_MOTIVE"), Some(Relation::HadMotive));
        assert_eq!(Relation::parse("unknown"), None);
        assert_eq!(Relation::PerformedAction.to_string(), "performed_action");
    }

    #[test]
    fn test_event_record_builder() {
        let record = EventRecord::new()
            .with_situation("the holding cell")
            .with_emotion("calm");

        assert_eq!(record.get(AttributeKind::Situation), Some("the holding cell"));
        assert_eq!(record.get(AttributeKind::Action), None);
        assert_eq!(record.present_count(), 2);
    }

    #[test]
    fn test_event_record_blank_fields_are_absent() {
        let record = EventRecord::from_fields(
            Some(String::new()),
            Some("   ".to_string()),
            Some("sobbed quietly".to_string()),
            None,
        );

        assert_eq!(record.situation, None);
        assert_eq!(record.emotion, None);
        assert_eq!(record.present_count(), 1);
        assert!(EventRecord::new().is_empty());
    }

    #[test]
    fn test_event_record_attribute_order() {
        let record = EventRecord::new()
            .with_motive("felt cornered")
            .with_situation("the courtroom hallway");

        let kinds: Vec<AttributeKind> = record.attributes().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![AttributeKind::Situation, AttributeKind::Motive]);
    }
}
