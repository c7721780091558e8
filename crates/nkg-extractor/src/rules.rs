//! Field extraction rules
//!
//! Each field has an ordered rule list compiled from [`VocabularyConfig`]:
//! - Situation: cue word + text up to the next comma or period
//! - Emotion: cue word + one word checked against the emotion vocabulary
//! - Action: first listed phrase found in the window
//! - Motive: first listed phrase, then a reported-speech fallback
//!
//! Rules are evaluated top to bottom and the first match wins.

use std::collections::HashSet;

use regex::Regex;

use nkg_core::{AttributeKind, CaseMode, CueRule, EventRecord, SpeechCue, VocabularyConfig};

/// Text captured after a situation cue, closed by a comma or period
const CLAUSE_CAPTURE: &str = r"\s+(?P<value>[^,.;]+)[,.]";

/// Single word captured after an emotion cue
const WORD_CAPTURE: &str = r"\s+(?P<value>\w+)";

/// Free text captured after a speech cue, up to the next clause mark
const SPEECH_CAPTURE: &str = r"\s+(?P<value>[^.;,]+)";

/// A cue rule compiled to a regex with a `value` capture group
#[derive(Debug, Clone)]
struct CompiledCue {
    name: String,
    regex: Regex,
}

/// Compiled rule lists for all four fields
#[derive(Debug, Clone)]
pub struct RuleSet {
    situation: Vec<CompiledCue>,
    emotion: Vec<CompiledCue>,
    emotion_words: HashSet<String>,
    action_phrases: Vec<String>,
    motive_phrases: Vec<String>,
    motive_cue: Option<Regex>,
    max_motive_tokens: usize,
}

impl RuleSet {
    /// Compile the rule lists without validating the vocabulary.
    ///
    /// Blank cue words are ignored, and a rule or speech cue left with no
    /// cue words is skipped, as is any rule that fails to compile.
    /// `WindowExtractor::from_config` validates the configuration first.
    pub fn compile(vocabulary: &VocabularyConfig, max_motive_tokens: usize) -> Self {
        let situation = vocabulary
            .situation_rules
            .iter()
            .filter_map(|rule| compile_cue(rule, CLAUSE_CAPTURE))
            .collect();

        let emotion = vocabulary
            .emotion_rules
            .iter()
            .filter_map(|rule| compile_cue(rule, WORD_CAPTURE))
            .collect();

        Self {
            situation,
            emotion,
            emotion_words: vocabulary
                .emotion_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect(),
            action_phrases: vocabulary.action_phrases.clone(),
            motive_phrases: vocabulary.motive_phrases.clone(),
            motive_cue: compile_speech_cue(&vocabulary.motive_cue),
            max_motive_tokens,
        }
    }

    /// Situation: the first rule whose cue occurs decides the value
    pub fn situation(&self, window: &str) -> Option<String> {
        self.situation.iter().find_map(|cue| {
            cue.regex
                .captures(window)
                .and_then(|caps| caps.name("value"))
                .map(|m| m.as_str().trim().to_string())
        })
    }

    /// Emotion: first cue occurrence per rule, accepted only if in vocabulary
    pub fn emotion(&self, window: &str) -> Option<String> {
        self.emotion.iter().find_map(|cue| {
            let word = cue.regex.captures(window)?.name("value")?.as_str().to_lowercase();
            self.emotion_words.contains(&word).then_some(word)
        })
    }

    /// Action: first listed phrase present in the window
    pub fn action(&self, window: &str) -> Option<String> {
        first_phrase(&self.action_phrases, window)
    }

    /// Motive: listed phrase, else a short reported-speech capture
    pub fn motive(&self, window: &str) -> Option<String> {
        if let Some(phrase) = first_phrase(&self.motive_phrases, window) {
            return Some(phrase);
        }

        let candidate = self
            .motive_cue
            .as_ref()?
            .captures(window)?
            .name("value")?
            .as_str()
            .trim()
            .to_string();

        (candidate.split_whitespace().count() <= self.max_motive_tokens).then_some(candidate)
    }

    /// Extract one field by kind
    pub fn field(&self, kind: AttributeKind, window: &str) -> Option<String> {
        match kind {
            AttributeKind::Situation => self.situation(window),
            AttributeKind::Emotion => self.emotion(window),
            AttributeKind::Action => self.action(window),
            AttributeKind::Motive => self.motive(window),
        }
    }

    /// Apply all four rule lists to a window
    pub fn scan(&self, window: &str) -> EventRecord {
        EventRecord::from_fields(
            self.situation(window),
            self.emotion(window),
            self.action(window),
            self.motive(window),
        )
    }

    /// Names of the compiled situation rules, in priority order
    pub fn situation_rule_names(&self) -> Vec<&str> {
        self.situation.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the compiled emotion rules, in priority order
    pub fn emotion_rule_names(&self) -> Vec<&str> {
        self.emotion.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::compile(&VocabularyConfig::default(), 6)
    }
}

fn first_phrase(phrases: &[String], window: &str) -> Option<String> {
    phrases
        .iter()
        .find(|phrase| window.contains(phrase.as_str()))
        .cloned()
}

/// Build the alternation for a list of cue words
fn cue_alternation(cues: &[String], case: CaseMode) -> String {
    let alternatives: Vec<String> = cues
        .iter()
        .map(|cue| cue.trim())
        .filter(|cue| !cue.is_empty())
        .map(|cue| match case {
            CaseMode::Insensitive => regex::escape(cue),
            CaseMode::LeadingLetter => leading_letter_pattern(cue),
        })
        .collect();

    let group = format!("(?:{})", alternatives.join("|"));
    match case {
        CaseMode::Insensitive => format!("(?i:{group})"),
        CaseMode::LeadingLetter => group,
    }
}

/// "during" -> "(?:D|d)uring"
fn leading_letter_pattern(cue: &str) -> String {
    let mut chars = cue.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let upper: String = first.to_uppercase().collect();
    let lower: String = first.to_lowercase().collect();

    format!(
        "(?:{}|{}){}",
        regex::escape(&upper),
        regex::escape(&lower),
        regex::escape(chars.as_str())
    )
}

fn compile_cue(rule: &CueRule, capture: &str) -> Option<CompiledCue> {
    if rule.cues.iter().all(|c| c.trim().is_empty()) {
        tracing::warn!(rule = %rule.name, "Skipping cue rule without cue words");
        return None;
    }

    let boundary = if rule.whole_word { r"\b" } else { "" };
    let pattern = format!("{boundary}{}{capture}", cue_alternation(&rule.cues, rule.case));

    match Regex::new(&pattern) {
        Ok(regex) => Some(CompiledCue {
            name: rule.name.clone(),
            regex,
        }),
        Err(e) => {
            tracing::warn!(rule = %rule.name, error = %e, "Skipping cue rule that failed to compile");
            None
        }
    }
}

fn compile_speech_cue(cue: &SpeechCue) -> Option<Regex> {
    let blank = |words: &[String]| words.iter().all(|w| w.trim().is_empty());
    if blank(&cue.verbs) || blank(&cue.subjects) {
        tracing::warn!("Skipping speech cue without verbs or subjects");
        return None;
    }

    let connective = cue
        .connective
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("(?:{} )?", regex::escape(c)))
        .unwrap_or_default();

    let pattern = format!(
        "(?i){} {}{}{}",
        cue_alternation(&cue.verbs, CaseMode::Insensitive),
        connective,
        cue_alternation(&cue.subjects, CaseMode::Insensitive),
        SPEECH_CAPTURE
    );

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping speech cue that failed to compile");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
