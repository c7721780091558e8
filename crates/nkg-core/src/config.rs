//! NKG Configuration Management
//!
//! Handles configuration from environment variables and TOML files with
//! defaults matching the built-in interview vocabulary. The vocabularies are
//! plain data so pattern rules can be extended without touching extraction
//! logic.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Windowing and retention settings
    pub extraction: ExtractionConfig,

    /// Closed vocabularies and cue rules
    pub vocabulary: VocabularyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Graph output configuration
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        EnvOverrides::from_env()?.apply(&mut config);
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse configuration from TOML text (missing sections use defaults)
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        EnvOverrides::from_env()?.apply(&mut self);
        Ok(self)
    }

    /// Check every section for values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extraction.validate()?;
        self.vocabulary.validate()
    }
}

/// Settings given through environment variables; `None` when unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub window_size: Option<usize>,
    pub min_fields: Option<usize>,
    pub max_motive_tokens: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through a variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parsed = |key: &str| -> Result<Option<usize>, ConfigError> {
            lookup(key).map(|value| parse_env(key, value)).transpose()
        };

        Ok(Self {
            window_size: parsed("NKG_WINDOW_SIZE")?,
            min_fields: parsed("NKG_MIN_FIELDS")?,
            max_motive_tokens: parsed("NKG_MAX_MOTIVE_TOKENS")?,
            output_format: lookup("NKG_OUTPUT_FORMAT")
                .map(|format| format.parse::<OutputFormat>())
                .transpose()?,
            log_level: lookup("LOG_LEVEL"),
            log_json: lookup("NKG_LOG_JSON")
                .map(|value| parse_env("NKG_LOG_JSON", value))
                .transpose()?,
        })
    }

    /// Overwrite every setting that was given
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(window_size) = self.window_size {
            config.extraction.window_size = window_size;
        }
        if let Some(min_fields) = self.min_fields {
            config.extraction.min_fields = min_fields;
        }
        if let Some(max_motive_tokens) = self.max_motive_tokens {
            config.extraction.max_motive_tokens = max_motive_tokens;
        }
        if let Some(format) = self.output_format {
            config.output.format = format;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(json_format) = self.log_json {
            config.logging.json_format = json_format;
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Windowing and retention settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of consecutive sentences per window
    pub window_size: usize,

    /// Minimum number of present fields for a window to produce a record
    pub min_fields: usize,

    /// Longest accepted motive captured by the speech-cue fallback (tokens)
    pub max_motive_tokens: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            min_fields: 2,
            max_motive_tokens: 6,
        }
    }
}

impl ExtractionConfig {
    /// Validate extraction settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "extraction.window_size".to_string(),
                value: self.window_size.to_string(),
            });
        }
        if !(1..=4).contains(&self.min_fields) {
            return Err(ConfigError::InvalidValue {
                key: "extraction.min_fields".to_string(),
                value: self.min_fields.to_string(),
            });
        }
        if self.max_motive_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "extraction.max_motive_tokens".to_string(),
                value: self.max_motive_tokens.to_string(),
            });
        }
        Ok(())
    }
}

/// How a cue word is matched against window text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Only the first letter may differ in case ("During" / "during")
    LeadingLetter,
    /// Whole cue is matched case-insensitively
    Insensitive,
}

/// One entry of an ordered, first-match-wins rule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueRule {
    /// Rule name used in logs
    pub name: String,

    /// Alternative cue words
    pub cues: Vec<String>,

    /// Case handling for the cues
    pub case: CaseMode,

    /// Require a word boundary before the cue
    pub whole_word: bool,
}

impl CueRule {
    /// Create a new rule
    pub fn new(name: impl Into<String>, cues: &[&str], case: CaseMode, whole_word: bool) -> Self {
        Self {
            name: name.into(),
            cues: cues.iter().map(|s| s.to_string()).collect(),
            case,
            whole_word,
        }
    }
}

/// Reported-speech cue ("said that he ...") used as the motive fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechCue {
    /// Speech verbs ("said", "mentioned")
    pub verbs: Vec<String>,

    /// Optional connective between verb and subject ("that")
    pub connective: Option<String>,

    /// Subjects whose reported motive is captured ("he", "the suspect")
    pub subjects: Vec<String>,
}

impl Default for SpeechCue {
    fn default() -> Self {
        Self {
            verbs: vec!["said".to_string(), "mentioned".to_string()],
            connective: Some("that".to_string()),
            subjects: vec!["he".to_string(), "the suspect".to_string()],
        }
    }
}

/// Closed vocabularies and cue rules for the window extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Accepted emotion words (compared lowercase)
    pub emotion_words: Vec<String>,

    /// Action phrases, earlier entries win
    pub action_phrases: Vec<String>,

    /// Motive phrases, earlier entries win
    pub motive_phrases: Vec<String>,

    /// Situation cue rules, evaluated top to bottom
    pub situation_rules: Vec<CueRule>,

    /// Emotion cue rules, evaluated top to bottom
    pub emotion_rules: Vec<CueRule>,

    /// Motive fallback cue
    pub motive_cue: SpeechCue,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            emotion_words: to_strings(&[
                "angry",
                "anxious",
                "calm",
                "nervous",
                "remorseful",
                "defensive",
                "distraught",
            ]),
            action_phrases: to_strings(&[
                "shouted at the officer",
                "refused to cooperate",
                "apologized repeatedly",
                "blamed his partner",
                "explained the plan calmly",
                "avoided eye contact",
                "sobbed quietly",
            ]),
            motive_phrases: to_strings(&[
                "needed money",
                "wanted revenge",
                "acted impulsively",
                "was pressured by peers",
                "was afraid of consequences",
                "wanted recognition",
                "felt cornered",
            ]),
            situation_rules: vec![
                CueRule::new("during", &["during"], CaseMode::LeadingLetter, false),
                CueRule::new(
                    "temporal",
                    &["when", "while", "in"],
                    CaseMode::Insensitive,
                    true,
                ),
            ],
            emotion_rules: vec![
                CueRule::new("appeared", &["appeared"], CaseMode::Insensitive, false),
                CueRule::new("copula", &["seemed", "was"], CaseMode::Insensitive, true),
            ],
            motive_cue: SpeechCue::default(),
        }
    }
}

impl VocabularyConfig {
    /// Validate vocabulary lists and rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emotion_words.is_empty() {
            return Err(ConfigError::MissingRequired(
                "vocabulary.emotion_words".to_string(),
            ));
        }

        let lists = [
            ("vocabulary.emotion_words", &self.emotion_words),
            ("vocabulary.action_phrases", &self.action_phrases),
            ("vocabulary.motive_phrases", &self.motive_phrases),
            ("vocabulary.motive_cue.verbs", &self.motive_cue.verbs),
            ("vocabulary.motive_cue.subjects", &self.motive_cue.subjects),
        ];
        for (key, values) in lists {
            if let Some(blank) = values.iter().find(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: blank.clone(),
                });
            }
        }

        if self.motive_cue.verbs.is_empty() || self.motive_cue.subjects.is_empty() {
            return Err(ConfigError::MissingRequired(
                "vocabulary.motive_cue".to_string(),
            ));
        }

        for rule in self.situation_rules.iter().chain(&self.emotion_rules) {
            if rule.cues.is_empty() || rule.cues.iter().any(|c| c.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("vocabulary rule '{}'", rule.name),
                    value: format!("{:?}", rule.cues),
                });
            }
        }

        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Supported graph output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Node-link JSON for the external renderer
    #[default]
    Json,
    /// Graphviz DOT
    Dot,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "dot" => Ok(Self::Dot),
            _ => Err(ConfigError::InvalidValue {
                key: "NKG_OUTPUT_FORMAT".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Dot => write!(f, "dot"),
        }
    }
}

/// Graph output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Output file (stdout when absent)
    pub path: Option<PathBuf>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
