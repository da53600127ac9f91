use serde::Deserialize;

use crate::error::ConcordError;

pub const DEFAULT_ID_COLUMN: &str = "Path";
pub const DEFAULT_HIGH_CONFIDENCE: &str = "high";
pub const DEFAULT_OUTPUT: &str = "combined.tsv";

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Everything the pipeline stages need, passed explicitly to each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    pub id_column: String,
    pub suffix1: String,
    pub suffix2: String,
    /// Placed between a colliding column name and its suffix.
    pub suffix_delimiter: String,
    /// Confidence value that counts as "high".
    pub high_confidence: String,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.into(),
            suffix1: "1".into(),
            suffix2: "2".into(),
            suffix_delimiter: " ".into(),
            high_confidence: DEFAULT_HIGH_CONFIDENCE.into(),
        }
    }
}

impl CompareOptions {
    pub fn suffixed(&self, column: &str, suffix: &str) -> String {
        format!("{column}{}{suffix}", self.suffix_delimiter)
    }

    pub fn validate(&self) -> Result<(), ConcordError> {
        if self.id_column.is_empty() {
            return Err(ConcordError::ConfigValidation(
                "identifier column name must not be empty".into(),
            ));
        }
        if self.suffix1.is_empty() || self.suffix2.is_empty() {
            return Err(ConcordError::ConfigValidation("suffixes must not be empty".into()));
        }
        if self.suffix1 == self.suffix2 {
            return Err(ConcordError::ConfigValidation(format!(
                "suffix1 and suffix2 must differ, both are '{}'",
                self.suffix1
            )));
        }
        if self.high_confidence.is_empty() {
            return Err(ConcordError::ConfigValidation(
                "high confidence marker must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Optional `concord.toml`. Every key falls back to the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub identifier_column: Option<String>,
    #[serde(default)]
    pub suffix1: Option<String>,
    #[serde(default)]
    pub suffix2: Option<String>,
    #[serde(default)]
    pub suffix_delimiter: Option<String>,
    #[serde(default)]
    pub high_confidence: Option<String>,
    /// Output table path (.tsv or .xlsx).
    #[serde(default)]
    pub output: Option<String>,
    /// Form schema JSON path or URL.
    #[serde(default)]
    pub schema: Option<String>,
}

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConcordError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ConcordError::ConfigParse(e.to_string()))?;
        config.options().validate()?;
        Ok(config)
    }

    /// Engine options with defaults filled in.
    pub fn options(&self) -> CompareOptions {
        let defaults = CompareOptions::default();
        CompareOptions {
            id_column: self.identifier_column.clone().unwrap_or(defaults.id_column),
            suffix1: self.suffix1.clone().unwrap_or(defaults.suffix1),
            suffix2: self.suffix2.clone().unwrap_or(defaults.suffix2),
            suffix_delimiter: self.suffix_delimiter.clone().unwrap_or(defaults.suffix_delimiter),
            high_confidence: self.high_confidence.clone().unwrap_or(defaults.high_confidence),
        }
    }

    pub fn output_path(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
