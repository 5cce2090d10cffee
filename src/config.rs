use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunable thresholds of the heading and title heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum line size relative to the page average for a font candidate
    pub heading_size_ratio: f32,
    /// Absolute margin over the page average that also qualifies a line
    pub heading_size_delta: f32,
    /// Cap on the size-ratio part of a font candidate's confidence
    pub max_font_confidence: f32,
    pub bold_bonus: f32,
    /// Bonus for pattern lines with a digit in their first ten characters
    pub digit_bonus: f32,
    pub min_candidate_len: usize,
    pub max_candidate_len: usize,
    /// Size used for averages of empty pages and for candidates without a size
    pub default_font_size: f32,
    pub fallback_title: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            heading_size_ratio: 1.2,
            heading_size_delta: 2.0,
            max_font_confidence: 3.0,
            bold_bonus: 0.5,
            digit_bonus: 0.5,
            min_candidate_len: 3,
            max_candidate_len: 200,
            default_font_size: 12.0,
            fallback_title: "Document Title".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid extractor configuration")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ExtractorConfig::from_json(r#"{"heading_size_ratio": 1.5}"#).unwrap();
        assert_eq!(config.heading_size_ratio, 1.5);
        assert_eq!(config.max_candidate_len, 200);
        assert_eq!(config.fallback_title, "Document Title");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ExtractorConfig::from_json(r#"{"min_candidate_len": "three"}"#).is_err());
    }
}
