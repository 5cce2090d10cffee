use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::config::ExtractorConfig;
use crate::matcher::HeadingPattern;

/// Which signal proposed a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    FontAnalysis,
    PatternMatching,
}

/// A line that may be a heading, before level assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub confidence: f32,
    pub font_size: Option<f32>,
    pub method: DetectionMethod,
    /// Structural pattern that produced a pattern-matching candidate
    pub pattern: Option<HeadingPattern>,
    /// Page the candidate was found on; 0 until tagged
    pub page: u32,
}

impl Candidate {
    pub fn from_font(text: impl Into<String>, confidence: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            font_size: Some(font_size),
            method: DetectionMethod::FontAnalysis,
            pattern: None,
            page: 0,
        }
    }

    pub fn from_pattern(text: impl Into<String>, confidence: f32, pattern: HeadingPattern) -> Self {
        Self {
            text: text.into(),
            confidence,
            font_size: None,
            method: DetectionMethod::PatternMatching,
            pattern: Some(pattern),
            page: 0,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Key under which two candidates count as the same heading.
    pub fn dedup_key(&self) -> String {
        self.text.to_lowercase().trim().to_string()
    }
}

/// Collapse a page's candidates to one per distinct text, keeping the most
/// confident. Candidates outside the configured length bounds are dropped.
///
/// The sort is stable, so among equally confident duplicates the one seen
/// first wins.
pub fn deduplicate_candidates(
    mut candidates: Vec<Candidate>,
    config: &ExtractorConfig,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut seen_texts = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.dedup_key();
        if seen_texts.contains(&key) {
            continue;
        }

        let len = key.chars().count();
        if len < config.min_candidate_len || len > config.max_candidate_len {
            continue;
        }

        seen_texts.insert(key);
        unique.push(candidate);
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn keeps_most_confident_duplicate() {
        let candidates = vec![
            Candidate::from_font("Overview", 1.3, 14.0),
            Candidate::from_pattern("OVERVIEW", 1.5, HeadingPattern::AllCaps),
            Candidate::from_font("overview", 2.0, 18.0),
        ];

        let unique = deduplicate_candidates(candidates, &ExtractorConfig::default());

        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].text, "overview");
        assert_eq!(unique[0].confidence, 2.0);
    }

    #[test]
    fn equal_confidence_keeps_first_seen() {
        let candidates = vec![
            Candidate::from_font("Scope", 1.5, 14.0),
            Candidate::from_pattern("SCOPE", 1.5, HeadingPattern::AllCaps),
        ];

        let unique = deduplicate_candidates(candidates, &ExtractorConfig::default());

        assert_eq!(texts(&unique), vec!["Scope"]);
        assert_eq!(unique[0].method, DetectionMethod::FontAnalysis);
    }

    #[test]
    fn output_is_confidence_ranked() {
        let candidates = vec![
            Candidate::from_font("Low", 1.2, 14.0),
            Candidate::from_font("High", 3.0, 24.0),
            Candidate::from_pattern("Middle", 1.5, HeadingPattern::NumberedSingle),
        ];

        let unique = deduplicate_candidates(candidates, &ExtractorConfig::default());

        assert_eq!(texts(&unique), vec!["High", "Middle", "Low"]);
    }

    #[test]
    fn length_boundaries() {
        let at_max = "a".repeat(200);
        let over_max = "b".repeat(201);
        let candidates = vec![
            Candidate::from_font("abc", 1.5, 14.0),
            Candidate::from_font("ab", 1.5, 14.0),
            Candidate::from_font(at_max.clone(), 1.5, 14.0),
            Candidate::from_font(over_max, 1.5, 14.0),
        ];

        let unique = deduplicate_candidates(candidates, &ExtractorConfig::default());

        assert_eq!(texts(&unique), vec!["abc", at_max.as_str()]);
    }

    #[test]
    fn empty_input() {
        assert!(deduplicate_candidates(Vec::new(), &ExtractorConfig::default()).is_empty());
    }
}
