use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::candidate::Candidate;
use crate::config::ExtractorConfig;
use crate::logging::OUTLINE_PATTERNS;
use crate::text::clean_text;

/// Structural shapes of a heading line, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingPattern {
    /// `1. Text`
    NumberedSingle,
    /// `1.1 Text`
    NumberedTwoLevel,
    /// `1.1.1 Text`
    NumberedThreeLevel,
    /// A line of capitals and spaces only
    AllCaps,
    /// `IV. Text`
    RomanNumeral,
    /// `A. Text`
    CapitalLetter,
    /// `(a) Text`
    LetteredParenthetical,
    /// `• Text`
    Bullet,
    /// `- Text`
    Dash,
}

impl HeadingPattern {
    pub const ALL: [HeadingPattern; 9] = [
        HeadingPattern::NumberedSingle,
        HeadingPattern::NumberedTwoLevel,
        HeadingPattern::NumberedThreeLevel,
        HeadingPattern::AllCaps,
        HeadingPattern::RomanNumeral,
        HeadingPattern::CapitalLetter,
        HeadingPattern::LetteredParenthetical,
        HeadingPattern::Bullet,
        HeadingPattern::Dash,
    ];

    fn regex(self) -> &'static Regex {
        static NUMBERED_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());
        static NUMBERED_TWO: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\d+\.\d+\s+(.+)$").unwrap());
        static NUMBERED_THREE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\s+(.+)$").unwrap());
        static ALL_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s]+$").unwrap());
        static ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[IVX]+\.\s+(.+)$").unwrap());
        static CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\.\s+(.+)$").unwrap());
        static PARENTHETICAL: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\([a-z]\)\s+(.+)$").unwrap());
        static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\u{2022}\s+(.+)$").unwrap());
        static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+(.+)$").unwrap());

        match self {
            HeadingPattern::NumberedSingle => &*NUMBERED_SINGLE,
            HeadingPattern::NumberedTwoLevel => &*NUMBERED_TWO,
            HeadingPattern::NumberedThreeLevel => &*NUMBERED_THREE,
            HeadingPattern::AllCaps => &*ALL_CAPS,
            HeadingPattern::RomanNumeral => &*ROMAN,
            HeadingPattern::CapitalLetter => &*CAPITAL,
            HeadingPattern::LetteredParenthetical => &*PARENTHETICAL,
            HeadingPattern::Bullet => &*BULLET,
            HeadingPattern::Dash => &*DASH,
        }
    }

    /// Match a trimmed line, returning the heading text: the captured body when
    /// the pattern has one, otherwise the whole line.
    pub fn match_line(self, line: &str) -> Option<String> {
        let caps = self.regex().captures(line)?;
        let text = caps.get(1).map_or(line, |body| body.as_str());
        Some(text.trim().to_string())
    }
}

/// First pattern matching `line` together with the extracted heading text.
pub fn match_heading_line(line: &str) -> Option<(HeadingPattern, String)> {
    HeadingPattern::ALL
        .iter()
        .find_map(|&pattern| pattern.match_line(line).map(|text| (pattern, text)))
}

/// Propose a candidate for every plain-text line with a heading shape.
pub fn pattern_candidates(plain_text: &str, config: &ExtractorConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for raw_line in plain_text.split('\n') {
        let line = clean_text(raw_line);
        if line.chars().count() < config.min_candidate_len {
            continue;
        }

        let Some((pattern, text)) = match_heading_line(&line) else {
            continue;
        };
        if text.chars().count() < config.min_candidate_len {
            continue;
        }

        let mut confidence = 1.0;
        if raw_line.trim().chars().take(10).any(|c| c.is_ascii_digit()) {
            confidence += config.digit_bonus;
        }

        trace!(target: OUTLINE_PATTERNS, ?pattern, %text, confidence, "Pattern candidate");
        candidates.push(Candidate::from_pattern(text, confidence, pattern));
    }

    debug!(
        target: OUTLINE_PATTERNS,
        count = candidates.len(),
        "Pattern matching produced candidates"
    );

    candidates
}
