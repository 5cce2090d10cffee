use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::candidate::Candidate;
use crate::logging::OUTLINE_HIERARCHY;
use crate::matcher::HeadingPattern;

static THREE_LEVEL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\s+").unwrap());
static TWO_LEVEL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\s+").unwrap());
static ONE_LEVEL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// One tier deeper, saturating at H3.
    pub fn demoted(self) -> Self {
        match self {
            HeadingLevel::H1 => HeadingLevel::H2,
            HeadingLevel::H2 | HeadingLevel::H3 => HeadingLevel::H3,
        }
    }

    /// Level forced by an explicit decimal numbering prefix such as `"2.1 "`.
    pub fn from_numbering(text: &str) -> Option<Self> {
        if THREE_LEVEL_PREFIX.is_match(text) {
            Some(HeadingLevel::H3)
        } else if TWO_LEVEL_PREFIX.is_match(text) {
            Some(HeadingLevel::H2)
        } else if ONE_LEVEL_PREFIX.is_match(text) {
            Some(HeadingLevel::H1)
        } else {
            None
        }
    }

    /// Level implied by the numbering pattern a candidate was matched with.
    pub fn from_pattern(pattern: HeadingPattern) -> Option<Self> {
        match pattern {
            HeadingPattern::NumberedThreeLevel => Some(HeadingLevel::H3),
            HeadingPattern::NumberedTwoLevel => Some(HeadingLevel::H2),
            HeadingPattern::NumberedSingle => Some(HeadingLevel::H1),
            _ => None,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        };
        f.write_str(name)
    }
}

/// A leveled entry of the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Font size to level bindings accumulated while one document is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontLevelMap {
    bindings: BTreeMap<OrderedFloat<f32>, HeadingLevel>,
}

impl FontLevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, font_size: f32) -> Option<HeadingLevel> {
        self.bindings.get(&OrderedFloat(font_size)).copied()
    }

    pub fn bind(&mut self, font_size: f32, level: HeadingLevel) {
        self.bindings.insert(OrderedFloat(font_size), level);
    }

    pub fn max_size(&self) -> Option<f32> {
        self.bindings.keys().next_back().map(|size| size.0)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Push every binding one tier down.
    pub fn demote_all(&mut self) {
        for level in self.bindings.values_mut() {
            *level = level.demoted();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (f32, HeadingLevel)> + '_ {
        self.bindings.iter().map(|(size, level)| (size.0, *level))
    }
}

/// Assigns H1–H3 levels to the pooled candidates of one document.
///
/// Owns the document's `FontLevelMap`; create one assigner per document.
#[derive(Debug)]
pub struct HierarchyAssigner {
    font_levels: FontLevelMap,
    default_font_size: f32,
}

impl HierarchyAssigner {
    pub fn new(default_font_size: f32) -> Self {
        Self {
            font_levels: FontLevelMap::new(),
            default_font_size,
        }
    }

    pub fn font_levels(&self) -> &FontLevelMap {
        &self.font_levels
    }

    /// Level for one candidate, binding its font size when the size is new.
    pub fn determine_level(
        &mut self,
        text: &str,
        font_size: f32,
        pattern: Option<HeadingPattern>,
    ) -> HeadingLevel {
        if let Some(level) =
            HeadingLevel::from_numbering(text).or_else(|| pattern.and_then(HeadingLevel::from_pattern))
        {
            return level;
        }

        if let Some(level) = self.font_levels.get(font_size) {
            return level;
        }

        let level = match self.font_levels.max_size() {
            None => HeadingLevel::H1,
            Some(max_size) if font_size > max_size => {
                trace!(
                    target: OUTLINE_HIERARCHY,
                    font_size,
                    previous_max = max_size,
                    "Promoting new largest size to H1"
                );
                self.font_levels.demote_all();
                HeadingLevel::H1
            }
            Some(max_size) if font_size >= max_size => HeadingLevel::H1,
            Some(_) if self.font_levels.len() == 1 => HeadingLevel::H2,
            Some(_) => HeadingLevel::H3,
        };

        self.font_levels.bind(font_size, level);
        level
    }

    /// Level every candidate and return the outline ordered by page.
    ///
    /// Candidates are visited by descending confidence, then descending font
    /// size, so the strongest candidates claim H1 first. The final page sort
    /// is stable: headings on the same page keep that visiting order.
    pub fn assign(mut self, candidates: &[Candidate]) -> Vec<Heading> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<&Candidate> = candidates.iter().collect();
        ordered.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    let a_size = a.font_size.unwrap_or(0.0);
                    let b_size = b.font_size.unwrap_or(0.0);
                    b_size.partial_cmp(&a_size).unwrap_or(Ordering::Equal)
                })
        });

        let mut headings = Vec::with_capacity(ordered.len());
        for candidate in ordered {
            let font_size = candidate.font_size.unwrap_or(self.default_font_size);
            let level = self.determine_level(&candidate.text, font_size, candidate.pattern);
            trace!(
                target: OUTLINE_HIERARCHY,
                text = %candidate.text,
                font_size,
                %level,
                "Assigned level"
            );
            headings.push(Heading {
                level,
                text: candidate.text.clone(),
                page: candidate.page,
            });
        }

        headings.sort_by_key(|heading| heading.page);
        headings
    }
}

/// Level a document's candidate pool with a fresh font map.
pub fn assign_levels(candidates: &[Candidate], default_font_size: f32) -> Vec<Heading> {
    HierarchyAssigner::new(default_font_size).assign(candidates)
}
