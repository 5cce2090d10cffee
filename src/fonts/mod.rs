//! Font-size statistics for a page and the font-based heading signal.
//!
//! Sizes are compared against the page average: a line noticeably larger
//! than the body text, or set in bold, is proposed as a heading.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::candidate::Candidate;
use crate::config::ExtractorConfig;
use crate::layout::{TextDict, BOLD_FLAG};
use crate::logging::OUTLINE_FONTS;
use crate::text::clean_text;

/// Average reported for pages without any span.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Size ratio over the page average from which a font looks like a heading.
pub const HEADING_SIZE_RATIO: f32 = 1.2;

/// Per-page span statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDistribution {
    pub sizes: Vec<f32>,
    pub names: Vec<String>,
    pub flags: Vec<u32>,
    pub avg_size: f32,
    pub max_size: f32,
    pub min_size: f32,
}

impl FontDistribution {
    /// Collect every span of the page. An absent span tree yields the empty
    /// distribution with the default size for avg/max/min.
    pub fn from_text_dict(text_dict: Option<&TextDict>) -> Self {
        let mut sizes = Vec::new();
        let mut names = Vec::new();
        let mut flags = Vec::new();

        for span in text_dict.into_iter().flat_map(|dict| dict.spans()) {
            sizes.push(span.size);
            names.push(span.font.clone());
            flags.push(span.flags);
        }

        if sizes.is_empty() {
            return Self {
                sizes,
                names,
                flags,
                avg_size: DEFAULT_FONT_SIZE,
                max_size: DEFAULT_FONT_SIZE,
                min_size: DEFAULT_FONT_SIZE,
            };
        }

        let avg_size = sizes.iter().sum::<f32>() / sizes.len() as f32;
        let max_size = sizes.iter().copied().fold(f32::MIN, f32::max);
        let min_size = sizes.iter().copied().fold(f32::MAX, f32::min);

        Self {
            sizes,
            names,
            flags,
            avg_size,
            max_size,
            min_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// True when `font_size` is at least `threshold` times the average, or the
/// flags carry the bold bit.
pub fn is_heading_font(font_size: f32, font_flags: u32, avg_size: f32, threshold: f32) -> bool {
    let size_ratio = if avg_size > 0.0 {
        font_size / avg_size
    } else {
        1.0
    };
    size_ratio >= threshold || font_flags & BOLD_FLAG != 0
}

/// Rank the three largest distinct sizes 1, 2 and 3, largest first.
pub fn font_hierarchy(font_sizes: &[f32]) -> IndexMap<OrderedFloat<f32>, usize> {
    let mut unique: Vec<OrderedFloat<f32>> = font_sizes.iter().copied().map(OrderedFloat).collect();
    unique.sort_by(|a, b| b.cmp(a));
    unique.dedup();

    unique
        .into_iter()
        .take(3)
        .enumerate()
        .map(|(rank, size)| (size, rank + 1))
        .collect()
}

/// Propose every line whose size stands out from the page average.
///
/// The average only counts spans with a positive size; a page without such
/// spans produces no font candidates.
pub fn font_candidates(text_dict: Option<&TextDict>, config: &ExtractorConfig) -> Vec<Candidate> {
    let Some(text_dict) = text_dict else {
        return Vec::new();
    };

    let positive_sizes: Vec<f32> = text_dict
        .spans()
        .map(|span| span.size)
        .filter(|&size| size > 0.0)
        .collect();
    if positive_sizes.is_empty() {
        return Vec::new();
    }
    let avg_size = positive_sizes.iter().sum::<f32>() / positive_sizes.len() as f32;

    let mut candidates = Vec::new();
    for line in text_dict.lines() {
        let line_text = clean_text(&line.text());
        if line_text.chars().count() < config.min_candidate_len {
            continue;
        }

        let line_size = line.max_size();
        let line_flags = line.combined_flags();
        let size_ratio = if avg_size > 0.0 {
            line_size / avg_size
        } else {
            1.0
        };

        if size_ratio >= config.heading_size_ratio
            || line_size >= avg_size + config.heading_size_delta
        {
            let mut confidence = size_ratio.min(config.max_font_confidence);
            if line_flags & BOLD_FLAG != 0 {
                confidence += config.bold_bonus;
            }

            trace!(
                target: OUTLINE_FONTS,
                text = %line_text,
                line_size,
                size_ratio,
                confidence,
                "Font candidate"
            );
            candidates.push(Candidate::from_font(line_text, confidence, line_size));
        }
    }

    debug!(
        target: OUTLINE_FONTS,
        avg_size,
        count = candidates.len(),
        "Font analysis produced candidates"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Block, Line, Span};
    use pretty_assertions::assert_eq;

    fn page(lines: Vec<Vec<Span>>) -> TextDict {
        TextDict::from_blocks(vec![Block::from_lines(
            lines.into_iter().map(Line::from_spans).collect(),
        )])
    }

    #[test]
    fn empty_distribution_uses_default_size() {
        let stats = FontDistribution::from_text_dict(None);
        assert!(stats.is_empty());
        assert_eq!(stats.avg_size, DEFAULT_FONT_SIZE);
        assert_eq!(stats.max_size, DEFAULT_FONT_SIZE);
        assert_eq!(stats.min_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn distribution_over_all_spans() {
        let dict = page(vec![
            vec![Span::new("Title", 18.0, BOLD_FLAG)],
            vec![Span::new("Body", 10.0, 0), Span::new("more", 8.0, 0)],
        ]);
        let stats = FontDistribution::from_text_dict(Some(&dict));

        assert_eq!(stats.sizes, vec![18.0, 10.0, 8.0]);
        assert_eq!(stats.flags, vec![BOLD_FLAG, 0, 0]);
        assert_eq!(stats.avg_size, 12.0);
        assert_eq!(stats.max_size, 18.0);
        assert_eq!(stats.min_size, 8.0);
    }

    #[test]
    fn heading_font_by_size_or_weight() {
        assert!(is_heading_font(15.0, 0, 12.0, HEADING_SIZE_RATIO));
        assert!(!is_heading_font(13.0, 0, 12.0, HEADING_SIZE_RATIO));
        assert!(is_heading_font(10.0, BOLD_FLAG, 12.0, HEADING_SIZE_RATIO));
        // A zero average counts as ratio 1.
        assert!(!is_heading_font(30.0, 0, 0.0, HEADING_SIZE_RATIO));
    }

    #[test]
    fn hierarchy_ranks_top_three_sizes() {
        let ranks = font_hierarchy(&[12.0, 18.0, 12.0, 24.0, 10.0, 14.0]);
        let ranked: Vec<(f32, usize)> = ranks.iter().map(|(s, r)| (s.0, *r)).collect();
        assert_eq!(ranked, vec![(24.0, 1), (18.0, 2), (14.0, 3)]);
        assert!(font_hierarchy(&[]).is_empty());
    }

    #[test]
    fn no_span_tree_no_candidates() {
        assert!(font_candidates(None, &ExtractorConfig::default()).is_empty());
        assert!(font_candidates(Some(&TextDict::default()), &ExtractorConfig::default()).is_empty());
    }

    #[test]
    fn lines_standing_out_become_candidates() {
        let dict = page(vec![
            vec![Span::new("Big Heading", 24.0, 0)],
            vec![Span::new("Bold ", 10.0, BOLD_FLAG), Span::new("lead", 13.0, 0)],
            vec![Span::new("Regular body text", 10.0, 0)],
            vec![Span::new("Regular body text again", 10.0, 0)],
            vec![Span::new("XY", 40.0, 0)],
        ]);
        // avg = (24 + 10 + 13 + 10 + 10 + 40) / 6 = 17.83
        let candidates = font_candidates(Some(&dict), &ExtractorConfig::default());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Big Heading");
        assert_eq!(candidates[0].font_size, Some(24.0));
    }

    #[test]
    fn confidence_is_capped_and_boosted_by_bold() {
        let dict = page(vec![
            vec![Span::new("Huge Bold Title", 100.0, BOLD_FLAG)],
            vec![Span::new("body", 10.0, 0)],
            vec![Span::new("body", 10.0, 0)],
            vec![Span::new("body", 10.0, 0)],
            vec![Span::new("body", 10.0, 0)],
        ]);
        // avg = 28, ratio 3.57 is capped at 3.0
        let candidates = font_candidates(Some(&dict), &ExtractorConfig::default());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].confidence, 3.5);
    }

    #[test]
    fn absolute_margin_qualifies_line() {
        let dict = page(vec![
            vec![Span::new("Slightly larger", 14.0, 0)],
            vec![Span::new("body", 12.0, 0)],
            vec![Span::new("body", 12.0, 0)],
            vec![Span::new("body", 12.0, 0)],
        ]);
        // avg 12.5: ratio 1.12 and 14 < 12.5 + 2
        let none = font_candidates(Some(&dict), &ExtractorConfig::default());
        assert!(none.is_empty());

        let dict = page(vec![
            vec![Span::new("Slightly larger", 40.0, 0)],
            vec![Span::new("body", 38.0, 0)],
            vec![Span::new("body", 36.0, 0)],
        ]);
        // avg 38, ratio 1.05, but 40 >= 38 + 2
        let candidates = font_candidates(Some(&dict), &ExtractorConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Slightly larger");
    }
}
