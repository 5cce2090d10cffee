use std::collections::HashSet;

use tracing::{debug, info};

use crate::layout::{Span, BOLD_FLAG};
use crate::logging::OUTLINE_TITLE;
use crate::parse::{DocumentMetadata, PageContent};
use crate::text::{clean_text, is_all_uppercase, is_title_case, COMMON_WORDS};

/// Substrings that rule a span out as a title.
const EXCLUDED_TITLE_WORDS: &[&str] = &["page", "abstract", "introduction", "contents", "index"];

const MIN_METADATA_TITLE_LEN: usize = 3;
const MIN_SPAN_TITLE_LEN: usize = 5;

/// Where the chosen title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    Metadata,
    FirstPage,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleSelection {
    pub title: String,
    pub source: TitleSource,
}

/// Layout score of a first-page span as a title. Non-positive scores never
/// become the title.
pub fn title_score(text: &str, font_size: f32, font_flags: u32) -> f32 {
    let mut score = 0.0;

    if font_size > 16.0 {
        score += 3.0;
    } else if font_size > 12.0 {
        score += 2.0;
    } else if font_size > 10.0 {
        score += 1.0;
    }

    if font_flags & BOLD_FLAG != 0 {
        score += 2.0;
    }

    let word_count = text.split_whitespace().count();
    if (3..=10).contains(&word_count) {
        score += 1.0;
    } else if word_count > 15 {
        score -= 1.0;
    }

    if is_all_uppercase(text) {
        score += 1.0;
    } else if is_title_case(text) {
        score += 0.5;
    }

    let lowered = text.to_lowercase();
    let distinct_words: HashSet<&str> = lowered.split_whitespace().collect();
    let common = distinct_words
        .iter()
        .filter(|word| COMMON_WORDS.contains(word))
        .count();
    if common as f32 > distinct_words.len() as f32 * 0.5 {
        score -= 0.5;
    }

    score
}

fn is_title_eligible(text: &str) -> bool {
    if text.chars().count() < MIN_SPAN_TITLE_LEN {
        return false;
    }
    let lowered = text.to_lowercase();
    !EXCLUDED_TITLE_WORDS
        .iter()
        .any(|word| lowered.contains(word))
}

/// Best-scoring span of the page, the earliest one on ties.
pub fn title_from_page(page: &PageContent) -> Option<String> {
    let text_dict = page.text_dict.as_ref()?;

    let mut best: Option<(String, f32)> = None;
    for span in text_dict.spans() {
        let Some((text, score)) = score_span(span) else {
            continue;
        };
        if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
            best = Some((text, score));
        }
    }

    best.map(|(text, _)| text)
}

fn score_span(span: &Span) -> Option<(String, f32)> {
    let text = clean_text(&span.text);
    if !is_title_eligible(&text) {
        return None;
    }

    let score = title_score(&text, span.size, span.flags);
    debug!(target: OUTLINE_TITLE, %text, score, "Scored title candidate");
    (score > 0.0).then_some((text, score))
}

/// Choose the document title: the metadata title when it is long enough,
/// else the best first-page span, else `fallback`.
pub fn select_title(
    metadata: &DocumentMetadata,
    pages: &[PageContent],
    fallback: &str,
) -> TitleSelection {
    if let Some(title) = metadata.title.as_deref().map(str::trim) {
        if title.chars().count() > MIN_METADATA_TITLE_LEN {
            info!(target: OUTLINE_TITLE, %title, "Title from metadata");
            return TitleSelection {
                title: title.to_string(),
                source: TitleSource::Metadata,
            };
        }
    }

    if let Some(title) = pages.first().and_then(title_from_page) {
        info!(target: OUTLINE_TITLE, %title, "Title from first page");
        return TitleSelection {
            title,
            source: TitleSource::FirstPage,
        };
    }

    info!(target: OUTLINE_TITLE, "Using fallback title");
    TitleSelection {
        title: fallback.to_string(),
        source: TitleSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Block, Line, TextDict};
    use pretty_assertions::assert_eq;

    fn first_page(spans: Vec<Span>) -> PageContent {
        let lines = spans.into_iter().map(|s| Line::from_spans(vec![s])).collect();
        PageContent::new(
            1,
            Some(TextDict::from_blocks(vec![Block::from_lines(lines)])),
            "",
        )
    }

    #[test]
    fn score_components() {
        // size > 16, bold, 4 words, title case
        assert_eq!(title_score("Annual Financial Report Summary", 20.0, BOLD_FLAG), 6.5);
        // size in (10, 12], uppercase, 2 words
        assert_eq!(title_score("QUARTERLY UPDATE", 11.0, 0), 2.0);
        // 16 words, lowercase, small
        let long = "one two three four five six seven eight nine ten eleven twelve a b c d";
        assert_eq!(title_score(long, 9.0, 0), -1.0);
        // mostly function words
        assert_eq!(title_score("of the and more", 9.0, 0), 0.5);
    }

    #[test]
    fn metadata_title_wins() {
        let page = first_page(vec![Span::new("Huge Bold Layout Title", 30.0, BOLD_FLAG)]);
        let selection = select_title(
            &DocumentMetadata::with_title("  Metadata Title  "),
            &[page],
            "Document Title",
        );
        assert_eq!(selection.title, "Metadata Title");
        assert_eq!(selection.source, TitleSource::Metadata);
    }

    #[test]
    fn short_metadata_title_is_ignored() {
        let page = first_page(vec![Span::new("Market Research Findings", 20.0, BOLD_FLAG)]);
        let selection = select_title(&DocumentMetadata::with_title("abc"), &[page], "Document Title");
        assert_eq!(selection.title, "Market Research Findings");
        assert_eq!(selection.source, TitleSource::FirstPage);
    }

    #[test]
    fn excluded_and_short_spans_are_skipped() {
        let page = first_page(vec![
            Span::new("Page 1 of 10 Pages", 24.0, BOLD_FLAG),
            Span::new("Table of Contents", 24.0, BOLD_FLAG),
            Span::new("Tiny", 30.0, BOLD_FLAG),
            Span::new("Project Plan Draft", 13.0, 0),
        ]);
        assert_eq!(title_from_page(&page).as_deref(), Some("Project Plan Draft"));
    }

    #[test]
    fn ties_keep_first_span() {
        let page = first_page(vec![
            Span::new("First Equal Title", 14.0, 0),
            Span::new("Second Equal Title", 14.0, 0),
        ]);
        assert_eq!(title_from_page(&page).as_deref(), Some("First Equal Title"));
    }

    #[test]
    fn falls_back_without_candidates() {
        let selection = select_title(&DocumentMetadata::default(), &[], "Document Title");
        assert_eq!(selection.title, "Document Title");
        assert_eq!(selection.source, TitleSource::Fallback);

        let bare = PageContent::new(1, None, "Some plain text");
        let selection = select_title(&DocumentMetadata::default(), &[bare], "Untitled");
        assert_eq!(selection.title, "Untitled");
    }

    #[test]
    fn non_positive_scores_never_win() {
        let page = first_page(vec![Span::new("small lowercase words here and there more", 8.0, 0)]);
        // 7 words: +1, no size or style bonus
        assert_eq!(title_from_page(&page).as_deref(), Some("small lowercase words here and there more"));

        // two lowercase words at body size score exactly 0
        let page = first_page(vec![Span::new("small print", 8.0, 0)]);
        assert_eq!(title_from_page(&page), None);
    }
}
