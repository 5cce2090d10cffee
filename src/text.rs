//! Text normalization and the lightweight text heuristics shared by the
//! candidate generators and the title selector.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Words ignored by the heading-likelihood and keyword heuristics.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "about",
    "into", "through", "during", "before", "after", "above", "below", "up", "down", "out", "off",
    "over", "under", "again", "further", "then", "once",
];

/// The short list of function words used when scoring title candidates.
pub const COMMON_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

static HEADING_SHAPES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"^\d+\.").unwrap(),
        Regex::new(r"^[A-Z][A-Z\s]*$").unwrap(),
        Regex::new(r"^[A-Z][a-z]+(\s[A-Z][a-z]+)*$").unwrap(),
        Regex::new(r"^(Chapter|Section|Part)\s+\d+").unwrap(),
    ]
});

static DOTTED_NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\.\s*(.+)$").unwrap());
static MULTI_LEVEL_NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)\s+(.+)$").unwrap());
static LETTER_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z])\.\s*(.+)$").unwrap());
static ROMAN_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([IVX]+)\.\s*(.+)$").unwrap());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F)
}

/// Normalize typographic punctuation, drop control characters and collapse
/// whitespace runs into single spaces.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized: String = text
        .nfc()
        .filter_map(|c| match c {
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{2013}' | '\u{2014}' => Some('-'),
            c if c.is_whitespace() => Some(' '),
            c if is_control(c) => None,
            c => Some(c),
        })
        .collect();

    WHITESPACE.replace_all(normalized.trim(), " ").into_owned()
}

/// True when every cased character is uppercase and there is at least one.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Title-case test: uppercase letters only start a word, lowercase letters
/// only continue one, and at least one letter is present.
pub fn is_title_case(text: &str) -> bool {
    let mut previous_cased = false;
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else {
            previous_cased = false;
        }
    }
    has_cased
}

pub fn is_likely_heading(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() < 3 {
        return false;
    }

    if HEADING_SHAPES.iter().any(|shape| shape.is_match(text)) {
        return true;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if !(2..=12).contains(&words.len()) {
        return false;
    }

    if text.ends_with(['.', '!', '?']) {
        return false;
    }

    let content_words = words
        .iter()
        .filter(|w| !is_stop_word(&w.to_lowercase()))
        .count();
    content_words as f32 >= words.len() as f32 * 0.5
}

/// Split a leading numbering marker off `text`.
///
/// Returns the nesting depth implied by the marker (`"2.3.1 "` is 3, a single
/// capital letter is 2, a roman numeral is 1) together with the remaining
/// text, or `(None, text)` when no marker is present.
pub fn extract_numbering(text: &str) -> (Option<usize>, String) {
    // `1.2 Text` before `1. Text`, or the dotted form would split "1.2" after the "1."
    if let Some(caps) = MULTI_LEVEL_NUMBERING
        .captures(text)
        .or_else(|| DOTTED_NUMBERING.captures(text))
    {
        let depth = caps[1].split('.').count();
        return (Some(depth), caps[2].to_string());
    }

    if let Some(caps) = LETTER_NUMBERING.captures(text) {
        return (Some(2), caps[2].to_string());
    }

    if let Some(caps) = ROMAN_NUMBERING.captures(text) {
        return (Some(1), caps[2].to_string());
    }

    (None, text.to_string())
}

pub fn split_into_sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > 3)
        .map(String::from)
        .collect()
}

/// Most frequent non-stop-words of three or more letters, ties broken by
/// first occurrence.
pub fn extract_keywords(text: &str, top_k: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut frequencies: IndexMap<&str, usize> = IndexMap::new();
    for word in KEYWORD.find_iter(&lowered).map(|m| m.as_str()) {
        if !is_stop_word(word) {
            *frequencies.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = frequencies.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Rough readability measure mixing word length and sentence length.
pub fn text_complexity(text: &str) -> f32 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let avg_word_length =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / words.len() as f32;
    let sentences = SENTENCE_END.split(text).count().max(1);
    let words_per_sentence = words.len() as f32 / sentences as f32;

    avg_word_length * 0.5 + words_per_sentence * 0.3
}
