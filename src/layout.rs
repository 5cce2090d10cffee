use serde::{Deserialize, Deserializer, Serialize};

/// Bit set in `Span::flags` when the decoder reports a bold font.
pub const BOLD_FLAG: u32 = 1 << 4;

/// Reads an explicit `null` the same way as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A run of text sharing one font, size and flag set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Span {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: f32,
    #[serde(deserialize_with = "null_as_default")]
    pub flags: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub font: String,
}

impl Span {
    pub fn new(text: impl Into<String>, size: f32, flags: u32) -> Self {
        Self {
            text: text.into(),
            size,
            flags,
            font: String::new(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.flags & BOLD_FLAG != 0
    }
}

/// Represents a single line of text as a sequence of spans.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Line {
    #[serde(deserialize_with = "null_as_default")]
    pub spans: Vec<Span>,
}

impl Line {
    pub fn from_spans(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Concatenated span text, untrimmed.
    pub fn text(&self) -> String {
        let mut combined_text = String::new();
        for span in &self.spans {
            combined_text.push_str(&span.text);
        }
        combined_text
    }

    /// Largest span size on the line, 0 for a line without spans.
    pub fn max_size(&self) -> f32 {
        self.spans.iter().fold(0.0, |acc, span| acc.max(span.size))
    }

    /// Bitwise OR of every span's flags.
    pub fn combined_flags(&self) -> u32 {
        self.spans.iter().fold(0, |acc, span| acc | span.flags)
    }
}

/// A group of consecutive lines as produced by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Block {
    #[serde(deserialize_with = "null_as_default")]
    pub lines: Vec<Line>,
}

impl Block {
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// The span tree of one page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextDict {
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: Vec<Block>,
}

impl TextDict {
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|block| block.lines.iter())
    }

    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines().flat_map(|line| line.spans.iter())
    }
}
