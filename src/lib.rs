pub mod candidate;
pub mod config;
pub mod fonts;
pub mod hierarchy;
pub mod layout;
pub mod logging;
pub mod matcher;
pub mod outline;
pub mod parse;
pub mod text;
pub mod title;

use anyhow::Result;

use crate::config::ExtractorConfig;
use crate::outline::{DocumentOutline, OutlineExtractor};
use crate::parse::DocumentInput;

/// Extract the title and outline of a decoded document with the default
/// configuration.
pub fn extract_outline(document: &DocumentInput) -> DocumentOutline {
    OutlineExtractor::default().extract(document)
}

/// Process a decoded document given as JSON and return its outline as JSON
///
/// # Arguments
/// * `document_json` - The decoder output for one document
/// * `config` - Heuristic thresholds
/// * `pretty` - Pretty-print the result
pub fn process_document(document_json: &str, config: &ExtractorConfig, pretty: bool) -> Result<String> {
    let document = DocumentInput::from_json(document_json)?;
    let outline = OutlineExtractor::new(config.clone()).extract(&document);

    let json = if pretty {
        serde_json::to_string_pretty(&outline)?
    } else {
        serde_json::to_string(&outline)?
    };
    Ok(json)
}
