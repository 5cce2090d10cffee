use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::{null_as_default, TextDict};
use crate::logging::OUTLINE_INPUT;

/// One decoded page: the span tree (when the decoder produced one) and the
/// page's plain text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageContent {
    #[serde(deserialize_with = "null_as_default")]
    pub page_num: u32,
    pub text_dict: Option<TextDict>,
    #[serde(deserialize_with = "null_as_default")]
    pub plain_text: String,
}

impl PageContent {
    pub fn new(page_num: u32, text_dict: Option<TextDict>, plain_text: impl Into<String>) -> Self {
        Self {
            page_num,
            text_dict,
            plain_text: plain_text.into(),
        }
    }
}

/// Document-level metadata reported by the decoder. Only `title` is read;
/// every other key is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentInput {
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,
    #[serde(deserialize_with = "null_as_default")]
    pub pages: Vec<PageContent>,
}

impl DocumentInput {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid document JSON")
    }
}

/// Load a decoded document from a JSON file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<DocumentInput> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = DocumentInput::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    debug!(
        target: OUTLINE_INPUT,
        path = %path.display(),
        pages = document.pages.len(),
        "Loaded document"
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_fall_back_to_empty() {
        let doc = DocumentInput::from_json(
            r#"{"pages": [{"page_num": 1}, {"page_num": 2, "plain_text": "x", "text_dict": {}}]}"#,
        )
        .unwrap();

        assert_eq!(doc.metadata.title, None);
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[0].text_dict.is_none());
        assert_eq!(doc.pages[0].plain_text, "");
        assert!(doc.pages[1].text_dict.as_ref().unwrap().blocks.is_empty());
    }

    #[test]
    fn null_scalars_fall_back_to_defaults() {
        let doc = DocumentInput::from_json(
            r#"{"pages": [{"page_num": null, "plain_text": null, "text_dict": {"blocks": [{"lines": [{"spans": [{"text": null, "size": 12.0}]}]}]}}]}"#,
        )
        .unwrap();

        let page = &doc.pages[0];
        assert_eq!(page.page_num, 0);
        assert_eq!(page.plain_text, "");
        let span = page.text_dict.as_ref().unwrap().spans().next().unwrap();
        assert_eq!(span.text, "");
        assert_eq!(span.size, 12.0);
    }

    #[test]
    fn metadata_keeps_unknown_keys() {
        let doc = DocumentInput::from_json(
            r#"{"metadata": {"title": "Annual Report", "author": "ACME"}, "pages": []}"#,
        )
        .unwrap();

        assert_eq!(doc.metadata.title.as_deref(), Some("Annual Report"));
        assert_eq!(
            doc.metadata.extra.get("author"),
            Some(&serde_json::Value::String("ACME".to_string()))
        );
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(DocumentInput::from_json("{not json").is_err());
    }

    #[test]
    fn load_document_missing_file() {
        assert!(load_document("nonexistent.json").is_err());
    }
}
