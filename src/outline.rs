use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::candidate::{deduplicate_candidates, Candidate};
use crate::config::ExtractorConfig;
use crate::fonts::{font_candidates, font_hierarchy, FontDistribution};
use crate::hierarchy::{HierarchyAssigner, Heading};
use crate::logging::OUTLINE_HIERARCHY;
use crate::matcher::pattern_candidates;
use crate::parse::{DocumentInput, DocumentMetadata, PageContent};
use crate::title::select_title;

/// Title and leveled headings of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<Heading>,
}

/// Runs the heading and title heuristics over decoded documents.
///
/// Holds only configuration, so one extractor can serve any number of
/// documents, including concurrently.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    config: ExtractorConfig,
}

impl OutlineExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Unique, confidence-ranked candidates of one page, tagged with its
    /// page number.
    pub fn page_candidates(&self, page: &PageContent) -> Vec<Candidate> {
        let mut candidates = font_candidates(page.text_dict.as_ref(), &self.config);
        candidates.extend(pattern_candidates(&page.plain_text, &self.config));

        let unique = deduplicate_candidates(candidates, &self.config);
        debug!(
            page = page.page_num,
            candidates = unique.len(),
            "Page candidates after deduplication"
        );

        unique
            .into_iter()
            .map(|candidate| candidate.on_page(page.page_num))
            .collect()
    }

    pub fn extract_headings(&self, pages: &[PageContent]) -> Vec<Heading> {
        let mut pool = Vec::new();
        for page in pages {
            let stats = FontDistribution::from_text_dict(page.text_dict.as_ref());
            debug!(
                target: OUTLINE_HIERARCHY,
                page = page.page_num,
                avg_size = stats.avg_size,
                size_ranks = ?font_hierarchy(&stats.sizes),
                "Page font sizes"
            );
            pool.extend(self.page_candidates(page));
        }

        let headings = HierarchyAssigner::new(self.config.default_font_size).assign(&pool);
        info!(headings = headings.len(), "Extracted headings");
        headings
    }

    pub fn extract_title(&self, metadata: &DocumentMetadata, pages: &[PageContent]) -> String {
        select_title(metadata, pages, &self.config.fallback_title).title
    }

    pub fn extract(&self, document: &DocumentInput) -> DocumentOutline {
        let span = info_span!("extract_outline", pages = document.pages.len());
        let _enter = span.enter();

        DocumentOutline {
            title: self.extract_title(&document.metadata, &document.pages),
            outline: self.extract_headings(&document.pages),
        }
    }
}
