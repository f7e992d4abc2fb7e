//! Page enhancement: the in-page table of contents, scroll highlighting and
//! chapter labels on the previous/next controls.
//!
//! Everything here works on any [`DocumentTree`]. Missing page structure is
//! never an error: each step reports what it did and leaves the tree alone
//! when its anchors are absent.

pub mod anchor;
pub mod toc;
pub mod highlight;
pub mod nav_labels;
pub mod retry;
pub mod session;

pub use anchor::derive_id;
pub use highlight::ScrollHighlighter;
pub use nav_labels::{LabelOutcome, NavLabeler};
pub use retry::{drive, MountStatus, RetryPolicy};
pub use session::PageSession;
pub use toc::{TocBuilder, TocEntry, TocOutcome};

use serde::Serialize;

use crate::config::{Config, ScrollMetrics};
use crate::dom::DocumentTree;
use crate::utils::error::PagetocError;

/// Summary of the startup pass over one page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageReport {
    /// Whether a TOC container was inserted
    pub toc_inserted: bool,
    pub entries: usize,
    pub generated_ids: usize,
    /// Fragment of the link marked active by the startup highlight, if any
    pub active: Option<String>,
}

/// All page enhancements, compiled from a [`Config`]
#[derive(Debug, Clone)]
pub struct Enhancer {
    toc: TocBuilder,
    highlighter: ScrollHighlighter,
    labeler: NavLabeler,
    retry: RetryPolicy,
}

impl Enhancer {
    pub fn new(config: &Config) -> Result<Self, PagetocError> {
        let toc = TocBuilder::new(&config.selectors, &config.toc)?;
        let highlighter = ScrollHighlighter::new(toc.links_selector()?, &config.highlight);
        Ok(Self {
            toc,
            highlighter,
            labeler: NavLabeler::new(&config.selectors, &config.navigation)?,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build the TOC and, when metrics are given, run the startup highlight.
    ///
    /// Navigation labels are not part of this pass: the controls may not
    /// exist yet, so callers schedule [`Enhancer::label_navigation`] with
    /// [`drive`] and the configured [`RetryPolicy`].
    pub fn enhance_page<T: DocumentTree>(&self, tree: &mut T, metrics: Option<&ScrollMetrics>) -> PageReport {
        let mut report = PageReport::default();
        if let Some(outcome) = self.build_toc(tree) {
            report.toc_inserted = true;
            report.entries = outcome.entries.len();
            report.generated_ids = outcome.generated_ids;
        }
        if let Some(metrics) = metrics {
            report.active = self
                .highlight(tree, metrics)
                .and_then(|link| tree.attribute(link, "href"))
                .map(|href| href.trim_start_matches('#').to_string());
        }
        report
    }

    pub fn build_toc<T: DocumentTree>(&self, tree: &mut T) -> Option<TocOutcome<T::Node>> {
        self.toc.build(tree)
    }

    pub fn highlight<T: DocumentTree>(&self, tree: &mut T, metrics: &ScrollMetrics) -> Option<T::Node> {
        self.highlighter.highlight(tree, metrics)
    }

    pub fn label_navigation<T: DocumentTree>(&self, tree: &mut T) -> LabelOutcome {
        self.labeler.label(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VDom;

    const PAGE: &str = "<!DOCTYPE html><html><body>\
        <nav class=\"sidebar\"><a href=\"one.html\">One</a><a href=\"three.html\">Three</a></nav>\
        <div class=\"content\"><main>\
        <h1 data-offset-top=\"0\">Two</h1>\
        <h2 data-offset-top=\"400\">Getting Started!</h2>\
        <h2 data-offset-top=\"900\">Details</h2>\
        </main>\
        <nav class=\"nav-wrapper\"><a rel=\"prev\" href=\"one.html\">←</a><a rel=\"next\" href=\"three.html\">→</a></nav>\
        </div></body></html>";

    #[test]
    fn test_enhance_page_report() {
        let enhancer = Enhancer::new(&Config::default()).unwrap();
        let mut dom = VDom::parse(PAGE).unwrap();
        let metrics = ScrollMetrics::new(350.0, 300.0, 3000.0);
        let report = enhancer.enhance_page(&mut dom, Some(&metrics));

        assert_eq!(
            report,
            PageReport {
                toc_inserted: true,
                entries: 3,
                generated_ids: 3,
                active: Some("getting-started".to_string()),
            }
        );
    }

    #[test]
    fn test_enhance_page_without_metrics_skips_highlight() {
        let enhancer = Enhancer::new(&Config::default()).unwrap();
        let mut dom = VDom::parse(PAGE).unwrap();
        let report = enhancer.enhance_page(&mut dom, None);
        assert!(report.active.is_none());
        assert!(!dom.to_html().contains("class=\"active\""));
    }

    #[test]
    fn test_bare_document_is_untouched() {
        let enhancer = Enhancer::new(&Config::default()).unwrap();
        let html = "<html><body><p>Nothing to see</p></body></html>";
        let mut dom = VDom::parse(html).unwrap();

        let report = enhancer.enhance_page(&mut dom, Some(&ScrollMetrics::new(0.0, 100.0, 100.0)));
        assert_eq!(report, PageReport::default());
        assert_eq!(enhancer.label_navigation(&mut dom), LabelOutcome::MountMissing);
        assert_eq!(dom.to_html(), html);
    }

    #[tokio::test(start_paused = true)]
    async fn test_labels_through_retry_policy() {
        let enhancer = Enhancer::new(&Config::default()).unwrap();
        let mut dom = VDom::parse(PAGE).unwrap();
        enhancer.enhance_page(&mut dom, None);

        let outcomes = drive(enhancer.retry_policy(), || enhancer.label_navigation(&mut dom)).await;
        assert_eq!(
            outcomes,
            vec![
                LabelOutcome::Processed { labeled: 2, unmatched: 0, skipped: 0 },
                LabelOutcome::Processed { labeled: 0, unmatched: 0, skipped: 2 },
                LabelOutcome::Processed { labeled: 0, unmatched: 0, skipped: 2 },
            ]
        );
        assert_eq!(dom.to_html().matches("chapter-name").count(), 2);
    }
}
