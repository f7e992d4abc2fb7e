use crate::config::{HighlightConfig, ScrollMetrics};
use crate::dom::{DocumentTree, Selector};

/// Marks the TOC link of the section the reader is in
#[derive(Debug, Clone)]
pub struct ScrollHighlighter {
    links: Selector,
    config: HighlightConfig,
}

impl ScrollHighlighter {
    pub fn new(links: Selector, config: &HighlightConfig) -> Self {
        Self {
            links,
            config: config.clone(),
        }
    }

    /// Whether the viewport's bottom edge is within the bottom threshold of the document end
    pub fn is_at_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.viewport_height + metrics.scroll_y
            >= metrics.document_height - self.config.bottom_threshold
    }

    /// Pick the current TOC link without touching the tree.
    ///
    /// The last link whose target heading starts at or above
    /// `scroll_y + look_ahead` wins; at the bottom of the page the last link
    /// wins regardless.
    pub fn current_link<T: DocumentTree>(&self, tree: &T, metrics: &ScrollMetrics) -> Option<T::Node> {
        let links = tree.query_selector_all(tree.root(), &self.links);
        let from_top = metrics.scroll_y + self.config.look_ahead;

        let mut current = None;
        for link in &links {
            let Some(section) = target_of(tree, *link) else {
                continue;
            };
            if from_top >= tree.offset_top(section) {
                current = Some(*link);
            }
        }

        if self.is_at_bottom(metrics) {
            if let Some(last) = links.last() {
                current = Some(*last);
            }
        }
        current
    }

    /// Recompute the current link and move the active class onto it
    pub fn highlight<T: DocumentTree>(&self, tree: &mut T, metrics: &ScrollMetrics) -> Option<T::Node> {
        let current = self.current_link(tree, metrics);
        for link in tree.query_selector_all(tree.root(), &self.links) {
            tree.remove_class(link, &self.config.active_class);
        }
        if let Some(link) = current {
            tree.add_class(link, &self.config.active_class);
        }
        current
    }
}

/// Heading a TOC link points at, resolved through its `#fragment`
fn target_of<T: DocumentTree>(tree: &T, link: T::Node) -> Option<T::Node> {
    let href = tree.attribute(link, "href")?;
    let (_, fragment) = href.split_once('#')?;
    tree.element_by_id(fragment)
}
