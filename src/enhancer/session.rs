use crate::config::ScrollMetrics;
use crate::dom::DocumentTree;
use crate::enhancer::{Enhancer, LabelOutcome, PageReport};

/// A live page: one tree, enhanced once, then fed scroll events.
///
/// The session owns the tree for the lifetime of the page, which is how a
/// host gets at it between events (`tree`, `tree_mut`) and takes it back at
/// the end (`into_tree`).
#[derive(Debug)]
pub struct PageSession<T: DocumentTree> {
    tree: T,
    enhancer: Enhancer,
    report: PageReport,
    active: Option<T::Node>,
}

impl<T: DocumentTree> PageSession<T> {
    /// Build the TOC and run the startup highlight for `metrics`
    pub fn start(mut tree: T, enhancer: Enhancer, metrics: &ScrollMetrics) -> Self {
        let report = enhancer.enhance_page(&mut tree, None);
        let active = enhancer.highlight(&mut tree, metrics);
        Self {
            tree,
            enhancer,
            report,
            active,
        }
    }

    /// Scroll event: move the active marker
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> Option<T::Node> {
        self.active = self.enhancer.highlight(&mut self.tree, metrics);
        self.active
    }

    /// Timer callback: label any navigation controls rendered so far
    pub fn label_navigation(&mut self) -> LabelOutcome {
        self.enhancer.label_navigation(&mut self.tree)
    }

    pub fn active(&self) -> Option<T::Node> {
        self.active
    }

    pub fn report(&self) -> &PageReport {
        &self.report
    }

    pub fn enhancer(&self) -> &Enhancer {
        &self.enhancer
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn into_tree(self) -> T {
        self.tree
    }
}
