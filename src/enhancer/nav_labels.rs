use log::debug;

use crate::config::{NavigationConfig, SelectorConfig};
use crate::dom::{DocumentTree, Float, Selector};
use crate::enhancer::retry::MountStatus;
use crate::utils::error::PagetocError;

/// Result of one labelling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// The navigation wrapper is not in the tree yet
    MountMissing,
    Processed {
        /// Controls that received a chapter name
        labeled: usize,
        /// Controls marked as processed without a matching sidebar entry
        unmatched: usize,
        /// Controls already processed by an earlier pass
        skipped: usize,
    },
}

impl MountStatus for LabelOutcome {
    fn mount_missing(&self) -> bool {
        matches!(self, LabelOutcome::MountMissing)
    }
}

/// Copies chapter names from the sidebar into the previous/next controls
#[derive(Debug, Clone)]
pub struct NavLabeler {
    nav_wrapper: Selector,
    sidebar_links: Selector,
    anchors: Selector,
    config: NavigationConfig,
}

impl NavLabeler {
    pub fn new(selectors: &SelectorConfig, config: &NavigationConfig) -> Result<Self, PagetocError> {
        let anchors = Selector::parse("a")?;
        let sidebar = Selector::parse(&selectors.sidebar)?;
        Ok(Self {
            nav_wrapper: Selector::parse(&selectors.nav_wrapper)?,
            sidebar_links: anchors.within(&sidebar),
            anchors,
            config: config.clone(),
        })
    }

    /// Label every control in the navigation wrapper that no earlier pass has
    /// processed. Each control is marked processed before it is looked up, so
    /// a control without a sidebar match is never retried.
    pub fn label<T: DocumentTree>(&self, tree: &mut T) -> LabelOutcome {
        let root = tree.root();
        let Some(wrapper) = tree.query_selector(root, &self.nav_wrapper) else {
            debug!("No element matches '{}' yet", self.nav_wrapper);
            return LabelOutcome::MountMissing;
        };

        let (mut labeled, mut unmatched, mut skipped) = (0, 0, 0);
        for control in tree.query_selector_all(wrapper, &self.anchors) {
            let already = tree
                .attribute(control, &self.config.enhanced_attribute)
                .map_or(false, |value| !value.is_empty());
            if already {
                skipped += 1;
                continue;
            }
            tree.set_attribute(control, &self.config.enhanced_attribute, "true");

            let Some(href) = tree
                .attribute(control, "href")
                .filter(|href| !href.is_empty())
                .map(str::to_string)
            else {
                unmatched += 1;
                continue;
            };

            let Some(chapter) = self.chapter_name(tree, &href) else {
                debug!("No sidebar entry links to {}", href);
                unmatched += 1;
                continue;
            };

            let span = tree.create_element("span");
            tree.set_attribute(span, "class", &self.config.label_class);
            let text = tree.create_text(&chapter);
            tree.append_child(span, text);

            if self.is_next(tree, control) {
                // Before the arrow
                let first = tree.first_child(control);
                tree.insert_before(control, span, first);
            } else {
                tree.append_child(control, span);
            }
            labeled += 1;
        }

        LabelOutcome::Processed {
            labeled,
            unmatched,
            skipped,
        }
    }

    /// Trimmed text of the first sidebar link whose href equals `href`
    fn chapter_name<T: DocumentTree>(&self, tree: &T, href: &str) -> Option<String> {
        tree.query_selector_all(tree.root(), &self.sidebar_links)
            .into_iter()
            .find(|link| tree.attribute(*link, "href") == Some(href))
            .map(|link| tree.text_content(link).trim().to_string())
    }

    fn is_next<T: DocumentTree>(&self, tree: &T, control: T::Node) -> bool {
        tree.has_class(control, &self.config.next_class)
            || tree.attribute(control, "rel") == Some("next")
            || tree.float_direction(control) == Some(Float::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dom::VDom;

    const SIDEBAR: &str = "<nav class=\"sidebar\"><ol class=\"chapter\">\
        <li><a href=\"intro.html\"><strong>1.</strong> Introduction</a></li>\
        <li><a href=\"setup.html\">  Setup  </a></li>\
        <li><a href=\"usage.html\">Usage</a></li>\
        </ol></nav>";

    fn labeler() -> NavLabeler {
        let config = Config::default();
        NavLabeler::new(&config.selectors, &config.navigation).unwrap()
    }

    fn page(nav: &str) -> VDom {
        VDom::parse(&format!("{}<div class=\"content\"><main></main>{}</div>", SIDEBAR, nav)).unwrap()
    }

    fn control(dom: &VDom, id: &str) -> String {
        dom.outer_html(dom.element_by_id(id).unwrap())
    }

    #[test]
    fn test_next_label_goes_first_previous_label_goes_last() {
        let mut dom = page(
            "<nav class=\"nav-wrapper\">\
             <a id=\"p\" rel=\"prev\" href=\"intro.html\" class=\"nav-chapters previous\"><i>←</i></a>\
             <a id=\"n\" rel=\"next\" href=\"usage.html\" class=\"nav-chapters\"><i>→</i></a>\
             </nav>",
        );
        let outcome = labeler().label(&mut dom);

        assert_eq!(outcome, LabelOutcome::Processed { labeled: 2, unmatched: 0, skipped: 0 });
        assert_eq!(
            control(&dom, "p"),
            "<a id=\"p\" rel=\"prev\" href=\"intro.html\" class=\"nav-chapters previous\" data-enhanced=\"true\">\
             <i>←</i><span class=\"chapter-name\">1. Introduction</span></a>"
        );
        assert_eq!(
            control(&dom, "n"),
            "<a id=\"n\" rel=\"next\" href=\"usage.html\" class=\"nav-chapters\" data-enhanced=\"true\">\
             <span class=\"chapter-name\">Usage</span><i>→</i></a>"
        );
    }

    #[test]
    fn test_direction_from_class_and_float() {
        let mut dom = page(
            "<div class=\"nav-wrapper\">\
             <a id=\"c\" class=\"mobile-nav-chapters next\" href=\"setup.html\">→</a>\
             <a id=\"f\" style=\"float: right\" href=\"usage.html\">→</a>\
             </div>",
        );
        labeler().label(&mut dom);

        let c = dom.element_by_id("c").unwrap();
        let f = dom.element_by_id("f").unwrap();
        assert_eq!(dom.text_content(c), "Setup→");
        assert_eq!(dom.text_content(f), "Usage→");
    }

    #[test]
    fn test_second_pass_adds_nothing() {
        let mut dom = page(
            "<div class=\"nav-wrapper\"><a id=\"n\" rel=\"next\" href=\"setup.html\">→</a></div>",
        );
        let labeler = labeler();
        labeler.label(&mut dom);
        let first = dom.to_html();

        let outcome = labeler.label(&mut dom);
        assert_eq!(outcome, LabelOutcome::Processed { labeled: 0, unmatched: 0, skipped: 1 });
        assert_eq!(dom.to_html(), first);
    }

    #[test]
    fn test_unmatched_and_hrefless_controls_are_marked() {
        let mut dom = page(
            "<div class=\"nav-wrapper\"><a id=\"u\" href=\"missing.html\">→</a><a id=\"h\">?</a></div>",
        );
        let outcome = labeler().label(&mut dom);

        assert_eq!(outcome, LabelOutcome::Processed { labeled: 0, unmatched: 2, skipped: 0 });
        assert_eq!(control(&dom, "u"), "<a id=\"u\" href=\"missing.html\" data-enhanced=\"true\">→</a>");
        assert_eq!(control(&dom, "h"), "<a id=\"h\" data-enhanced=\"true\">?</a>");
    }

    #[test]
    fn test_missing_wrapper_leaves_tree_untouched() {
        let mut dom = page("");
        let before = dom.to_html();
        assert_eq!(labeler().label(&mut dom), LabelOutcome::MountMissing);
        assert!(LabelOutcome::MountMissing.mount_missing());
        assert_eq!(dom.to_html(), before);
    }

    #[test]
    fn test_links_outside_sidebar_are_ignored() {
        let mut dom = VDom::parse(
            "<p><a href=\"intro.html\">Elsewhere</a></p>\
             <div class=\"nav-wrapper\"><a id=\"n\" rel=\"next\" href=\"intro.html\">→</a></div>",
        )
        .unwrap();
        let outcome = labeler().label(&mut dom);
        assert_eq!(outcome, LabelOutcome::Processed { labeled: 0, unmatched: 1, skipped: 0 });
    }
}
