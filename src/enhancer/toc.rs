use log::debug;

use crate::config::{SelectorConfig, TocConfig};
use crate::dom::{DocumentTree, Selector};
use crate::enhancer::anchor::derive_id;
use crate::utils::error::PagetocError;

/// One generated TOC entry
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry<N> {
    pub heading: N,
    pub link: N,
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// What the builder inserted into a page
#[derive(Debug, Clone, PartialEq)]
pub struct TocOutcome<N> {
    pub container: N,
    pub entries: Vec<TocEntry<N>>,
    pub generated_ids: usize,
}

/// Builds the "On this page" block from the headings of the main region
#[derive(Debug, Clone)]
pub struct TocBuilder {
    content: Selector,
    main: Selector,
    headings: Selector,
    config: TocConfig,
}

impl TocBuilder {
    pub fn new(selectors: &SelectorConfig, config: &TocConfig) -> Result<Self, PagetocError> {
        let levels = (1..=config.max_level.clamp(1, 6))
            .map(|level| format!("h{}", level))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Self {
            content: Selector::parse(&selectors.content)?,
            main: Selector::parse(&selectors.main)?,
            headings: Selector::parse(&levels)?,
            config: config.clone(),
        })
    }

    /// Selector matching every link inside the generated container
    pub fn links_selector(&self) -> Result<Selector, PagetocError> {
        let container = Selector::parse(&format!(".{}", self.config.container_class))?;
        Ok(Selector::parse("a")?.within(&container))
    }

    /// Append the TOC container to the content region and fill it with one
    /// entry per heading of the main region, in document order.
    ///
    /// Returns `None` and leaves the tree untouched when there is no content
    /// region. Without a main region the container is still inserted, with an
    /// empty nav.
    pub fn build<T: DocumentTree>(&self, tree: &mut T) -> Option<TocOutcome<T::Node>> {
        let root = tree.root();
        let Some(content) = tree.query_selector(root, &self.content) else {
            debug!("No element matches '{}', skipping TOC", self.content);
            return None;
        };

        let container = tree.create_element("div");
        tree.set_attribute(container, "class", &self.config.container_class);
        let title = tree.create_element("h3");
        let title_text = tree.create_text(&self.config.title);
        tree.append_child(title, title_text);
        tree.append_child(container, title);
        let nav = tree.create_element("nav");
        tree.set_attribute(nav, "id", &self.config.nav_id);
        tree.append_child(container, nav);
        tree.append_child(content, container);

        let mut outcome = TocOutcome {
            container,
            entries: Vec::new(),
            generated_ids: 0,
        };

        let Some(main) = tree.query_selector(root, &self.main) else {
            debug!("No element matches '{}', TOC left empty", self.main);
            return Some(outcome);
        };

        let list = tree.create_element("ul");
        for heading in tree.query_selector_all(main, &self.headings) {
            let text = tree.text_content(heading);
            let existing = tree
                .attribute(heading, "id")
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            let id = match existing {
                Some(existing) => existing,
                None => {
                    let generated = derive_id(&text);
                    tree.set_attribute(heading, "id", &generated);
                    outcome.generated_ids += 1;
                    generated
                }
            };
            let tag = tree.tag_name(heading).unwrap_or("h1").to_string();
            let level = tag[1..].parse::<u8>().unwrap_or(1);

            let item = tree.create_element("li");
            tree.set_attribute(item, "class", &format!("{}{}", self.config.item_class_prefix, tag));
            let link = tree.create_element("a");
            tree.set_attribute(link, "href", &format!("#{}", id));
            let label = tree.create_text(&text);
            tree.append_child(link, label);
            tree.append_child(item, link);
            tree.append_child(list, item);

            outcome.entries.push(TocEntry {
                heading,
                link,
                level,
                id,
                text,
            });
        }
        tree.append_child(nav, list);

        debug!(
            "Built TOC with {} entries ({} generated ids)",
            outcome.entries.len(),
            outcome.generated_ids
        );
        Some(outcome)
    }
}
