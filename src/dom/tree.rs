use std::fmt::Debug;

use crate::dom::selector::Selector;

/// Horizontal float of an element, as the host's layout engine computed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
    Left,
    Right,
    None,
}

/// Capability interface over a mutable document tree.
///
/// The enhancer only talks to pages through this trait, so the same logic
/// runs against a browser DOM binding, the in-crate [`VDom`](crate::dom::VDom),
/// or any other tree that can answer these questions. Handles are cheap
/// `Copy` values owned by the tree.
pub trait DocumentTree {
    type Node: Copy + Eq + Debug;

    /// The document node (parent of `<html>`)
    fn root(&self) -> Self::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Child nodes in document order, including text nodes
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Lowercase tag name, `None` for anything that is not an element
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Concatenated text of all descendant text nodes
    fn text_content(&self, node: Self::Node) -> String;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a detached text node
    fn create_text(&mut self, text: &str) -> Self::Node;

    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Insert `child` before `reference`, or append when `reference` is `None`
    fn insert_before(&mut self, parent: Self::Node, child: Self::Node, reference: Option<Self::Node>);

    /// Distance in pixels from the top of the document to the element's top edge
    fn offset_top(&self, node: Self::Node) -> f64;

    /// Computed float of the element, when the tree knows about layout
    fn float_direction(&self, _node: Self::Node) -> Option<Float> {
        None
    }

    fn first_child(&self, node: Self::Node) -> Option<Self::Node> {
        self.children(node).first().copied()
    }

    fn is_element(&self, node: Self::Node) -> bool {
        self.tag_name(node).is_some()
    }

    fn has_class(&self, node: Self::Node, class_name: &str) -> bool {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    fn add_class(&mut self, node: Self::Node, class_name: &str) {
        if self.has_class(node, class_name) {
            return;
        }
        let classes = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class_name)
            }
            _ => class_name.to_string(),
        };
        self.set_attribute(node, "class", &classes);
    }

    fn remove_class(&mut self, node: Self::Node, class_name: &str) {
        if !self.has_class(node, class_name) {
            return;
        }
        let remaining = self
            .attribute(node, "class")
            .unwrap_or("")
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(node, "class", &remaining);
    }

    /// Descendant elements of `scope` in document order, excluding `scope` itself
    fn descendant_elements(&self, scope: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(scope).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Node> {
        if id.is_empty() {
            return None;
        }
        self.descendant_elements(self.root())
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// All descendants of `scope` matching `selector`, in document order
    fn query_selector_all(&self, scope: Self::Node, selector: &Selector) -> Vec<Self::Node>
    where
        Self: Sized,
    {
        self.descendant_elements(scope)
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    /// First descendant of `scope` matching `selector`
    fn query_selector(&self, scope: Self::Node, selector: &Selector) -> Option<Self::Node>
    where
        Self: Sized,
    {
        self.descendant_elements(scope)
            .into_iter()
            .find(|node| selector.matches(self, *node))
    }
}
